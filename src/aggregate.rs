//! Pure transformations over fetched report payloads: status bucket totals,
//! generic group-and-sum, stable sorting, and substring filtering. Nothing in
//! here performs IO; the handlers feed it whatever the report client returned.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{FinancialSummary, InsurancePayment};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("unrecognized payment status \"{0}\"")]
    UnknownStatus(String),
}

/// The closed set of insurance payment statuses. Anything else on the wire is
/// rejected rather than silently bucketed, so a typo in the data cannot skew
/// the totals unnoticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayStatus {
    Paid,
    NotPaid,
    Pending,
}

impl PayStatus {
    pub const ALL: [PayStatus; 3] = [PayStatus::Paid, PayStatus::NotPaid, PayStatus::Pending];

    pub fn parse(raw: &str) -> Result<Self, AggregateError> {
        match raw.trim() {
            "Paid" => Ok(Self::Paid),
            "Not Paid" => Ok(Self::NotPaid),
            "Pending" => Ok(Self::Pending),
            other => Err(AggregateError::UnknownStatus(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::NotPaid => "Not Paid",
            Self::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    pub count: u32,
    pub amount: f64,
}

/// Per-status count and amount totals. Every bucket exists even when empty so
/// the cards never have to deal with a missing entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTotals {
    pub paid: Bucket,
    pub not_paid: Bucket,
    pub pending: Bucket,
}

impl StatusTotals {
    pub fn bucket(&self, status: PayStatus) -> &Bucket {
        match status {
            PayStatus::Paid => &self.paid,
            PayStatus::NotPaid => &self.not_paid,
            PayStatus::Pending => &self.pending,
        }
    }

    fn bucket_mut(&mut self, status: PayStatus) -> &mut Bucket {
        match status {
            PayStatus::Paid => &mut self.paid,
            PayStatus::NotPaid => &mut self.not_paid,
            PayStatus::Pending => &mut self.pending,
        }
    }

    pub fn total_count(&self) -> u32 {
        PayStatus::ALL.iter().map(|s| self.bucket(*s).count).sum()
    }

    pub fn total_amount(&self) -> f64 {
        PayStatus::ALL.iter().map(|s| self.bucket(*s).amount).sum()
    }
}

/// Folds insurance payments into per-status buckets. A record without a status
/// counts as Pending; a record with a status outside the closed set fails the
/// whole aggregation.
pub fn status_totals(payments: &[InsurancePayment]) -> Result<StatusTotals, AggregateError> {
    let mut totals = StatusTotals::default();
    for payment in payments {
        let status = match payment.status.as_deref() {
            None => PayStatus::Pending,
            Some(raw) => PayStatus::parse(raw)?,
        };
        let bucket = totals.bucket_mut(status);
        bucket.count += 1;
        bucket.amount += payment.amount;
    }
    Ok(totals)
}

/// Groups records by a key and sums a value per group. Records whose key
/// function yields None are skipped; keys with no contributing records are
/// simply absent. BTreeMap keeps the chart labels in sorted order.
pub fn group_sum<T, K, V>(records: &[T], key: K, value: V) -> BTreeMap<String, f64>
where
    K: Fn(&T) -> Option<String>,
    V: Fn(&T) -> f64,
{
    let mut groups = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *groups.entry(k).or_insert(0.0) += value(record);
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            // Mixed variants on the same key mean dirty data; leave order alone.
            _ => Ordering::Equal,
        }
    }
}

pub trait Sortable {
    fn sort_value(&self, key: &str) -> Option<SortValue>;
}

pub trait Searchable {
    fn haystack(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn parse(raw: &str) -> Self {
        if raw == "desc" {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: Direction,
}

impl SortSpec {
    /// Clicking a column header: the same key flips direction, a new key
    /// starts over ascending.
    pub fn toggle(current: Option<&SortSpec>, key: &str) -> SortSpec {
        match current {
            Some(spec) if spec.key == key => SortSpec {
                key: key.to_string(),
                direction: spec.direction.flip(),
            },
            _ => SortSpec {
                key: key.to_string(),
                direction: Direction::Asc,
            },
        }
    }
}

/// Stable sort by the spec's key. Records missing the sort value order before
/// records that have it.
pub fn sort_records<T: Sortable>(records: &mut [T], spec: &SortSpec) {
    records.sort_by(|a, b| {
        let ordering = match (a.sort_value(&spec.key), b.sort_value(&spec.key)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(va), Some(vb)) => va.compare(&vb),
        };
        match spec.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    });
}

/// Case-insensitive substring match over each record's fixed search fields.
/// An empty term returns the input unchanged.
pub fn filter_records<T: Searchable>(records: Vec<T>, term: &str) -> Vec<T> {
    if term.is_empty() {
        return records;
    }
    let needle = term.to_lowercase();
    records
        .into_iter()
        .filter(|record| {
            record
                .haystack()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// The reported figure wins when the server sent a numeric one; otherwise the
/// profit is earnings minus expenses (both default to zero when absent).
pub fn derive_net_profit(summary: &FinancialSummary) -> f64 {
    summary
        .net_profit
        .unwrap_or(summary.earnings - summary.expenses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(status: Option<&str>, amount: f64) -> InsurancePayment {
        InsurancePayment {
            status: status.map(str::to_string),
            amount,
            ..InsurancePayment::default()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        label: String,
        value: f64,
        seq: u32,
    }

    impl Item {
        fn new(label: &str, value: f64, seq: u32) -> Self {
            Self {
                label: label.to_string(),
                value,
                seq,
            }
        }
    }

    impl Sortable for Item {
        fn sort_value(&self, key: &str) -> Option<SortValue> {
            match key {
                "label" => Some(SortValue::Text(self.label.clone())),
                "value" => Some(SortValue::Number(self.value)),
                _ => None,
            }
        }
    }

    impl Searchable for Item {
        fn haystack(&self) -> Vec<&str> {
            vec![&self.label]
        }
    }

    #[test]
    fn status_totals_scenario() {
        let payments = vec![
            payment(Some("Paid"), 500.0),
            payment(Some("Paid"), 300.0),
            payment(Some("Pending"), 100.0),
        ];
        let totals = status_totals(&payments).unwrap();
        assert_eq!(totals.paid, Bucket { count: 2, amount: 800.0 });
        assert_eq!(totals.not_paid, Bucket { count: 0, amount: 0.0 });
        assert_eq!(totals.pending, Bucket { count: 1, amount: 100.0 });
    }

    #[test]
    fn status_totals_cover_every_record() {
        let payments = vec![
            payment(Some("Paid"), 10.0),
            payment(None, 25.0),
            payment(Some("Not Paid"), 5.5),
            payment(Some("Pending"), 0.0),
        ];
        let totals = status_totals(&payments).unwrap();
        assert_eq!(totals.total_count() as usize, payments.len());
        let expected: f64 = payments.iter().map(|p| p.amount).sum();
        assert_eq!(totals.total_amount(), expected);
    }

    #[test]
    fn missing_status_lands_in_pending() {
        let totals = status_totals(&[payment(None, 40.0)]).unwrap();
        assert_eq!(totals.pending.count, 1);
        assert_eq!(totals.pending.amount, 40.0);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = status_totals(&[payment(Some("Overdue"), 1.0)]);
        assert_eq!(
            result,
            Err(AggregateError::UnknownStatus("Overdue".to_string()))
        );
    }

    #[test]
    fn empty_input_still_has_all_buckets() {
        let totals = status_totals(&[]).unwrap();
        for status in PayStatus::ALL {
            assert_eq!(*totals.bucket(status), Bucket::default());
        }
    }

    #[test]
    fn group_sum_by_supplier_scenario() {
        let items = vec![
            Item::new("A", 200.0, 0),
            Item::new("B", 50.0, 1),
            Item::new("A", 75.0, 2),
        ];
        let groups = group_sum(&items, |i| Some(i.label.clone()), |i| i.value);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["A"], 275.0);
        assert_eq!(groups["B"], 50.0);
    }

    #[test]
    fn group_sum_skips_keyless_records() {
        let items = vec![Item::new("", 100.0, 0), Item::new("A", 1.0, 1)];
        let groups = group_sum(
            &items,
            |i| (!i.label.is_empty()).then(|| i.label.clone()),
            |i| i.value,
        );
        assert_eq!(groups.len(), 1);
        assert!(!groups.contains_key(""));
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut items = vec![
            Item::new("same", 1.0, 0),
            Item::new("same", 2.0, 1),
            Item::new("same", 3.0, 2),
        ];
        sort_records(
            &mut items,
            &SortSpec {
                key: "label".to_string(),
                direction: Direction::Asc,
            },
        );
        let seqs: Vec<u32> = items.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn numeric_sort_uses_numeric_order() {
        let mut items = vec![
            Item::new("a", 10.0, 0),
            Item::new("b", 2.0, 1),
            Item::new("c", 1.5, 2),
        ];
        sort_records(
            &mut items,
            &SortSpec {
                key: "value".to_string(),
                direction: Direction::Asc,
            },
        );
        let values: Vec<f64> = items.iter().map(|i| i.value).collect();
        assert_eq!(values, vec![1.5, 2.0, 10.0]);
    }

    #[test]
    fn descending_reverses_ascending_for_distinct_keys() {
        let mut asc = vec![
            Item::new("pen", 3.0, 0),
            Item::new("apple", 1.0, 1),
            Item::new("zinc", 2.0, 2),
        ];
        let mut desc = asc.clone();
        sort_records(
            &mut asc,
            &SortSpec {
                key: "label".to_string(),
                direction: Direction::Asc,
            },
        );
        sort_records(
            &mut desc,
            &SortSpec {
                key: "label".to_string(),
                direction: Direction::Desc,
            },
        );
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn toggle_flips_same_key_and_resets_new_key() {
        let first = SortSpec::toggle(None, "supplier");
        assert_eq!(first.direction, Direction::Asc);

        let flipped = SortSpec::toggle(Some(&first), "supplier");
        assert_eq!(flipped.direction, Direction::Desc);

        let reset = SortSpec::toggle(Some(&flipped), "amount");
        assert_eq!(reset.key, "amount");
        assert_eq!(reset.direction, Direction::Asc);
    }

    #[test]
    fn empty_term_is_identity() {
        let items = vec![Item::new("Alpha", 1.0, 0), Item::new("Beta", 2.0, 1)];
        assert_eq!(filter_records(items.clone(), ""), items);
    }

    #[test]
    fn filtering_is_case_insensitive_and_idempotent() {
        let items = vec![
            Item::new("Kigali Depot", 1.0, 0),
            Item::new("Huye Branch", 2.0, 1),
            Item::new("kigali south", 3.0, 2),
        ];
        let once = filter_records(items, "KIGALI");
        assert_eq!(once.len(), 2);
        let twice = filter_records(once.clone(), "KIGALI");
        assert_eq!(once, twice);
    }

    #[test]
    fn net_profit_prefers_the_reported_figure() {
        let derived = FinancialSummary {
            earnings: 100.0,
            expenses: 40.0,
            net_profit: None,
        };
        assert_eq!(derive_net_profit(&derived), 60.0);

        let reported = FinancialSummary {
            earnings: 100.0,
            expenses: 40.0,
            net_profit: Some(25.0),
        };
        assert_eq!(derive_net_profit(&reported), 25.0);

        assert_eq!(derive_net_profit(&FinancialSummary::default()), 0.0);
    }
}
