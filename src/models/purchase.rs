use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use super::lenient;
use crate::aggregate::{Searchable, SortValue, Sortable};
use crate::filters::{format_amount, format_date};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub medicine_name: Option<String>,
    #[serde(default)]
    pub supplier: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_amount: f64,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: PurchaseStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Paid,
    Credit,
    #[default]
    Pending,
    Cancelled,
}

impl PurchaseStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "paid" => Some(Self::Paid),
            "credit" => Some(Self::Credit),
            "pending" => Some(Self::Pending),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Credit => "credit",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }

    /// Bootstrap badge class for the purchases table.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Paid => "bg-success",
            Self::Credit => "bg-warning text-dark",
            Self::Pending => "bg-secondary",
            Self::Cancelled => "bg-danger",
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Sortable for Purchase {
    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "date" => self.purchase_date.map(|d| SortValue::Date(d.date_naive())),
            "supplier" => Some(SortValue::Text(self.supplier.clone())),
            "amount" => Some(SortValue::Number(self.total_amount)),
            "status" => Some(SortValue::Text(self.status.as_str().to_string())),
            _ => None,
        }
    }
}

impl Searchable for Purchase {
    fn haystack(&self) -> Vec<&str> {
        vec![self.medicine_name.as_deref().unwrap_or(""), &self.supplier]
    }
}

#[derive(Debug, Clone)]
pub struct PurchaseRow {
    pub purchase_date: String,
    pub supplier: String,
    pub total_amount: String,
    pub status: String,
    pub badge_class: String,
    pub notes: String,
}

impl From<&Purchase> for PurchaseRow {
    fn from(purchase: &Purchase) -> Self {
        Self {
            purchase_date: format_date(&purchase.purchase_date),
            supplier: if purchase.supplier.is_empty() {
                "N/A".to_string()
            } else {
                purchase.supplier.clone()
            },
            total_amount: format_amount(purchase.total_amount),
            status: purchase.status.as_str().to_string(),
            badge_class: purchase.status.badge_class().to_string(),
            notes: if purchase.notes.is_empty() {
                "N/A".to_string()
            } else {
                purchase.notes.clone()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn purchase_decodes_wire_shape() {
        let purchase: Purchase = serde_json::from_value(json!({
            "_id": "x1",
            "medicineName": "Amoxicillin",
            "supplier": "Kigali Depot",
            "totalAmount": "2500",
            "purchaseDate": "2025-05-02T00:00:00Z",
            "status": "credit",
            "notes": ""
        }))
        .unwrap();
        assert_eq!(purchase.total_amount, 2500.0);
        assert_eq!(purchase.status, PurchaseStatus::Credit);
        assert_eq!(PurchaseRow::from(&purchase).notes, "N/A");
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let purchase: Purchase =
            serde_json::from_value(json!({ "supplier": "A", "totalAmount": 10 })).unwrap();
        assert_eq!(purchase.status, PurchaseStatus::Pending);
    }

    #[test]
    fn sort_values_cover_the_table_columns() {
        let purchase: Purchase = serde_json::from_value(json!({
            "supplier": "B",
            "totalAmount": 75,
            "purchaseDate": "2025-01-15T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(purchase.sort_value("amount"), Some(SortValue::Number(75.0)));
        assert_eq!(
            purchase.sort_value("supplier"),
            Some(SortValue::Text("B".to_string()))
        );
        assert!(matches!(purchase.sort_value("date"), Some(SortValue::Date(_))));
        assert_eq!(purchase.sort_value("nonsense"), None);
    }
}
