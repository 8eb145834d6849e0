use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::lenient;

/// `GET /admin-report/earnings-vs-expenses` payload. `netProfit` is optional
/// on the wire; the aggregator derives it from earnings and expenses when the
/// server omits it or sends something non-numeric.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub earnings: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub expenses: f64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub net_profit: Option<f64>,
}

/// `GET /admin-report/purchase-expenses` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseExpenses {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_purchases: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub outstanding_credits: f64,
}

/// `GET /admin-report/insurance-status`: a free-form map of status name to a
/// figure the server has already aggregated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsuranceStatusReport(pub BTreeMap<String, Value>);

impl InsuranceStatusReport {
    pub fn entries(&self) -> Vec<(String, f64)> {
        self.0
            .iter()
            .map(|(status, value)| (status.clone(), lenient::coerce_f64(value)))
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.0.values().map(lenient::coerce_f64).sum()
    }
}

/// `GET /cashier/net-profit` answers either `{ "netProfit": n }` or a bare
/// number, depending on the backend version.
#[derive(Debug, Clone, Deserialize)]
pub struct NetProfitReport(pub Value);

impl NetProfitReport {
    pub fn value(&self) -> f64 {
        match &self.0 {
            Value::Object(map) => map.get("netProfit").map(lenient::coerce_f64).unwrap_or(0.0),
            other => lenient::coerce_f64(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn financial_summary_tolerates_string_amounts() {
        let summary: FinancialSummary =
            serde_json::from_value(json!({ "earnings": "1200", "expenses": 400 })).unwrap();
        assert_eq!(summary.earnings, 1200.0);
        assert_eq!(summary.expenses, 400.0);
        assert_eq!(summary.net_profit, None);
    }

    #[test]
    fn non_numeric_net_profit_reads_as_absent() {
        let summary: FinancialSummary =
            serde_json::from_value(json!({ "earnings": 100, "expenses": 40, "netProfit": "soon" }))
                .unwrap();
        assert_eq!(summary.net_profit, None);
    }

    #[test]
    fn insurance_status_totals_its_entries() {
        let report: InsuranceStatusReport =
            serde_json::from_value(json!({ "Paid": 3, "Pending": "2", "Not Paid": null })).unwrap();
        assert_eq!(report.total(), 5.0);
        let entries = report.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&("Not Paid".to_string(), 0.0)));
    }

    #[test]
    fn net_profit_report_handles_both_shapes() {
        assert_eq!(NetProfitReport(json!({ "netProfit": 250 })).value(), 250.0);
        assert_eq!(NetProfitReport(json!(180)).value(), 180.0);
        assert_eq!(NetProfitReport(json!({ "unexpected": 1 })).value(), 0.0);
    }
}
