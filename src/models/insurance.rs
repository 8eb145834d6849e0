use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::lenient;
use crate::filters::{format_amount, format_date};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceRecord {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub insurance_company: String,
    #[serde(default)]
    pub client_count: i64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct InsuranceRecordRow {
    pub insurance_company: String,
    pub client_count: i64,
    pub date: String,
}

impl From<&InsuranceRecord> for InsuranceRecordRow {
    fn from(record: &InsuranceRecord) -> Self {
        Self {
            insurance_company: record.insurance_company.clone(),
            client_count: record.client_count,
            date: format_date(&record.date),
        }
    }
}

/// A payment owed by or settled with an insurance company. `status` stays a
/// raw wire string here; the aggregator parses it against the closed status
/// set and rejects anything it does not recognize.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePayment {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub insurance_company: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct InsurancePaymentRow {
    pub insurance_company: String,
    pub amount: String,
    pub status: String,
    pub date: String,
}

impl From<&InsurancePayment> for InsurancePaymentRow {
    fn from(payment: &InsurancePayment) -> Self {
        Self {
            insurance_company: payment.insurance_company.clone(),
            amount: format_amount(payment.amount),
            status: payment.status.clone().unwrap_or_else(|| "Pending".to_string()),
            date: format_date(&payment.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_with_string_amount_decodes() {
        let payment: InsurancePayment = serde_json::from_value(json!({
            "_id": "p1",
            "insuranceCompany": "RSSB",
            "amount": "500",
            "status": "Paid",
            "date": "2025-05-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(payment.amount, 500.0);
        assert_eq!(payment.status.as_deref(), Some("Paid"));
    }

    #[test]
    fn missing_status_displays_as_pending() {
        let payment = InsurancePayment::default();
        assert_eq!(InsurancePaymentRow::from(&payment).status, "Pending");
    }
}
