use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::lenient;
use crate::filters::{format_amount, format_date};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_price: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    #[serde(default)]
    pub medication_name: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub unit_price: f64,
}

// Template-friendly row: everything pre-rendered to strings.
#[derive(Debug, Clone)]
pub struct SaleRow {
    pub date: String,
    pub items: Vec<String>,
    pub total_price: String,
    pub payment_method: String,
}

impl From<&Sale> for SaleRow {
    fn from(sale: &Sale) -> Self {
        Self {
            date: format_date(&sale.date),
            items: sale
                .items
                .iter()
                .map(|item| {
                    format!(
                        "{} x{} @ {} Rwf",
                        item.medication_name,
                        fmt_quantity(item.quantity),
                        format_amount(item.unit_price)
                    )
                })
                .collect(),
            total_price: format_amount(sale.total_price),
            payment_method: sale.payment_method.clone(),
        }
    }
}

fn fmt_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else {
        format!("{}", quantity)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earning {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub pos_amount: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub cash_amount: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub momo_amount: f64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct EarningRow {
    pub pos_amount: String,
    pub cash_amount: String,
    pub momo_amount: String,
    pub date: String,
}

impl From<&Earning> for EarningRow {
    fn from(earning: &Earning) -> Self {
        Self {
            pos_amount: format_amount(earning.pos_amount),
            cash_amount: format_amount(earning.cash_amount),
            momo_amount: format_amount(earning.momo_amount),
            date: format_date(&earning.date),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ExpenseRow {
    pub category: String,
    pub amount: String,
    pub date: String,
}

impl From<&Expense> for ExpenseRow {
    fn from(expense: &Expense) -> Self {
        Self {
            category: expense.category.clone(),
            amount: format_amount(expense.amount),
            date: format_date(&expense.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sale_row_lists_items() {
        let sale: Sale = serde_json::from_value(json!({
            "_id": "abc",
            "items": [
                { "medicationName": "Amoxicillin", "quantity": 2, "unitPrice": 500 },
                { "medicationName": "Ibuprofen", "quantity": "1", "unitPrice": "1200" }
            ],
            "totalPrice": 2200,
            "paymentMethod": "CASH",
            "date": "2025-05-05T00:00:00Z"
        }))
        .unwrap();

        let row = SaleRow::from(&sale);
        assert_eq!(row.items[0], "Amoxicillin x2 @ 500 Rwf");
        assert_eq!(row.items[1], "Ibuprofen x1 @ 1,200 Rwf");
        assert_eq!(row.total_price, "2,200");
        assert_eq!(row.date, "2025-05-05");
    }

    #[test]
    fn earning_tolerates_missing_fields() {
        let earning: Earning = serde_json::from_value(json!({ "posAmount": "1500" })).unwrap();
        assert_eq!(earning.pos_amount, 1500.0);
        assert_eq!(earning.cash_amount, 0.0);
        assert_eq!(EarningRow::from(&earning).date, "N/A");
    }
}
