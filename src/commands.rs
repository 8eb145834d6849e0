//! Typed form commands. Every dashboard form deserializes into one of these
//! structs and goes through a single `validate` step that either produces a
//! ready-to-send `ValidCommand` or a message for the form's inline banner.
//! Business rules (duplicate usernames, stock limits) stay with the server.

use chrono::NaiveDate;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::aggregate::PayStatus;
use crate::models::PurchaseStatus;
use crate::session::Role;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CommandError(pub String);

fn invalid(message: &str) -> CommandError {
    CommandError(message.to_string())
}

/// A validated write, ready for the form submitter.
#[derive(Debug, Clone)]
pub struct ValidCommand {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

const PAYMENT_METHODS: [&str; 3] = ["CASH", "POS", "MOMO"];

fn require_text(value: &str, message: &str) -> Result<String, CommandError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(invalid(message))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_number(value: &str, message: &str) -> Result<f64, CommandError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(message))
}

// Empty inputs count as zero, matching how the forms treat untouched fields.
fn parse_number_or_zero(value: &str, message: &str) -> Result<f64, CommandError> {
    if value.trim().is_empty() {
        Ok(0.0)
    } else {
        parse_number(value, message)
    }
}

fn parse_count(value: &str, message: &str) -> Result<i64, CommandError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n >= 0)
        .ok_or_else(|| invalid(message))
}

fn parse_form_date(value: &str, message: &str) -> Result<Option<NaiveDate>, CommandError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid(message))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl RegisterUserForm {
    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let username = require_text(&self.username, "Username is required")?;
        if self.password.is_empty() {
            return Err(invalid("Password is required"));
        }
        let role = Role::parse(&self.role).ok_or_else(|| invalid("Unknown role"))?;
        Ok(ValidCommand {
            method: Method::POST,
            path: "/auth/register".to_string(),
            body: json!({
                "username": username,
                "password": self.password,
                "role": role.as_str(),
            }),
        })
    }
}

/// The sale form posts parallel item columns (one value per item row).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSaleForm {
    #[serde(default)]
    pub medication_name: Vec<String>,
    #[serde(default)]
    pub quantity: Vec<String>,
    #[serde(default)]
    pub unit_price: Vec<String>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Default)]
pub struct SaleItemInput {
    pub medication_name: String,
    pub quantity: String,
    pub unit_price: String,
}

impl NewSaleForm {
    /// Item rows as entered, padded so the form always renders at least one.
    pub fn rows(&self) -> Vec<SaleItemInput> {
        let len = self
            .medication_name
            .len()
            .max(self.quantity.len())
            .max(self.unit_price.len())
            .max(1);
        (0..len)
            .map(|i| SaleItemInput {
                medication_name: self.medication_name.get(i).cloned().unwrap_or_default(),
                quantity: self.quantity.get(i).cloned().unwrap_or_default(),
                unit_price: self.unit_price.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }

    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let mut items = Vec::new();
        let mut total_price = 0.0;
        for row in self.rows() {
            let untouched = row.medication_name.trim().is_empty()
                && row.quantity.trim().is_empty()
                && row.unit_price.trim().is_empty();
            if untouched {
                continue;
            }
            let name = require_text(&row.medication_name, "Each sale item needs a medication name")?;
            let quantity = parse_number(&row.quantity, "Quantity must be a positive number")?;
            if quantity <= 0.0 {
                return Err(invalid("Quantity must be a positive number"));
            }
            let unit_price = parse_number(&row.unit_price, "Unit price must be a number")?;
            if unit_price < 0.0 {
                return Err(invalid("Unit price must not be negative"));
            }
            total_price += quantity * unit_price;
            items.push(json!({
                "medicationName": name,
                "quantity": quantity,
                "unitPrice": unit_price,
            }));
        }
        if items.is_empty() {
            return Err(invalid("At least one sale item is required"));
        }
        if !PAYMENT_METHODS.contains(&self.payment_method.as_str()) {
            return Err(invalid("Unknown payment method"));
        }
        let date = parse_form_date(&self.date, "Date must be YYYY-MM-DD")?;
        Ok(ValidCommand {
            method: Method::POST,
            path: "/cashier/create-sale".to_string(),
            body: json!({
                "items": items,
                "totalPrice": total_price,
                "paymentMethod": self.payment_method,
                "date": date.map(|d| d.to_string()).unwrap_or_default(),
            }),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEarningForm {
    #[serde(default)]
    pub pos_amount: String,
    #[serde(default)]
    pub cash_amount: String,
    #[serde(default)]
    pub momo_amount: String,
    #[serde(default)]
    pub date: String,
}

impl NewEarningForm {
    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let pos = parse_number_or_zero(&self.pos_amount, "POS amount must be a number")?;
        let cash = parse_number_or_zero(&self.cash_amount, "CASH amount must be a number")?;
        let momo = parse_number_or_zero(&self.momo_amount, "MOMO amount must be a number")?;
        let date = parse_form_date(&self.date, "Date must be YYYY-MM-DD")?;
        Ok(ValidCommand {
            method: Method::POST,
            path: "/cashier/earning".to_string(),
            body: json!({
                "posAmount": pos,
                "cashAmount": cash,
                "momoAmount": momo,
                "date": date.map(|d| d.to_string()).unwrap_or_default(),
            }),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewExpenseForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: String,
}

impl NewExpenseForm {
    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let category = require_text(&self.category, "Category is required")?;
        let amount = parse_number(&self.amount, "Amount must be a number")?;
        let date = parse_form_date(&self.date, "Date must be YYYY-MM-DD")?;
        Ok(ValidCommand {
            method: Method::POST,
            path: "/cashier/expense".to_string(),
            body: json!({
                "category": category,
                "amount": amount,
                "date": date.map(|d| d.to_string()).unwrap_or_default(),
            }),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMedicineForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    // Checkbox: present when checked, absent otherwise.
    #[serde(default)]
    pub available: Option<String>,
}

impl NewMedicineForm {
    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let name = require_text(&self.name, "Medicine name is required")?;
        let stock = parse_count(&self.stock, "Stock must be a non-negative whole number")?;
        let price = parse_number(&self.price, "Price must be a number")?;
        if price < 0.0 {
            return Err(invalid("Price must not be negative"));
        }
        Ok(ValidCommand {
            method: Method::POST,
            path: "/pharmacist/create-medicine".to_string(),
            body: json!({
                "name": name,
                "stock": stock,
                "price": price,
                "description": self.description.trim(),
                "available": self.available.is_some(),
            }),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStockForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stock: String,
}

impl UpdateStockForm {
    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let name = require_text(&self.name, "Medicine name is required")?;
        let quantity = parse_count(&self.stock, "Stock must be a non-negative whole number")?;
        Ok(ValidCommand {
            method: Method::PUT,
            path: format!("/pharmacist/update-stock/{}", urlencoding::encode(&name)),
            body: json!({ "quantity": quantity }),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInsuranceRecordForm {
    #[serde(default)]
    pub insurance_company: String,
    #[serde(default)]
    pub client_count: String,
    #[serde(default)]
    pub date: String,
}

impl NewInsuranceRecordForm {
    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let company = require_text(&self.insurance_company, "Insurance company is required")?;
        let client_count = parse_count(&self.client_count, "Client count must be a whole number")?;
        let date = parse_form_date(&self.date, "Date must be YYYY-MM-DD")?;
        Ok(ValidCommand {
            method: Method::POST,
            path: "/pharmacist/insurance-record".to_string(),
            body: json!({
                "insuranceCompany": company,
                "clientCount": client_count,
                "date": date.map(|d| d.to_string()).unwrap_or_default(),
            }),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInsurancePaymentForm {
    #[serde(default)]
    pub insurance_company: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date: String,
}

impl NewInsurancePaymentForm {
    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let company = require_text(&self.insurance_company, "Insurance company is required")?;
        let amount = parse_number(&self.amount, "Amount must be a number")?;
        let status = PayStatus::parse(&self.status).map_err(|e| invalid(&e.to_string()))?;
        let date = parse_form_date(&self.date, "Date must be YYYY-MM-DD")?;
        Ok(ValidCommand {
            method: Method::POST,
            path: "/pharmacist/insurance-payment".to_string(),
            body: json!({
                "insuranceCompany": company,
                "amount": amount,
                "status": status.as_str(),
                "date": date.map(|d| d.to_string()).unwrap_or_default(),
            }),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPurchaseForm {
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

impl NewPurchaseForm {
    pub fn validate(&self) -> Result<ValidCommand, CommandError> {
        let supplier = require_text(&self.supplier, "Supplier name is required")?;
        let total_amount = parse_count(&self.total_amount, "Total amount must be a non-negative whole number")?;
        let date = parse_form_date(&self.purchase_date, "Purchase date must be YYYY-MM-DD")?
            .ok_or_else(|| invalid("Purchase date is required"))?;
        let status =
            PurchaseStatus::parse(&self.status).ok_or_else(|| invalid("Unknown purchase status"))?;
        Ok(ValidCommand {
            method: Method::POST,
            path: "/stock-keeper/purchase".to_string(),
            body: json!({
                "medicineName": self.medicine_name.trim(),
                "totalAmount": total_amount,
                "supplier": supplier,
                "purchaseDate": format!("{}T00:00:00.000Z", date),
                "status": status.as_str(),
                "notes": self.notes.trim(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_username_and_known_role() {
        let form = RegisterUserForm {
            username: "  ".into(),
            password: "secret".into(),
            role: "cashier".into(),
        };
        assert!(form.validate().is_err());

        let form = RegisterUserForm {
            username: "grace".into(),
            password: "secret".into(),
            role: "supervisor".into(),
        };
        assert_eq!(form.validate().unwrap_err(), CommandError("Unknown role".into()));

        let form = RegisterUserForm {
            username: "grace".into(),
            password: "secret".into(),
            role: "stock-keeper".into(),
        };
        let command = form.validate().unwrap();
        assert_eq!(command.path, "/auth/register");
        assert_eq!(command.body["role"], "stock-keeper");
    }

    #[test]
    fn sale_totals_its_items_and_skips_blank_rows() {
        let form = NewSaleForm {
            medication_name: vec!["Amoxicillin".into(), "".into()],
            quantity: vec!["2".into(), "".into()],
            unit_price: vec!["500".into(), "".into()],
            payment_method: "CASH".into(),
            date: "2025-05-05".into(),
        };
        let command = form.validate().unwrap();
        assert_eq!(command.body["totalPrice"], 1000.0);
        assert_eq!(command.body["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn sale_with_no_items_is_rejected() {
        let form = NewSaleForm {
            payment_method: "CASH".into(),
            ..NewSaleForm::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn sale_rows_always_has_at_least_one_entry() {
        assert_eq!(NewSaleForm::default().rows().len(), 1);
    }

    #[test]
    fn earning_treats_blank_amounts_as_zero() {
        let form = NewEarningForm {
            pos_amount: "1500".into(),
            ..NewEarningForm::default()
        };
        let command = form.validate().unwrap();
        assert_eq!(command.body["posAmount"], 1500.0);
        assert_eq!(command.body["cashAmount"], 0.0);
    }

    #[test]
    fn earning_rejects_garbage_amounts() {
        let form = NewEarningForm {
            momo_amount: "lots".into(),
            ..NewEarningForm::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn update_stock_encodes_the_medicine_name() {
        let form = UpdateStockForm {
            name: "Vitamin C 500mg".into(),
            stock: "40".into(),
        };
        let command = form.validate().unwrap();
        assert_eq!(command.method, Method::PUT);
        assert_eq!(command.path, "/pharmacist/update-stock/Vitamin%20C%20500mg");
        assert_eq!(command.body["quantity"], 40);
    }

    #[test]
    fn insurance_payment_status_is_closed() {
        let form = NewInsurancePaymentForm {
            insurance_company: "RSSB".into(),
            amount: "500".into(),
            status: "Overdue".into(),
            date: String::new(),
        };
        assert!(form.validate().is_err());

        let form = NewInsurancePaymentForm {
            status: "Not Paid".into(),
            ..form
        };
        assert_eq!(form.validate().unwrap().body["status"], "Not Paid");
    }

    #[test]
    fn purchase_requires_a_date_and_known_status() {
        let base = NewPurchaseForm {
            supplier: "Kigali Depot".into(),
            total_amount: "2500".into(),
            purchase_date: "2025-05-02".into(),
            status: "credit".into(),
            ..NewPurchaseForm::default()
        };
        let command = base.validate().unwrap();
        assert_eq!(command.body["purchaseDate"], "2025-05-02T00:00:00.000Z");

        let missing_date = NewPurchaseForm {
            purchase_date: String::new(),
            ..base.clone()
        };
        assert!(missing_date.validate().is_err());

        let bad_status = NewPurchaseForm {
            status: "partial".into(),
            ..base
        };
        assert!(bad_status.validate().is_err());
    }

    #[test]
    fn medicine_checkbox_maps_to_a_bool() {
        let form = NewMedicineForm {
            name: "Paracetamol".into(),
            stock: "100".into(),
            price: "250".into(),
            description: "Pain relief".into(),
            available: Some("on".into()),
        };
        assert_eq!(form.validate().unwrap().body["available"], true);

        let unchecked = NewMedicineForm {
            available: None,
            name: "Paracetamol".into(),
            stock: "100".into(),
            price: "250".into(),
            description: String::new(),
        };
        assert_eq!(unchecked.validate().unwrap().body["available"], false);
    }
}
