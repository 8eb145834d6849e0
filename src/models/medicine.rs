use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::lenient;
use crate::aggregate::Searchable;
use crate::filters::{format_amount, format_date};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Searchable for Medicine {
    fn haystack(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }
}

#[derive(Debug, Clone)]
pub struct MedicineRow {
    pub name: String,
    pub stock: i64,
    pub price: String,
    pub description: String,
    pub available: bool,
    pub created_at: String,
}

impl From<&Medicine> for MedicineRow {
    fn from(medicine: &Medicine) -> Self {
        Self {
            name: medicine.name.clone(),
            stock: medicine.stock,
            price: format_amount(medicine.price),
            description: medicine.description.clone(),
            available: medicine.available,
            created_at: format_date(&medicine.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn medicine_decodes_wire_shape() {
        let medicine: Medicine = serde_json::from_value(json!({
            "_id": "64af",
            "name": "Paracetamol",
            "stock": 120,
            "price": "250",
            "description": "Pain relief",
            "available": true,
            "createdAt": "2025-04-01T08:30:00Z"
        }))
        .unwrap();
        assert_eq!(medicine.price, 250.0);
        let row = MedicineRow::from(&medicine);
        assert_eq!(row.created_at, "2025-04-01");
        assert!(row.available);
    }

    #[test]
    fn search_covers_name_and_description() {
        let medicine = Medicine {
            name: "Amoxicillin".into(),
            description: "Antibiotic capsules".into(),
            ..Medicine::default()
        };
        assert_eq!(medicine.haystack(), vec!["Amoxicillin", "Antibiotic capsules"]);
    }
}
