use chrono::{DateTime, Utc};

/// Thousands-separated amount. Figures are whole Rwf, so fractions are
/// rounded away.
pub fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = amount.abs().round() as i64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_date(value: &Option<DateTime<Utc>>) -> String {
    match value {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(950.0), "950");
        assert_eq!(format_amount(1234.0), "1,234");
        assert_eq!(format_amount(1234567.0), "1,234,567");
        assert_eq!(format_amount(-4500.0), "-4,500");
    }

    #[test]
    fn fractions_round_to_whole_rwf() {
        assert_eq!(format_amount(1999.6), "2,000");
    }

    #[test]
    fn absent_dates_show_na() {
        assert_eq!(format_date(&None), "N/A");
        let date = Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap();
        assert_eq!(format_date(&Some(date)), "2025-05-05");
    }
}
