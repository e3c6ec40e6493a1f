/// Group the integer part with `.` every three digits (Italian style)
fn group_thousands(units: i64) -> String {
    let digits = units.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a euro amount, e.g. `1.234,56 €`
pub fn format_euro(value: f64) -> String {
    let total_cents = (value.abs() * 100.0).round() as i64;
    let euros = group_thousands(total_cents / 100);
    let sign = if value < 0.0 && total_cents > 0 { "-" } else { "" };
    format!("{sign}{euros},{:02} €", total_cents % 100)
}

/// Format a euro amount without cents (for tight columns)
pub fn format_euro_short(value: f64) -> String {
    let euros = value.abs().round() as i64;
    let sign = if value < 0.0 && euros > 0 { "-" } else { "" };
    format!("{sign}{} €", group_thousands(euros))
}

/// Format a fraction as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format an optional fraction, `n/a` when undefined
pub fn format_optional_percentage(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_percentage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_euro() {
        assert_eq!(format_euro(0.0), "0,00 €");
        assert_eq!(format_euro(1_234.5), "1.234,50 €");
        assert_eq!(format_euro(-987_654.321), "-987.654,32 €");
        assert_eq!(format_euro(0.999), "1,00 €");
        assert_eq!(format_euro(-0.001), "0,00 €");
    }

    #[test]
    fn test_format_euro_short() {
        assert_eq!(format_euro_short(1_234_567.8), "1.234.568 €");
        assert_eq!(format_euro_short(-999.4), "-999 €");
        assert_eq!(format_euro_short(-0.2), "0 €");
    }

    #[test]
    fn test_percentages() {
        assert_eq!(format_percentage(0.071_77), "7.18%");
        assert_eq!(format_optional_percentage(None), "n/a");
        assert_eq!(format_optional_percentage(Some(-0.05)), "-5.00%");
    }
}
