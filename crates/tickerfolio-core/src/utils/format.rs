/// Placeholder for a value the backend did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum fraction digits for grouped amounts
const GROUPED_FRACTION_DIGITS: usize = 3;

/// Format a number with thousands separators and at most three fraction
/// digits, trailing zeros dropped: `1234567.891` -> `1,234,567.891`.
pub fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.*}", GROUPED_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Format an optional percentage with two decimals: `12.35%`, or `N/A`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}
