// Human friendly numbers: 1234 stars reads better as 1.2k

const SUFFIXES: [(f64, &str); 6] = [
    (1e18, "E"),
    (1e15, "P"),
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
];

/// Format a number with one decimal and a metric suffix, trailing zeros dropped
pub fn compact_number(value: f64) -> String {
    if value.is_nan() {
        return "?".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if value < 0.0 {
        return format!("-{}", compact_number(-value));
    }

    let (scaled, suffix) = SUFFIXES
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(threshold, suffix)| (value / threshold, *suffix))
        .unwrap_or((value, ""));

    format!("{}{}", trim_zeros(format!("{:.1}", scaled)), suffix)
}

/// `$` prefixed price label for sliders and cards
pub fn price_label(value: f64) -> String {
    format!("${}", compact_number(value))
}

fn trim_zeros(mut formatted: String) -> String {
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_number() {
        assert_eq!(compact_number(0.0), "0");
        assert_eq!(compact_number(20.0), "20");
        assert_eq!(compact_number(999.0), "999");
        assert_eq!(compact_number(1000.0), "1k");
        assert_eq!(compact_number(1234.0), "1.2k");
        assert_eq!(compact_number(15_300.0), "15.3k");
        assert_eq!(compact_number(2_500_000.0), "2.5M");
        assert_eq!(compact_number(7e9), "7G");
    }

    #[test]
    fn test_small_and_odd_values() {
        assert_eq!(compact_number(0.5), "0.5");
        assert_eq!(compact_number(-1500.0), "-1.5k");
        assert_eq!(compact_number(f64::INFINITY), "∞");
    }

    #[test]
    fn test_price_label() {
        assert_eq!(price_label(49.99), "$50");
        assert_eq!(price_label(1500.0), "$1.5k");
    }
}
