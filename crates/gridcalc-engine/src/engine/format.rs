//! Number <-> result text conversions.
//!
//! Cell results travel between cells as text. Formatting uses the shortest
//! round-tripping digits (decimal for `1e-6 <= |n| < 1e21`, exponential with a
//! signed exponent otherwise), and reading a result back takes the longest
//! numeric prefix, so `"12 apples"` reads as 12 and `"eval error ..."` as NaN.

use regex::Regex;
use std::sync::OnceLock;

/// Format a computed number as result text.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0 as well.
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return n.to_string();
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

fn leading_float_re() -> &'static Regex {
    static FLOAT_RE: OnceLock<Regex> = OnceLock::new();
    FLOAT_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("leading float regex must compile")
    })
}

/// Read the numeric prefix of a result string, if it has one.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let prefix = leading_float_re().find(text)?.as_str();
    match prefix.trim_start_matches(['+', '-']) {
        "Infinity" if prefix.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => prefix.parse::<f64>().ok(),
    }
}

/// Read result text as an operand; text without a numeric prefix is NaN.
pub fn result_to_number(text: &str) -> f64 {
    parse_leading_float(text).unwrap_or(f64::NAN)
}
