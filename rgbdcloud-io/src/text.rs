//! printf-style number formatting shared by the text formats

/// `%.<precision>f`
pub fn format_fixed(value: f64, precision: usize) -> String {
    match non_finite(value) {
        Some(s) => s.to_string(),
        None => format!("{:.*}", precision, value),
    }
}

/// `%.<precision>e`: signed exponent with at least two digits, as C prints it
pub fn format_exponent(value: f64, precision: usize) -> String {
    if let Some(s) = non_finite(value) {
        return s.to_string();
    }
    let formatted = format!("{:.*e}", precision, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value == f64::INFINITY {
        Some("inf")
    } else if value == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}
