//! Canonical lexical forms of the numeric types.

use bigdecimal::BigDecimal;
use num_bigint::Sign;
use num_traits::Signed;

/// `xs:decimal` canonical form: no exponent, no trailing fractional zeros,
/// zero is `0`.
pub fn format_decimal(d: &BigDecimal) -> String {
    let (mantissa, scale) = d.as_bigint_and_exponent();
    if mantissa.sign() == Sign::NoSign {
        return "0".to_string();
    }
    let negative = mantissa.is_negative();
    let mut digits = mantissa.abs().to_string();
    let mut out = String::with_capacity(digits.len() + 3);
    if negative {
        out.push('-');
    }
    if scale <= 0 {
        out.push_str(&digits);
        for _ in 0..(-scale) {
            out.push('0');
        }
        return out;
    }
    let scale = usize::try_from(scale).unwrap_or(usize::MAX);
    if digits.len() <= scale {
        let pad = scale - digits.len() + 1;
        digits.insert_str(0, &"0".repeat(pad));
    }
    let (int_part, frac_part) = digits.split_at(digits.len() - scale);
    out.push_str(int_part);
    let frac = frac_part.trim_end_matches('0');
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `xs:double` canonical form.
pub fn format_double(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let abs = v.abs();
    if (1e-6..1e6).contains(&abs) {
        format!("{v}")
    } else {
        scientific(&format!("{v:E}"))
    }
}

/// `xs:float` canonical form; shortest digits that round-trip through `f32`.
pub fn format_float(v: f32) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let abs = v.abs();
    if (1e-6..1e6).contains(&abs) {
        format!("{v}")
    } else {
        scientific(&format!("{v:E}"))
    }
}

// "1E7" -> "1.0E7"
fn scientific(s: &str) -> String {
    match s.split_once('E') {
        Some((mantissa, exp)) if !mantissa.contains('.') => format!("{mantissa}.0E{exp}"),
        _ => s.to_string(),
    }
}
