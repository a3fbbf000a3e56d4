//! Mantissa/scale helpers shared by the decimal engine and the duration model.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

pub(crate) fn pow10(exp: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), usize::try_from(exp).unwrap_or(usize::MAX))
}

/// Bring both operands onto a common non-negative scale `s`, returning the
/// integer mantissas `a * 10^s` and `b * 10^s`.
pub(crate) fn align(a: &BigDecimal, b: &BigDecimal) -> (BigInt, BigInt, i64) {
    let (ma, sa) = a.as_bigint_and_exponent();
    let (mb, sb) = b.as_bigint_and_exponent();
    let s = sa.max(sb).max(0);
    (rescale(ma, sa, s), rescale(mb, sb, s), s)
}

// s >= scale always holds at the call sites.
fn rescale(mantissa: BigInt, scale: i64, s: i64) -> BigInt {
    mantissa * pow10(s.abs_diff(scale))
}

/// Integer part, rounding toward zero.
pub(crate) fn trunc_to_bigint(d: &BigDecimal) -> BigInt {
    let (m, scale) = d.as_bigint_and_exponent();
    if scale <= 0 {
        m * pow10(scale.unsigned_abs())
    } else {
        m / pow10(scale.unsigned_abs())
    }
}

/// `num / den` rounded half-to-even. `den` must be non-zero.
pub(crate) fn div_half_even(num: &BigInt, den: &BigInt) -> BigInt {
    let q = num / den;
    let r = num % den;
    if r.is_zero() {
        return q;
    }
    let twice = r.abs() * 2u8;
    let den_abs = den.abs();
    let negative = num.is_negative() != den.is_negative();
    let away = match twice.cmp(&den_abs) {
        core::cmp::Ordering::Greater => true,
        core::cmp::Ordering::Less => false,
        core::cmp::Ordering::Equal => (&q % 2u8) != BigInt::zero(),
    };
    if !away {
        q
    } else if negative {
        q - BigInt::one()
    } else {
        q + BigInt::one()
    }
}

/// `num / den` rounded half toward positive infinity (`floor(q + 1/2)`).
/// `den` must be non-zero.
pub(crate) fn div_half_up(num: &BigInt, den: &BigInt) -> BigInt {
    let (num, den) = if den.is_negative() { (-num, -den) } else { (num.clone(), den.clone()) };
    let n = num * 2u8 + &den;
    let d = den * 2u8;
    let q = &n / &d;
    if (&n % &d).is_negative() { q - BigInt::one() } else { q }
}

fn digit_count(i: &BigInt) -> i64 {
    if i.is_zero() { 0 } else { i64::try_from(i.abs().to_string().len()).unwrap_or(i64::MAX) }
}

/// `a / b` rounded half-to-even to `precision` significant digits.
/// `b` must be non-zero.
pub(crate) fn div_significant(a: &BigDecimal, b: &BigDecimal, precision: u32) -> BigDecimal {
    let (ma, mb, _) = align(a, b);
    if ma.is_zero() {
        return BigDecimal::zero();
    }
    let precision = i64::from(precision);
    // ma * 10^e / mb then has `precision` or `precision + 1` integer digits
    let mut e = precision - (digit_count(&ma) - digit_count(&mb));
    let scaled = |e: i64| {
        if e >= 0 {
            (&ma * pow10(e.unsigned_abs()), mb.clone())
        } else {
            (ma.clone(), &mb * pow10(e.unsigned_abs()))
        }
    };
    let (n, d) = scaled(e);
    if digit_count(&(&n / &d)) > precision {
        e -= 1;
    }
    let (n, d) = scaled(e);
    normalize(BigDecimal::new(div_half_even(&n, &d), e))
}

/// Number of digits left of the decimal point (0 for |d| < 1).
pub(crate) fn integer_digits(d: &BigDecimal) -> u64 {
    let int = trunc_to_bigint(d);
    if int.is_zero() { 0 } else { int.abs().to_string().len() as u64 }
}

/// Drop trailing fractional zeros without touching the value.
pub(crate) fn normalize(d: BigDecimal) -> BigDecimal {
    let (mut m, mut scale) = d.into_bigint_and_exponent();
    if m.is_zero() {
        return BigDecimal::new(m, 0);
    }
    let ten = BigInt::from(10u8);
    while scale > 0 && (&m % &ten).is_zero() {
        m /= &ten;
        scale -= 1;
    }
    BigDecimal::new(m, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5, 2, 2)]
    #[case(7, 2, 4)]
    #[case(-5, 2, -2)]
    #[case(-7, 2, -4)]
    #[case(10, 3, 3)]
    #[case(11, 3, 4)]
    #[case(-11, -3, 4)]
    fn half_even_rounding(#[case] num: i64, #[case] den: i64, #[case] expected: i64) {
        assert_eq!(div_half_even(&BigInt::from(num), &BigInt::from(den)), BigInt::from(expected));
    }

    #[rstest]
    #[case(5, 2, 3)]
    #[case(-5, 2, -2)]
    #[case(7, -2, -3)]
    #[case(4, 3, 1)]
    #[case(-4, 3, -1)]
    #[case(49_999, 100_000, 0)]
    fn half_up_rounding(#[case] num: i64, #[case] den: i64, #[case] expected: i64) {
        assert_eq!(div_half_up(&BigInt::from(num), &BigInt::from(den)), BigInt::from(expected));
    }

    #[rstest]
    #[case("24", "7", "3.428571428571429")]
    #[case("1", "3", "0.3333333333333333")]
    #[case("-2", "3", "-0.6666666666666667")]
    #[case("10", "4", "2.5")]
    #[case("1e20", "3", "33333333333333330000")]
    #[case("0", "7", "0")]
    fn significant_digit_quotients(#[case] a: &str, #[case] b: &str, #[case] expected: &str) {
        let q = div_significant(&a.parse().unwrap(), &b.parse().unwrap(), 16);
        assert_eq!(q, expected.parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn truncation_goes_toward_zero() {
        let d: BigDecimal = "-2.75".parse().unwrap();
        assert_eq!(trunc_to_bigint(&d), BigInt::from(-2));
        assert_eq!(integer_digits(&"123.4".parse().unwrap()), 3);
        assert_eq!(integer_digits(&"0.4".parse().unwrap()), 0);
    }

    #[test]
    fn normalize_strips_zeros() {
        let d = normalize(BigDecimal::new(BigInt::from(1500), 3));
        assert_eq!(d.as_bigint_and_exponent(), (BigInt::from(15), 1));
    }
}
