//! Numeric classification, promotion and the arithmetic kernels.
//!
//! [`Num`] carries an operand after classification. Integer and decimal
//! arithmetic is exact (subject to the context's [`DecimalPolicy`]); float and
//! double follow IEEE 754 and surface NaN/INF as values rather than errors.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

use crate::consts::DECIMAL_DIV_MIN_SCALE;
use crate::engine::casting::parse_double;
use crate::engine::runtime::{DecimalPolicy, Error, ErrorCode, OverflowMode};
use crate::xdm::{XdmAtomicValue, format_decimal};
use crate::xdm::decimal::{align, div_half_even, integer_digits, normalize, pow10};

use super::ArithmeticOp;
use super::promotion::NumericType;

/// Numeric classification carrying the (possibly promoted) value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Num {
    Int(BigInt),
    Dec(BigDecimal),
    Float(f32),
    Double(f64),
}

impl Num {
    pub(crate) fn to_f64(&self) -> f64 {
        match self {
            Num::Int(i) => i.to_f64().unwrap_or(f64::NAN),
            Num::Dec(d) => format_decimal(d).parse().unwrap_or(f64::NAN),
            Num::Float(f) => f64::from(*f),
            Num::Double(d) => *d,
        }
    }

    fn to_f32(&self) -> f32 {
        match self {
            Num::Int(i) => i.to_f32().unwrap_or(f32::NAN),
            Num::Dec(d) => format_decimal(d).parse().unwrap_or(f32::NAN),
            Num::Float(f) => *f,
            // narrowing to the promoted float type
            Num::Double(d) => *d as f32,
        }
    }

    /// Lift into `target`, which must not be earlier in the promotion chain.
    pub(crate) fn promote(self, target: NumericType) -> Num {
        match (self, target) {
            (Num::Int(i), NumericType::Decimal) => Num::Dec(BigDecimal::from(i)),
            (n, NumericType::Float) => Num::Float(n.to_f32()),
            (n @ Num::Double(_), NumericType::Double) => n,
            (n, NumericType::Double) => Num::Double(n.to_f64()),
            (n, _) => n,
        }
    }

    pub(crate) fn into_value(self) -> XdmAtomicValue {
        match self {
            Num::Int(i) => XdmAtomicValue::Integer(i),
            Num::Dec(d) => XdmAtomicValue::Decimal(d),
            Num::Float(f) => XdmAtomicValue::Float(f),
            Num::Double(d) => XdmAtomicValue::Double(d),
        }
    }

    pub(crate) fn is_nan(&self) -> bool {
        match self {
            Num::Float(f) => f.is_nan(),
            Num::Double(d) => d.is_nan(),
            _ => false,
        }
    }
}

/// Classify a numeric operand. `xs:untypedAtomic` is cast to `xs:double`
/// (a malformed value raises `err:FORG0001`); anything else yields `None`.
pub(crate) fn classify(v: &XdmAtomicValue) -> Result<Option<Num>, Error> {
    Ok(match v {
        XdmAtomicValue::Integer(i) => Some(Num::Int(i.clone())),
        XdmAtomicValue::Decimal(d) => Some(Num::Dec(d.clone())),
        XdmAtomicValue::Float(f) => Some(Num::Float(*f)),
        XdmAtomicValue::Double(d) => Some(Num::Double(*d)),
        XdmAtomicValue::UntypedAtomic(s) => Some(Num::Double(parse_double(s)?)),
        _ => None,
    })
}

fn divide_by_zero(op: ArithmeticOp) -> Error {
    Error::from_code(ErrorCode::FOAR0001, format!("division by zero in '{op}'"))
}

/// Apply `op` to two operands already promoted to the same [`NumericType`].
pub(crate) fn apply(op: ArithmeticOp, a: Num, b: Num, policy: &DecimalPolicy) -> Result<Num, Error> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => integer_op(op, x, y, policy),
        (Num::Dec(x), Num::Dec(y)) => decimal_op(op, &x, &y, policy),
        (Num::Float(x), Num::Float(y)) => float_op(op, x, y),
        (Num::Double(x), Num::Double(y)) => double_op(op, x, y),
        (x, y) => Err(Error::type_error(format!(
            "operands of '{op}' were not promoted to one type: {x:?} and {y:?}"
        ))),
    }
}

fn integer_op(op: ArithmeticOp, x: BigInt, y: BigInt, policy: &DecimalPolicy) -> Result<Num, Error> {
    let r = match op {
        ArithmeticOp::Add => x + y,
        ArithmeticOp::Sub => x - y,
        ArithmeticOp::Mul => x * y,
        ArithmeticOp::Div => {
            return decimal_op(op, &BigDecimal::from(x), &BigDecimal::from(y), policy);
        }
        ArithmeticOp::IDiv => {
            if y.is_zero() {
                return Err(divide_by_zero(op));
            }
            x / y
        }
        ArithmeticOp::Mod => {
            if y.is_zero() {
                return Err(divide_by_zero(op));
            }
            x % y
        }
    };
    apply_integer_policy(r, policy).map(Num::Int)
}

fn decimal_op(op: ArithmeticOp, x: &BigDecimal, y: &BigDecimal, policy: &DecimalPolicy) -> Result<Num, Error> {
    if matches!(op, ArithmeticOp::Div | ArithmeticOp::IDiv | ArithmeticOp::Mod) && y.is_zero() {
        return Err(divide_by_zero(op));
    }
    let r = match op {
        ArithmeticOp::Add => x + y,
        ArithmeticOp::Sub => x - y,
        ArithmeticOp::Mul => x * y,
        ArithmeticOp::Div => divide_decimal(x, y),
        ArithmeticOp::IDiv => {
            let (mx, my, _) = align(x, y);
            return apply_integer_policy(mx / my, policy).map(Num::Int);
        }
        ArithmeticOp::Mod => {
            // x - y * trunc(x / y), computed on the common scale
            let (mx, my, scale) = align(x, y);
            BigDecimal::new(mx % my, scale)
        }
    };
    apply_decimal_policy(normalize(r), policy).map(Num::Dec)
}

/// `x / y` with scale `max(18, scale(x), scale(y))`, rounded half-to-even.
/// `y` must be non-zero.
pub(crate) fn divide_decimal(x: &BigDecimal, y: &BigDecimal) -> BigDecimal {
    let (mx, my, common) = align(x, y);
    let scale = DECIMAL_DIV_MIN_SCALE.max(common);
    let q = div_half_even(&(mx * pow10(scale.unsigned_abs())), &my);
    normalize(BigDecimal::new(q, scale))
}

fn float_op(op: ArithmeticOp, x: f32, y: f32) -> Result<Num, Error> {
    Ok(match op {
        ArithmeticOp::Add => Num::Float(x + y),
        ArithmeticOp::Sub => Num::Float(x - y),
        ArithmeticOp::Mul => Num::Float(x * y),
        ArithmeticOp::Div => Num::Float(x / y),
        ArithmeticOp::Mod => Num::Float(x % y),
        ArithmeticOp::IDiv => Num::Int(float_idiv_single(x, y)?),
    })
}

fn double_op(op: ArithmeticOp, x: f64, y: f64) -> Result<Num, Error> {
    Ok(match op {
        ArithmeticOp::Add => Num::Double(x + y),
        ArithmeticOp::Sub => Num::Double(x - y),
        ArithmeticOp::Mul => Num::Double(x * y),
        ArithmeticOp::Div => Num::Double(x / y),
        // `%` is fmod: NaN for ±INF dividend or zero divisor, x for ±INF
        // divisor, sign of the dividend otherwise
        ArithmeticOp::Mod => Num::Double(x % y),
        ArithmeticOp::IDiv => Num::Int(float_idiv(x, y)?),
    })
}

fn check_idiv_operands(x: f64, y: f64) -> Result<(), Error> {
    if y == 0.0 {
        return Err(divide_by_zero(ArithmeticOp::IDiv));
    }
    if x.is_nan() || y.is_nan() || x.is_infinite() {
        return Err(Error::from_code(
            ErrorCode::FOAR0002,
            format!("'idiv' operand {x} has no integer quotient"),
        ));
    }
    Ok(())
}

fn truncate_quotient(q: f64) -> Result<BigInt, Error> {
    BigInt::from_f64(q.trunc()).ok_or_else(|| Error::from_code(ErrorCode::FOAR0002, "'idiv' quotient out of range"))
}

fn float_idiv(x: f64, y: f64) -> Result<BigInt, Error> {
    check_idiv_operands(x, y)?;
    truncate_quotient(x / y)
}

// the quotient is rounded to f32 before truncation
fn float_idiv_single(x: f32, y: f32) -> Result<BigInt, Error> {
    check_idiv_operands(f64::from(x), f64::from(y))?;
    truncate_quotient(f64::from(x / y))
}

pub(crate) fn negate(n: Num) -> Num {
    match n {
        Num::Int(i) => Num::Int(-i),
        Num::Dec(d) => Num::Dec(-d),
        Num::Float(f) => Num::Float(-f),
        Num::Double(d) => Num::Double(-d),
    }
}

fn saturated(max_digits: u32, negative: bool) -> BigInt {
    let max = pow10(u64::from(max_digits)) - 1u8;
    if negative { -max } else { max }
}

fn overflow(value: &dyn core::fmt::Display, max_digits: u32) -> Error {
    Error::from_code(
        ErrorCode::FOAR0002,
        format!("result {value} exceeds {max_digits} significant digits"),
    )
}

pub(crate) fn apply_integer_policy(value: BigInt, policy: &DecimalPolicy) -> Result<BigInt, Error> {
    let Some(max_digits) = policy.max_digits else {
        return Ok(value);
    };
    let digits = if value.is_zero() { 0 } else { value.abs().to_string().len() as u64 };
    if digits <= u64::from(max_digits) {
        return Ok(value);
    }
    match policy.on_overflow {
        OverflowMode::Error => Err(overflow(&value, max_digits)),
        OverflowMode::Saturate => {
            tracing::debug!(value = %value, max_digits, "integer result saturated");
            Ok(saturated(max_digits, value.is_negative()))
        }
    }
}

pub(crate) fn apply_decimal_policy(value: BigDecimal, policy: &DecimalPolicy) -> Result<BigDecimal, Error> {
    let Some(max_digits) = policy.max_digits else {
        return Ok(value);
    };
    let limit = u64::from(max_digits);
    let mut value = value;
    let int_digits = integer_digits(&value);
    if int_digits <= limit {
        // surplus fractional digits are rounded away
        let room = i64::try_from(limit - int_digits).unwrap_or(i64::MAX);
        let (mantissa, scale) = value.as_bigint_and_exponent();
        if scale > room {
            let rounded = div_half_even(&mantissa, &pow10(scale.abs_diff(room)));
            tracing::debug!(value = %value, scale = room, "decimal result rounded");
            value = normalize(BigDecimal::new(rounded, room));
        }
    }
    if integer_digits(&value) <= limit {
        return Ok(value);
    }
    match policy.on_overflow {
        OverflowMode::Error => Err(overflow(&value, max_digits)),
        OverflowMode::Saturate => {
            tracing::debug!(value = %value, max_digits, "decimal result saturated");
            Ok(BigDecimal::from(saturated(max_digits, value.is_negative())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn run_dec(op: ArithmeticOp, a: &str, b: &str) -> Result<Num, Error> {
        apply(op, Num::Dec(dec(a)), Num::Dec(dec(b)), &DecimalPolicy::unbounded())
    }

    #[test]
    fn decimal_quotient_uses_eighteen_digit_floor() {
        let Num::Dec(q) = run_dec(ArithmeticOp::Div, "1", "3").unwrap() else { panic!() };
        assert_eq!(q, dec("0.333333333333333333"));
        let Num::Dec(q) = run_dec(ArithmeticOp::Div, "2", "3").unwrap() else { panic!() };
        assert_eq!(q, dec("0.666666666666666667"));
    }

    #[rstest]
    #[case("10", "3", "1")]
    #[case("-10", "3", "-1")]
    #[case("10", "-3", "1")]
    #[case("5.5", "2", "1.5")]
    #[case("-5.5", "2", "-1.5")]
    fn decimal_mod_truncates(#[case] a: &str, #[case] b: &str, #[case] expected: &str) {
        assert_eq!(run_dec(ArithmeticOp::Mod, a, b).unwrap(), Num::Dec(dec(expected)));
    }

    #[test]
    fn decimal_idiv_yields_integer() {
        assert_eq!(run_dec(ArithmeticOp::IDiv, "-7.5", "2").unwrap(), Num::Int(BigInt::from(-3)));
        assert_eq!(run_dec(ArithmeticOp::IDiv, "7.5", "0").unwrap_err().code_enum(), ErrorCode::FOAR0001);
    }

    #[test]
    fn float_idiv_rules() {
        assert_eq!(float_idiv(7.0, 0.0).unwrap_err().code_enum(), ErrorCode::FOAR0001);
        assert_eq!(float_idiv(f64::NAN, 2.0).unwrap_err().code_enum(), ErrorCode::FOAR0002);
        assert_eq!(float_idiv(f64::INFINITY, 2.0).unwrap_err().code_enum(), ErrorCode::FOAR0002);
        assert_eq!(float_idiv(5.0, f64::INFINITY).unwrap(), BigInt::zero());
        assert_eq!(float_idiv(-7.5, 2.0).unwrap(), BigInt::from(-3));
    }

    #[test]
    fn single_precision_idiv_truncates_the_f32_quotient() {
        assert_eq!(float_idiv_single(1.0, 0.1).unwrap(), BigInt::from(10));
        assert_eq!(float_idiv_single(f32::MAX, f32::MIN_POSITIVE).unwrap_err().code_enum(), ErrorCode::FOAR0002);
        assert_eq!(float_idiv_single(1.0, 0.0).unwrap_err().code_enum(), ErrorCode::FOAR0001);
    }

    #[test]
    fn promotion_lifts_through_chain() {
        assert_eq!(Num::Int(BigInt::from(2)).promote(NumericType::Decimal), Num::Dec(dec("2")));
        assert_eq!(Num::Dec(dec("0.5")).promote(NumericType::Float), Num::Float(0.5));
        assert_eq!(Num::Float(0.5).promote(NumericType::Double), Num::Double(0.5));
        assert_eq!(Num::Int(BigInt::from(3)).promote(NumericType::Integer), Num::Int(BigInt::from(3)));
    }

    #[rstest]
    #[case(OverflowMode::Error, None)]
    #[case(OverflowMode::Saturate, Some("999"))]
    fn bounded_integer_policy(#[case] mode: OverflowMode, #[case] expected: Option<&str>) {
        let policy = DecimalPolicy::bounded(3, mode);
        let r = apply_integer_policy(BigInt::from(1000), &policy);
        match expected {
            Some(v) => assert_eq!(r.unwrap().to_string(), v),
            None => assert_eq!(r.unwrap_err().code_enum(), ErrorCode::FOAR0002),
        }
        assert_eq!(apply_integer_policy(BigInt::from(-999), &policy).unwrap(), BigInt::from(-999));
    }

    #[test]
    fn bounded_decimal_policy_rounds_fraction_then_checks_integer_part() {
        let policy = DecimalPolicy::bounded(4, OverflowMode::Error);
        assert_eq!(apply_decimal_policy(dec("12.3456"), &policy).unwrap(), dec("12.35"));
        assert_eq!(apply_decimal_policy(dec("0.00005"), &policy).unwrap(), dec("0"));
        assert_eq!(
            apply_decimal_policy(dec("9999.5"), &policy).unwrap_err().code_enum(),
            ErrorCode::FOAR0002
        );
        let saturate = DecimalPolicy::bounded(4, OverflowMode::Saturate);
        assert_eq!(apply_decimal_policy(dec("-123456.7"), &saturate).unwrap(), dec("-9999"));
    }
}
