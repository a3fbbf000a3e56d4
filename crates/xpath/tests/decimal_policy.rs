use rstest::rstest;
use xpath_operators::engine::casting::parse_atomic;
use xpath_operators::{
    ArithmeticOp, AtomicType, DecimalPolicy, ErrorCode, OperatorContext, OperatorContextBuilder, OverflowMode,
    XdmAtomicValue as A, evaluate_arithmetic,
};

fn dec(lexical: &str) -> A {
    parse_atomic(AtomicType::Decimal, lexical).unwrap()
}

fn ctx(max_digits: u32, mode: OverflowMode) -> OperatorContext {
    OperatorContextBuilder::new()
        .with_decimal_policy(DecimalPolicy::bounded(max_digits, mode))
        .build()
}

#[test]
fn unbounded_by_default() {
    let big = dec("99999999999999999999999999999999999999");
    let v = evaluate_arithmetic(ArithmeticOp::Mul, &big, &big, &OperatorContext::default()).unwrap();
    assert_eq!(v.to_string().len(), 76);
}

#[rstest]
#[case(ArithmeticOp::Add, "99999", "1")]
#[case(ArithmeticOp::Mul, "-1000", "100")]
#[case(ArithmeticOp::Sub, "-99999", "1")]
fn overflow_raises_under_error_mode(#[case] op: ArithmeticOp, #[case] l: &str, #[case] r: &str) {
    let err = evaluate_arithmetic(op, &dec(l), &dec(r), &ctx(5, OverflowMode::Error)).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::FOAR0002);
}

#[rstest]
#[case(ArithmeticOp::Add, "99999", "1", "99999")]
#[case(ArithmeticOp::Mul, "-1000", "100", "-99999")]
#[case(ArithmeticOp::Add, "1.5", "2.25", "3.75")]
fn saturate_mode_clamps(#[case] op: ArithmeticOp, #[case] l: &str, #[case] r: &str, #[case] expected: &str) {
    let v = evaluate_arithmetic(op, &dec(l), &dec(r), &ctx(5, OverflowMode::Saturate)).unwrap();
    assert_eq!(v.to_string(), expected);
}

#[test]
fn integer_results_share_the_policy() {
    let l = A::integer(99_999);
    let err = evaluate_arithmetic(ArithmeticOp::Add, &l, &A::integer(1), &ctx(5, OverflowMode::Error)).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::FOAR0002);
    let v = evaluate_arithmetic(ArithmeticOp::Add, &l, &A::integer(1), &ctx(5, OverflowMode::Saturate)).unwrap();
    assert_eq!(v, A::integer(99_999));
}

#[test]
fn bounded_quotient_rounds_half_even() {
    let v = evaluate_arithmetic(ArithmeticOp::Div, &dec("2"), &dec("3"), &ctx(5, OverflowMode::Error)).unwrap();
    assert_eq!(v.to_string(), "0.66667");
    let v = evaluate_arithmetic(ArithmeticOp::Div, &dec("1"), &dec("8"), &ctx(2, OverflowMode::Error)).unwrap();
    assert_eq!(v.to_string(), "0.12");
}

#[test]
fn floats_ignore_the_policy() {
    let v = evaluate_arithmetic(
        ArithmeticOp::Mul,
        &A::Double(1e300),
        &A::Double(10.0),
        &ctx(5, OverflowMode::Error),
    )
    .unwrap();
    assert_eq!(v.to_string(), "1.0E301");
}
