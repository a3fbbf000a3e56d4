use xpath_operators::engine::casting::{parse_date, parse_day_time_duration, parse_year_month_duration};
use xpath_operators::{
    ArithmeticOp, AtomicType, ErrorCode, OperatorContext, XdmAtomicValue as A, evaluate_arithmetic, treat_as,
};

// Stand-in for a user function declared `as xs:duration`.
fn returns_duration(value: A) -> A {
    treat_as(value, AtomicType::Duration).expect("declared xs:duration")
}

#[test]
fn day_time_duration_behind_duration_declaration_adds_to_date() {
    let ctx = OperatorContext::default();
    let d = returns_duration(A::DayTimeDuration(parse_day_time_duration("P3D").unwrap()));
    assert_eq!(d.kind(), AtomicType::DayTimeDuration);
    let date = A::Date(parse_date("2004-10-30").unwrap());
    let v = evaluate_arithmetic(ArithmeticOp::Add, &date, &d, &ctx).unwrap();
    assert_eq!(v.to_string(), "2004-11-02");
}

#[test]
fn year_month_duration_behind_duration_declaration_adds_to_date() {
    let ctx = OperatorContext::default();
    let d = returns_duration(A::YearMonthDuration(parse_year_month_duration("P1M").unwrap()));
    let date = A::Date(parse_date("2004-01-31").unwrap());
    let v = evaluate_arithmetic(ArithmeticOp::Add, &d, &date, &ctx).unwrap();
    assert_eq!(v.to_string(), "2004-02-29");
}

#[test]
fn mismatched_dynamic_duration_kinds_still_fail() {
    let ctx = OperatorContext::default();
    let a = returns_duration(A::YearMonthDuration(parse_year_month_duration("P1Y").unwrap()));
    let b = returns_duration(A::DayTimeDuration(parse_day_time_duration("PT1H").unwrap()));
    let err = evaluate_arithmetic(ArithmeticOp::Add, &a, &b, &ctx).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::XPTY0004);
    assert_eq!(err.format_code(), "err:XPTY0004");
}

#[test]
fn declaration_rejects_non_durations() {
    let err = treat_as(A::integer(3), AtomicType::Duration).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::XPTY0004);
    assert!(treat_as(A::integer(3), AtomicType::Numeric).is_ok());
}
