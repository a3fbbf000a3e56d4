use rstest::rstest;
use xpath_operators::engine::casting::parse_atomic;
use xpath_operators::{
    ArithmeticOp, AtomicType, ComparisonOp, Error, ErrorCode, OperatorContext, OperatorContextBuilder,
    XdmAtomicValue as A, compare_atomic, evaluate_arithmetic,
};

fn atom(t: AtomicType, lexical: &str) -> A {
    parse_atomic(t, lexical).unwrap()
}

fn dtd(lexical: &str) -> A {
    atom(AtomicType::DayTimeDuration, lexical)
}

fn ymd(lexical: &str) -> A {
    atom(AtomicType::YearMonthDuration, lexical)
}

fn eval(op: ArithmeticOp, l: &A, r: &A) -> Result<A, Error> {
    evaluate_arithmetic(op, l, r, &OperatorContext::default())
}

#[test]
fn day_time_durations_add_and_renormalize() {
    let v = eval(ArithmeticOp::Add, &dtd("P2DT12H5M"), &dtd("P5DT12H")).unwrap();
    assert_eq!(v.to_string(), "P8DT5M");
}

#[rstest]
#[case(AtomicType::DayTimeDuration, "P3DT4H3M3.1S", "PT0S")]
#[case(AtomicType::DayTimeDuration, "-PT1M30.25S", "PT0S")]
#[case(AtomicType::YearMonthDuration, "P1Y2M", "P0M")]
#[case(AtomicType::YearMonthDuration, "-P7M", "P0M")]
fn adding_zero_duration_is_identity(#[case] t: AtomicType, #[case] lexical: &str, #[case] zero: &str) {
    let d = atom(t, lexical);
    let sum = eval(ArithmeticOp::Add, &d, &atom(t, zero)).unwrap();
    assert!(compare_atomic(ComparisonOp::Eq, &sum, &d, &OperatorContext::default()).unwrap());
    assert_eq!(sum.to_string(), d.to_string());
    assert_eq!(atom(t, &sum.to_string()), d);
}

#[rstest]
#[case(ArithmeticOp::Add)]
#[case(ArithmeticOp::Sub)]
#[case(ArithmeticOp::Div)]
fn mixing_duration_kinds_is_type_error(#[case] op: ArithmeticOp) {
    let err = eval(op, &ymd("P1Y"), &dtd("P1D")).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::XPTY0004);
    let err = eval(op, &dtd("P1D"), &ymd("P1Y")).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::XPTY0004);
}

#[test]
fn year_month_subtraction() {
    let v = eval(ArithmeticOp::Sub, &ymd("P1Y"), &ymd("P1Y3M")).unwrap();
    assert_eq!(v.to_string(), "-P3M");
}

#[rstest]
#[case("2024-01-31", "P1M", "2024-02-29")]
#[case("2023-01-31", "P1M", "2023-02-28")]
#[case("2024-02-29", "P1Y", "2025-02-28")]
#[case("2000-10-30-05:00", "P1Y2M", "2001-12-30-05:00")]
#[case("2024-03-31", "-P1M", "2024-02-29")]
fn date_plus_year_month_clamps_day(#[case] date: &str, #[case] dur: &str, #[case] expected: &str) {
    let v = eval(ArithmeticOp::Add, &atom(AtomicType::Date, date), &ymd(dur)).unwrap();
    assert_eq!(v.to_string(), expected);
}

#[test]
fn duration_plus_date_commutes() {
    let date = atom(AtomicType::Date, "2004-10-30Z");
    let d = dtd("P2DT2H30M0S");
    let a = eval(ArithmeticOp::Add, &date, &d).unwrap();
    let b = eval(ArithmeticOp::Add, &d, &date).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "2004-11-01Z");
}

#[test]
fn duration_minus_date_is_type_error() {
    let err = eval(ArithmeticOp::Sub, &dtd("P1D"), &atom(AtomicType::Date, "2004-10-30")).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::XPTY0004);
}

#[rstest]
#[case("2000-10-30T11:12:00", "P3DT1H15M", ArithmeticOp::Add, "2000-11-02T12:27:00")]
#[case("2000-10-30T11:12:00", "P3DT1H15M", ArithmeticOp::Sub, "2000-10-27T09:57:00")]
#[case("2000-12-31T23:59:59.5Z", "PT0.5S", ArithmeticOp::Add, "2001-01-01T00:00:00Z")]
fn date_time_plus_day_time(#[case] dt: &str, #[case] dur: &str, #[case] op: ArithmeticOp, #[case] expected: &str) {
    let v = eval(op, &atom(AtomicType::DateTime, dt), &dtd(dur)).unwrap();
    assert_eq!(v.to_string(), expected);
}

#[test]
fn date_time_plus_year_month_keeps_time_and_offset() {
    let v = eval(ArithmeticOp::Add, &atom(AtomicType::DateTime, "2000-01-31T10:00:00+02:00"), &ymd("P1M")).unwrap();
    assert_eq!(v.to_string(), "2000-02-29T10:00:00+02:00");
}

#[rstest]
#[case("11:12:00", "P3DT1H15M", ArithmeticOp::Add, "12:27:00")]
#[case("23:00:00+03:00", "PT2H", ArithmeticOp::Add, "01:00:00+03:00")]
#[case("08:20:00-05:00", "P23DT10H10M", ArithmeticOp::Sub, "22:10:00-05:00")]
fn time_wraps_around_midnight(#[case] t: &str, #[case] dur: &str, #[case] op: ArithmeticOp, #[case] expected: &str) {
    let v = eval(op, &atom(AtomicType::Time, t), &dtd(dur)).unwrap();
    assert_eq!(v.to_string(), expected);
}

#[test]
fn time_plus_year_month_is_type_error() {
    let err = eval(ArithmeticOp::Add, &atom(AtomicType::Time, "10:00:00"), &ymd("P1M")).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::XPTY0004);
}

#[test]
fn subtracting_temporals_gives_day_time_duration() {
    let v = eval(
        ArithmeticOp::Sub,
        &atom(AtomicType::DateTime, "2000-10-30T06:12:00"),
        &atom(AtomicType::DateTime, "1999-11-28T09:00:00Z"),
    )
    .unwrap();
    assert_eq!(v.to_string(), "P336DT21H12M");

    let v = eval(
        ArithmeticOp::Sub,
        &atom(AtomicType::Date, "2000-10-30"),
        &atom(AtomicType::Date, "1999-11-28"),
    )
    .unwrap();
    assert_eq!(v.to_string(), "P337D");

    let v = eval(
        ArithmeticOp::Sub,
        &atom(AtomicType::Time, "11:12:00Z"),
        &atom(AtomicType::Time, "04:00:00-05:00"),
    )
    .unwrap();
    assert_eq!(v.to_string(), "PT2H12M");
}

#[test]
fn implicit_timezone_applies_to_unzoned_subtraction() {
    let ctx = OperatorContextBuilder::new().with_timezone(-5 * 60).build();
    let v = evaluate_arithmetic(
        ArithmeticOp::Sub,
        &atom(AtomicType::DateTime, "2000-10-30T06:12:00"),
        &atom(AtomicType::DateTime, "1999-11-28T09:00:00Z"),
        &ctx,
    )
    .unwrap();
    assert_eq!(v.to_string(), "P337DT2H12M");
}

#[rstest]
#[case(AtomicType::Date, "2000-01-01", AtomicType::DateTime, "2000-01-01T00:00:00")]
#[case(AtomicType::Time, "10:00:00", AtomicType::Date, "2000-01-01")]
fn subtracting_different_temporal_kinds_is_type_error(
    #[case] lt: AtomicType,
    #[case] l: &str,
    #[case] rt: AtomicType,
    #[case] r: &str,
) {
    let err = eval(ArithmeticOp::Sub, &atom(lt, l), &atom(rt, r)).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::XPTY0004);
}

#[rstest]
#[case(ymd("P2Y11M"), A::Double(2.3), ArithmeticOp::Mul, "P6Y9M")]
#[case(ymd("P2Y11M"), A::Double(1.5), ArithmeticOp::Div, "P1Y11M")]
#[case(dtd("PT2H10M"), A::Double(2.1), ArithmeticOp::Mul, "PT4H33M")]
#[case(dtd("P1DT2H30M10.5S"), A::Double(1.5), ArithmeticOp::Div, "PT17H40M7S")]
#[case(dtd("PT1S"), A::integer(3), ArithmeticOp::Div, "PT0.333333333333333333S")]
fn duration_scaling(#[case] d: A, #[case] factor: A, #[case] op: ArithmeticOp, #[case] expected: &str) {
    let v = eval(op, &d, &factor).unwrap();
    assert_eq!(v.to_string(), expected);
}

#[rstest]
#[case(ymd("P1M"), A::Double(0.49999999999999994), ArithmeticOp::Mul, "P0M")]
#[case(ymd("P1M"), A::Double(0.5), ArithmeticOp::Mul, "P1M")]
#[case(ymd("-P1M"), A::Double(0.5), ArithmeticOp::Mul, "P0M")]
#[case(ymd("P768614336404564650Y"), A::integer(1), ArithmeticOp::Mul, "P768614336404564650Y")]
#[case(ymd("P768614336404564650Y"), A::integer(-1), ArithmeticOp::Mul, "-P768614336404564650Y")]
#[case(ymd("P1Y"), atom(AtomicType::Decimal, "7"), ArithmeticOp::Div, "P2M")]
#[case(ymd("P1Y"), A::Double(f64::INFINITY), ArithmeticOp::Div, "P0M")]
fn year_month_scaling_rounds_exactly(#[case] d: A, #[case] factor: A, #[case] op: ArithmeticOp, #[case] expected: &str) {
    assert_eq!(eval(op, &d, &factor).unwrap().to_string(), expected);
}

#[test]
fn year_month_scaling_beyond_month_range_overflows() {
    let err = eval(ArithmeticOp::Mul, &ymd("P768614336404564650Y"), &A::integer(2)).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::FODT0002);
}

#[test]
fn number_times_duration_commutes() {
    let v = eval(ArithmeticOp::Mul, &A::integer(2), &ymd("P1Y1M")).unwrap();
    assert_eq!(v.to_string(), "P2Y2M");
    let err = eval(ArithmeticOp::Div, &A::integer(2), &ymd("P1Y1M")).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::XPTY0004);
}

#[rstest]
#[case(A::Double(f64::NAN), ArithmeticOp::Mul, ErrorCode::FOCA0005)]
#[case(A::Double(f64::INFINITY), ArithmeticOp::Mul, ErrorCode::FODT0002)]
#[case(A::integer(0), ArithmeticOp::Div, ErrorCode::FODT0002)]
fn duration_scaling_errors(#[case] factor: A, #[case] op: ArithmeticOp, #[case] code: ErrorCode) {
    for d in [ymd("P1Y"), dtd("P1D")] {
        assert_eq!(eval(op, &d, &factor).unwrap_err().code_enum(), code, "{d}");
    }
}

#[test]
fn duration_ratio_is_decimal() {
    let v = eval(ArithmeticOp::Div, &ymd("P3Y4M"), &ymd("-P1Y4M")).unwrap();
    assert_eq!((v.kind(), v.to_string()), (AtomicType::Decimal, "-2.5".to_string()));
    let v = eval(ArithmeticOp::Div, &dtd("P2DT53M11S"), &dtd("P1DT10H")).unwrap();
    assert_eq!(v.kind(), AtomicType::Decimal);
    assert_eq!(v.to_string(), "1.437834967320261");
    let v = eval(ArithmeticOp::Div, &dtd("P1D"), &dtd("PT7H")).unwrap();
    assert_eq!(v.to_string(), "3.428571428571429");
    let v = eval(ArithmeticOp::Div, &ymd("P1Y"), &ymd("P7M")).unwrap();
    assert_eq!(v.to_string(), "1.714285714285714");
    let err = eval(ArithmeticOp::Div, &dtd("P1D"), &dtd("PT0S")).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::FOAR0001);
}

#[test]
fn date_time_range_overflow() {
    let err = eval(ArithmeticOp::Add, &atom(AtomicType::Date, "2000-01-01"), &ymd("P999999999Y")).unwrap_err();
    assert_eq!(err.code_enum(), ErrorCode::FODT0001);
}
