//! Dynamic evaluation of the XPath 2.0 / XQuery 1.0 arithmetic and value
//! comparison operators over already-atomized XDM values.
//!
//! The crate does not parse queries. Callers hand in [`XdmAtomicValue`]s
//! (usually built through the lexical constructors in [`engine::casting`]),
//! pick an operator and receive either a new value or a typed [`Error`].
//!
//! ```
//! use xpath_operators::engine::casting::parse_day_time_duration;
//! use xpath_operators::{ArithmeticOp, OperatorContext, XdmAtomicValue, evaluate_arithmetic};
//!
//! let ctx = OperatorContext::default();
//! let a = XdmAtomicValue::from(parse_day_time_duration("P2DT12H5M").unwrap());
//! let b = XdmAtomicValue::from(parse_day_time_duration("P5DT12H").unwrap());
//! let sum = evaluate_arithmetic(ArithmeticOp::Add, &a, &b, &ctx).unwrap();
//! assert_eq!(sum.to_string(), "P8DT5M");
//! ```

pub mod consts;
pub mod engine;
pub mod xdm;

pub use engine::evaluator::promotion::{ArithmeticPlan, ComparisonPlan, resolve, resolve_comparison, result_type};
pub use engine::evaluator::type_check::treat_as;
pub use engine::evaluator::{
    ArithmeticOp, ComparisonOp, UnaryOp, compare_atomic, evaluate_arithmetic, evaluate_unary, general_compare,
    value_compare,
};
pub use engine::runtime::{DecimalPolicy, Error, ErrorCode, OperatorContext, OperatorContextBuilder, OverflowMode};
pub use xdm::temporal::{DayTimeDuration, TimezoneOffset, XsDate, XsDateTime, XsTime, YearMonthDuration};
pub use xdm::{AtomicType, ExpandedName, XdmAtomicValue};
