//! Operator façade.
//!
//! Every entry point dispatches on the *dynamic* kind of its operands
//! ([`XdmAtomicValue::kind`]): the plan is resolved by [`promotion::resolve`]
//! and executed by the numeric or temporal kernels.

use core::cmp::Ordering;
use core::fmt;

use crate::engine::runtime::{Error, OperatorContext};
use crate::xdm::XdmAtomicValue;

mod comparison;
pub(crate) mod numeric;
pub mod promotion;
pub(crate) mod temporal;
pub mod type_check;

pub use comparison::{compare_atomic, general_compare, value_compare};

use numeric::{Num, apply_decimal_policy, classify};
use promotion::{ArithmeticPlan, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Mod,
}

impl ArithmeticOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "div",
            ArithmeticOp::IDiv => "idiv",
            ArithmeticOp::Mod => "mod",
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison operators. The same set serves value comparisons (`eq`, `ne`,
/// ...) and general comparisons (`=`, `!=`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    pub fn keyword(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Le => "le",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Ge => "ge",
        }
    }

    /// Whether `left.cmp(right) == ord` satisfies the operator.
    pub fn holds(self, ord: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ord.is_eq(),
            ComparisonOp::Ne => ord.is_ne(),
            ComparisonOp::Lt => ord.is_lt(),
            ComparisonOp::Le => ord.is_le(),
            ComparisonOp::Gt => ord.is_gt(),
            ComparisonOp::Ge => ord.is_ge(),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        })
    }
}

fn numeric_operand(v: &XdmAtomicValue) -> Result<Num, Error> {
    classify(v)?.ok_or_else(|| Error::type_error(format!("{} is not numeric", v.kind())))
}

/// Evaluate `left op right`.
///
/// # Errors
///
/// - `err:XPTY0004` when the operator is not defined for the operand kinds
/// - `err:FOAR0001` on integer/decimal division by zero (and float `idiv`)
/// - `err:FOAR0002` on overflow under a bounded [`DecimalPolicy`](crate::DecimalPolicy)
/// - `err:FODT0001`/`err:FODT0002` when a date/time or duration leaves its range
/// - `err:FORG0001` when an `xs:untypedAtomic` operand is not a valid double
pub fn evaluate_arithmetic(
    op: ArithmeticOp,
    left: &XdmAtomicValue,
    right: &XdmAtomicValue,
    ctx: &OperatorContext,
) -> Result<XdmAtomicValue, Error> {
    let result = resolve(op, left.kind(), right.kind()).and_then(|plan| {
        tracing::trace!(op = %op, left = %left.kind(), right = %right.kind(), plan = ?plan, "arithmetic plan");
        run_plan(op, plan, left, right, ctx)
    });
    if let Err(err) = &result {
        tracing::debug!(op = %op, code = %err.code, message = %err.message, "arithmetic raised an error");
    }
    result
}

fn run_plan(
    op: ArithmeticOp,
    plan: ArithmeticPlan,
    left: &XdmAtomicValue,
    right: &XdmAtomicValue,
    ctx: &OperatorContext,
) -> Result<XdmAtomicValue, Error> {
    match plan {
        ArithmeticPlan::Numeric { operands, .. } => {
            let a = numeric_operand(left)?.promote(operands);
            let b = numeric_operand(right)?.promote(operands);
            numeric::apply(op, a, b, &ctx.decimal_policy).map(Num::into_value)
        }
        ArithmeticPlan::Durations(_) => temporal::combine_durations(left, right, op == ArithmeticOp::Sub),
        ArithmeticPlan::DurationRatio(_) => {
            let ratio = temporal::duration_ratio(left, right)?;
            apply_decimal_policy(ratio, &ctx.decimal_policy).map(XdmAtomicValue::Decimal)
        }
        ArithmeticPlan::ScaleDuration { duration_on_left, .. } => {
            let (duration, factor) = if duration_on_left { (left, right) } else { (right, left) };
            let factor = numeric_operand(factor)?;
            temporal::scale_duration(duration, &factor, op == ArithmeticOp::Div)
        }
        ArithmeticPlan::ShiftTemporal { temporal_on_left, .. } => {
            let (moment, duration) = if temporal_on_left { (left, right) } else { (right, left) };
            temporal::shift(moment, duration, op == ArithmeticOp::Sub)
        }
        ArithmeticPlan::TemporalDifference(_) => {
            temporal::difference(left, right, ctx.implicit_timezone).map(XdmAtomicValue::DayTimeDuration)
        }
    }
}

/// Evaluate unary `+`/`-`. Numeric operands keep their type (negation flips
/// a signed zero); `xs:untypedAtomic` becomes `xs:double`.
pub fn evaluate_unary(op: UnaryOp, operand: &XdmAtomicValue, _ctx: &OperatorContext) -> Result<XdmAtomicValue, Error> {
    let Some(n) = classify(operand)? else {
        return Err(Error::type_error(format!("unary '{op}' is not defined for {}", operand.kind())));
    };
    Ok(match op {
        UnaryOp::Plus => n.into_value(),
        UnaryOp::Minus => numeric::negate(n).into_value(),
    })
}
