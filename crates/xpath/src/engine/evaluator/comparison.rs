//! Atomic value comparison for value (`eq`, `lt`, ...) and general (`=`,
//! `<`, ...) comparisons.

use core::cmp::Ordering;
use itertools::Itertools;

use crate::engine::casting::cast_untyped;
use crate::engine::runtime::{Error, OperatorContext};
use crate::xdm::XdmAtomicValue;

use super::numeric::Num;
use super::{ComparisonOp, numeric_operand};
use super::promotion::{ComparisonPlan, resolve_comparison};

fn retarget(v: &XdmAtomicValue, plan: &ComparisonPlan) -> Result<XdmAtomicValue, Error> {
    match v {
        XdmAtomicValue::UntypedAtomic(_) => cast_untyped(v, plan.untyped_target()),
        other => Ok(other.clone()),
    }
}

/// Ordering of two promoted numbers; `None` when either is NaN.
fn numeric_ordering(a: Num, b: Num) -> Option<Ordering> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => Some(x.cmp(&y)),
        (Num::Dec(x), Num::Dec(y)) => Some(x.cmp(&y)),
        (Num::Float(x), Num::Float(y)) => x.partial_cmp(&y),
        (Num::Double(x), Num::Double(y)) => x.partial_cmp(&y),
        (x, y) => x.to_f64().partial_cmp(&y.to_f64()),
    }
}

/// Compare two single atomic values.
///
/// NaN is unordered: every operator yields `false` except `ne`.
pub fn compare_atomic(
    op: ComparisonOp,
    a: &XdmAtomicValue,
    b: &XdmAtomicValue,
    ctx: &OperatorContext,
) -> Result<bool, Error> {
    use XdmAtomicValue as V;

    let plan = resolve_comparison(op, a.kind(), b.kind())?;
    tracing::trace!(op = %op, left = %a.kind(), right = %b.kind(), plan = ?plan, "comparison plan");
    let (a, b) = (retarget(a, &plan)?, retarget(b, &plan)?);

    let ordering = match plan {
        ComparisonPlan::Numeric(target) => {
            let x = numeric_operand(&a)?.promote(target);
            let y = numeric_operand(&b)?.promote(target);
            numeric_ordering(x, y)
        }
        ComparisonPlan::Boolean => match (&a, &b) {
            (V::Boolean(x), V::Boolean(y)) => Some(x.cmp(y)),
            _ => None,
        },
        // UTF-8 byte order is codepoint order
        ComparisonPlan::String => match (&a, &b) {
            (V::String(x), V::String(y)) => Some(x.as_str().cmp(y.as_str())),
            _ => None,
        },
        ComparisonPlan::Duration(_) => match (&a, &b) {
            (V::YearMonthDuration(x), V::YearMonthDuration(y)) => Some(x.cmp(y)),
            (V::DayTimeDuration(x), V::DayTimeDuration(y)) => Some(x.cmp(y)),
            _ => None,
        },
        ComparisonPlan::Temporal(_) => {
            let tz = ctx.implicit_timezone;
            match (&a, &b) {
                (V::Date(x), V::Date(y)) => Some(x.normalize(tz)?.cmp(&y.normalize(tz)?)),
                (V::Time(x), V::Time(y)) => Some(x.normalize(tz)?.cmp(&y.normalize(tz)?)),
                (V::DateTime(x), V::DateTime(y)) => Some(x.normalize(tz)?.cmp(&y.normalize(tz)?)),
                _ => None,
            }
        }
    };

    Ok(match ordering {
        Some(ord) => op.holds(ord),
        None if matches!(plan, ComparisonPlan::Numeric(_)) => op == ComparisonOp::Ne,
        None => {
            return Err(Error::type_error(format!("cannot compare {} with {}", a.kind(), b.kind())));
        }
    })
}

/// Value comparison: both operands must hold exactly one atomic value.
pub fn value_compare(
    op: ComparisonOp,
    lhs: &[XdmAtomicValue],
    rhs: &[XdmAtomicValue],
    ctx: &OperatorContext,
) -> Result<bool, Error> {
    match (lhs, rhs) {
        ([a], [b]) => compare_atomic(op, a, b, ctx),
        _ => {
            let err = Error::type_error(format!(
                "value comparison '{op}' expects one item per operand, got {} and {}",
                lhs.len(),
                rhs.len()
            ));
            tracing::debug!(error = %err, "value comparison rejected");
            Err(err)
        }
    }
}

/// General comparison: true when some pair drawn from the two sequences
/// satisfies `op`. Empty operands yield `false`.
pub fn general_compare(
    op: ComparisonOp,
    lhs: &[XdmAtomicValue],
    rhs: &[XdmAtomicValue],
    ctx: &OperatorContext,
) -> Result<bool, Error> {
    for (a, b) in lhs.iter().cartesian_product(rhs.iter()) {
        if compare_atomic(op, a, b, ctx)? {
            return Ok(true);
        }
    }
    Ok(false)
}
