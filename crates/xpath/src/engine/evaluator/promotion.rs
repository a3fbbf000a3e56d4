//! Operand-type lattice and operator plan resolution.
//!
//! A plan is computed from the dynamic [`AtomicType`]s of the two operands
//! only; values are never inspected here. The numeric chain is
//! `integer -> decimal -> float -> double` and the common type of two numeric
//! operands is the later of the two.

use crate::engine::runtime::Error;
use crate::xdm::AtomicType;

use super::{ArithmeticOp, ComparisonOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericType {
    Integer,
    Decimal,
    Float,
    Double,
}

impl NumericType {
    /// Numeric type of an arithmetic operand; `xs:untypedAtomic` counts as `xs:double`.
    pub fn of_operand(t: AtomicType) -> Option<Self> {
        match t {
            AtomicType::UntypedAtomic => Some(NumericType::Double),
            other => Self::of(other),
        }
    }

    pub fn of(t: AtomicType) -> Option<Self> {
        match t {
            AtomicType::Integer => Some(NumericType::Integer),
            AtomicType::Decimal => Some(NumericType::Decimal),
            AtomicType::Float => Some(NumericType::Float),
            AtomicType::Double => Some(NumericType::Double),
            _ => None,
        }
    }

    pub fn promote(self, other: NumericType) -> NumericType {
        self.max(other)
    }

    pub fn atomic_type(self) -> AtomicType {
        match self {
            NumericType::Integer => AtomicType::Integer,
            NumericType::Decimal => AtomicType::Decimal,
            NumericType::Float => AtomicType::Float,
            NumericType::Double => AtomicType::Double,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationKind {
    YearMonth,
    DayTime,
}

impl DurationKind {
    pub fn of(t: AtomicType) -> Option<Self> {
        match t {
            AtomicType::YearMonthDuration => Some(DurationKind::YearMonth),
            AtomicType::DayTimeDuration => Some(DurationKind::DayTime),
            _ => None,
        }
    }

    pub fn atomic_type(self) -> AtomicType {
        match self {
            DurationKind::YearMonth => AtomicType::YearMonthDuration,
            DurationKind::DayTime => AtomicType::DayTimeDuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
}

impl TemporalKind {
    pub fn of(t: AtomicType) -> Option<Self> {
        match t {
            AtomicType::Date => Some(TemporalKind::Date),
            AtomicType::Time => Some(TemporalKind::Time),
            AtomicType::DateTime => Some(TemporalKind::DateTime),
            _ => None,
        }
    }

    pub fn atomic_type(self) -> AtomicType {
        match self {
            TemporalKind::Date => AtomicType::Date,
            TemporalKind::Time => AtomicType::Time,
            TemporalKind::DateTime => AtomicType::DateTime,
        }
    }

    /// `xs:time` only moves by day/time durations.
    fn accepts(self, duration: DurationKind) -> bool {
        !(self == TemporalKind::Time && duration == DurationKind::YearMonth)
    }
}

/// How an arithmetic operator evaluates a given pair of operand types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticPlan {
    /// Both operands are promoted to `operands`; the value has type `result`.
    Numeric { operands: NumericType, result: NumericType },
    /// Duration `+`/`-` duration of the same kind.
    Durations(DurationKind),
    /// Duration `div` duration of the same kind, yielding `xs:decimal`.
    DurationRatio(DurationKind),
    /// Duration `*` number, number `*` duration, duration `div` number.
    ScaleDuration { kind: DurationKind, duration_on_left: bool },
    /// Date/time `+`/`-` duration (or duration `+` date/time).
    ShiftTemporal {
        temporal: TemporalKind,
        duration: DurationKind,
        temporal_on_left: bool,
    },
    /// Date/time `-` date/time of the same kind, yielding `xs:dayTimeDuration`.
    TemporalDifference(TemporalKind),
}

impl ArithmeticPlan {
    pub fn result_type(&self) -> AtomicType {
        match *self {
            ArithmeticPlan::Numeric { result, .. } => result.atomic_type(),
            ArithmeticPlan::Durations(kind) | ArithmeticPlan::ScaleDuration { kind, .. } => kind.atomic_type(),
            ArithmeticPlan::DurationRatio(_) => AtomicType::Decimal,
            ArithmeticPlan::ShiftTemporal { temporal, .. } => temporal.atomic_type(),
            ArithmeticPlan::TemporalDifference(_) => AtomicType::DayTimeDuration,
        }
    }
}

fn undefined(op: ArithmeticOp, left: AtomicType, right: AtomicType) -> Error {
    Error::type_error(format!("operator '{op}' is not defined for {left} and {right}"))
}

/// Resolve the evaluation plan of `left op right`.
///
/// Abstract types (`xs:duration`, `xs:numeric`, `xs:anyAtomicType`) never
/// resolve: dispatch needs a concrete dynamic kind.
pub fn resolve(op: ArithmeticOp, left: AtomicType, right: AtomicType) -> Result<ArithmeticPlan, Error> {
    use ArithmeticOp::*;

    if let (Some(l), Some(r)) = (NumericType::of_operand(left), NumericType::of_operand(right)) {
        let operands = l.promote(r);
        let result = match (op, operands) {
            (Div, NumericType::Integer) => NumericType::Decimal,
            (IDiv, _) => NumericType::Integer,
            _ => operands,
        };
        return Ok(ArithmeticPlan::Numeric { operands, result });
    }

    let numeric = |t: AtomicType| NumericType::of_operand(t).is_some();

    match (DurationKind::of(left), DurationKind::of(right)) {
        (Some(l), Some(r)) if l == r => {
            return match op {
                Add | Sub => Ok(ArithmeticPlan::Durations(l)),
                Div => Ok(ArithmeticPlan::DurationRatio(l)),
                _ => Err(undefined(op, left, right)),
            };
        }
        (Some(_), Some(_)) => return Err(undefined(op, left, right)),
        (Some(kind), None) if numeric(right) && matches!(op, Mul | Div) => {
            return Ok(ArithmeticPlan::ScaleDuration {
                kind,
                duration_on_left: true,
            });
        }
        (None, Some(kind)) if numeric(left) && op == Mul => {
            return Ok(ArithmeticPlan::ScaleDuration {
                kind,
                duration_on_left: false,
            });
        }
        _ => {}
    }

    match (TemporalKind::of(left), TemporalKind::of(right)) {
        (Some(l), Some(r)) if l == r && op == Sub => Ok(ArithmeticPlan::TemporalDifference(l)),
        (Some(temporal), None) => match DurationKind::of(right) {
            Some(duration) if temporal.accepts(duration) && matches!(op, Add | Sub) => {
                Ok(ArithmeticPlan::ShiftTemporal {
                    temporal,
                    duration,
                    temporal_on_left: true,
                })
            }
            _ => Err(undefined(op, left, right)),
        },
        (None, Some(temporal)) => match DurationKind::of(left) {
            Some(duration) if temporal.accepts(duration) && op == Add => Ok(ArithmeticPlan::ShiftTemporal {
                temporal,
                duration,
                temporal_on_left: false,
            }),
            _ => Err(undefined(op, left, right)),
        },
        _ => Err(undefined(op, left, right)),
    }
}

/// Result type of `left op right`, or the type error the operator would raise.
pub fn result_type(op: ArithmeticOp, left: AtomicType, right: AtomicType) -> Result<AtomicType, Error> {
    resolve(op, left, right).map(|plan| plan.result_type())
}

/// Common type two comparison operands are brought to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonPlan {
    Numeric(NumericType),
    Boolean,
    String,
    Duration(DurationKind),
    Temporal(TemporalKind),
}

impl ComparisonPlan {
    /// Type an `xs:untypedAtomic` operand is cast to under this plan.
    pub fn untyped_target(&self) -> AtomicType {
        match *self {
            ComparisonPlan::Numeric(_) => AtomicType::Double,
            ComparisonPlan::Boolean => AtomicType::Boolean,
            ComparisonPlan::String => AtomicType::String,
            ComparisonPlan::Duration(kind) => kind.atomic_type(),
            ComparisonPlan::Temporal(kind) => kind.atomic_type(),
        }
    }
}

/// Resolve how `left op right` compares.
///
/// An `xs:untypedAtomic` operand takes the other operand's type: `xs:double`
/// against a number, `xs:string` against a string or another untyped value.
pub fn resolve_comparison(op: ComparisonOp, left: AtomicType, right: AtomicType) -> Result<ComparisonPlan, Error> {
    let retarget = |t: AtomicType, other: AtomicType| match (t, other) {
        (AtomicType::UntypedAtomic, AtomicType::UntypedAtomic | AtomicType::String) => AtomicType::String,
        (AtomicType::UntypedAtomic, o) if NumericType::of(o).is_some() => AtomicType::Double,
        (AtomicType::UntypedAtomic, o) => o,
        (t, _) => t,
    };
    let (l, r) = (retarget(left, right), retarget(right, left));

    if let (Some(a), Some(b)) = (NumericType::of(l), NumericType::of(r)) {
        return Ok(ComparisonPlan::Numeric(a.promote(b)));
    }
    let plan = match (l, r) {
        (AtomicType::Boolean, AtomicType::Boolean) => Some(ComparisonPlan::Boolean),
        (AtomicType::String, AtomicType::String) => Some(ComparisonPlan::String),
        _ => match (DurationKind::of(l), DurationKind::of(r), TemporalKind::of(l), TemporalKind::of(r)) {
            (Some(a), Some(b), _, _) if a == b => Some(ComparisonPlan::Duration(a)),
            (_, _, Some(a), Some(b)) if a == b => Some(ComparisonPlan::Temporal(a)),
            _ => None,
        },
    };
    plan.ok_or_else(|| Error::type_error(format!("cannot compare {left} with {right} using '{op}'")))
}
