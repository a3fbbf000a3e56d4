use bigdecimal::BigDecimal;
use core::fmt;
use num_bigint::BigInt;

pub mod temporal;

pub(crate) mod decimal;
mod format;

pub use format::{format_decimal, format_double, format_float};
use temporal::{DayTimeDuration, XsDate, XsDateTime, XsTime, YearMonthDuration};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    pub ns_uri: Option<String>,
    pub local: String,
}

impl ExpandedName {
    pub fn new(ns_uri: Option<String>, local: impl Into<String>) -> Self {
        Self {
            ns_uri,
            local: local.into(),
        }
    }
}

/// Atomic types known to the operators.
///
/// `AnyAtomicType`, `Numeric` and `Duration` are static supertypes only: no
/// [`XdmAtomicValue`] ever reports them from [`XdmAtomicValue::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicType {
    AnyAtomicType,
    UntypedAtomic,
    String,
    Boolean,
    Numeric,
    Integer,
    Decimal,
    Float,
    Double,
    Duration,
    YearMonthDuration,
    DayTimeDuration,
    Date,
    Time,
    DateTime,
}

impl AtomicType {
    pub fn local_name(self) -> &'static str {
        match self {
            AtomicType::AnyAtomicType => "anyAtomicType",
            AtomicType::UntypedAtomic => "untypedAtomic",
            AtomicType::String => "string",
            AtomicType::Boolean => "boolean",
            AtomicType::Numeric => "numeric",
            AtomicType::Integer => "integer",
            AtomicType::Decimal => "decimal",
            AtomicType::Float => "float",
            AtomicType::Double => "double",
            AtomicType::Duration => "duration",
            AtomicType::YearMonthDuration => "yearMonthDuration",
            AtomicType::DayTimeDuration => "dayTimeDuration",
            AtomicType::Date => "date",
            AtomicType::Time => "time",
            AtomicType::DateTime => "dateTime",
        }
    }

    pub fn qname(self) -> ExpandedName {
        ExpandedName::new(Some(crate::consts::XS.to_string()), self.local_name())
    }

    /// Resolve an `xs:` local name.
    pub fn from_local_name(local: &str) -> Option<Self> {
        Some(match local {
            "anyAtomicType" => AtomicType::AnyAtomicType,
            "untypedAtomic" => AtomicType::UntypedAtomic,
            "string" => AtomicType::String,
            "boolean" => AtomicType::Boolean,
            "numeric" => AtomicType::Numeric,
            "integer" => AtomicType::Integer,
            "decimal" => AtomicType::Decimal,
            "float" => AtomicType::Float,
            "double" => AtomicType::Double,
            "duration" => AtomicType::Duration,
            "yearMonthDuration" => AtomicType::YearMonthDuration,
            "dayTimeDuration" => AtomicType::DayTimeDuration,
            "date" => AtomicType::Date,
            "time" => AtomicType::Time,
            "dateTime" => AtomicType::DateTime,
            _ => return None,
        })
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            AtomicType::Numeric | AtomicType::Integer | AtomicType::Decimal | AtomicType::Float | AtomicType::Double
        )
    }

    pub fn is_duration(self) -> bool {
        matches!(self, AtomicType::Duration | AtomicType::YearMonthDuration | AtomicType::DayTimeDuration)
    }

    /// True for the abstract supertypes that never label a runtime value.
    pub fn is_static_only(self) -> bool {
        matches!(self, AtomicType::AnyAtomicType | AtomicType::Numeric | AtomicType::Duration)
    }

    /// Derivation in the type hierarchy (reflexive).
    ///
    /// `xs:numeric` is treated as the union of the four numeric primitives,
    /// so `decimal`, `float` and `double` are all its subtypes.
    pub fn is_subtype_of(self, other: AtomicType) -> bool {
        if self == other || other == AtomicType::AnyAtomicType {
            return true;
        }
        match other {
            AtomicType::Decimal => self == AtomicType::Integer,
            AtomicType::Numeric => self.is_numeric(),
            AtomicType::Duration => self.is_duration(),
            _ => false,
        }
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xs:{}", self.local_name())
    }
}

/// An atomized XDM value.
///
/// Values are immutable; every operator produces a fresh one. `Display`
/// renders the canonical lexical representation of the value's type.
#[derive(Debug, Clone, PartialEq)]
pub enum XdmAtomicValue {
    Boolean(bool),
    String(String),
    UntypedAtomic(String),
    Integer(BigInt),
    Decimal(BigDecimal),
    Float(f32),
    Double(f64),
    YearMonthDuration(YearMonthDuration),
    DayTimeDuration(DayTimeDuration),
    Date(XsDate),
    Time(XsTime),
    DateTime(XsDateTime),
}

impl XdmAtomicValue {
    /// Dynamic type of this value. Operator dispatch is keyed on this alone.
    pub fn kind(&self) -> AtomicType {
        match self {
            XdmAtomicValue::Boolean(_) => AtomicType::Boolean,
            XdmAtomicValue::String(_) => AtomicType::String,
            XdmAtomicValue::UntypedAtomic(_) => AtomicType::UntypedAtomic,
            XdmAtomicValue::Integer(_) => AtomicType::Integer,
            XdmAtomicValue::Decimal(_) => AtomicType::Decimal,
            XdmAtomicValue::Float(_) => AtomicType::Float,
            XdmAtomicValue::Double(_) => AtomicType::Double,
            XdmAtomicValue::YearMonthDuration(_) => AtomicType::YearMonthDuration,
            XdmAtomicValue::DayTimeDuration(_) => AtomicType::DayTimeDuration,
            XdmAtomicValue::Date(_) => AtomicType::Date,
            XdmAtomicValue::Time(_) => AtomicType::Time,
            XdmAtomicValue::DateTime(_) => AtomicType::DateTime,
        }
    }

    pub fn integer(i: i64) -> Self {
        XdmAtomicValue::Integer(BigInt::from(i))
    }

    pub fn is_nan(&self) -> bool {
        match self {
            XdmAtomicValue::Float(f) => f.is_nan(),
            XdmAtomicValue::Double(d) => d.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for XdmAtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XdmAtomicValue::Boolean(b) => write!(f, "{b}"),
            XdmAtomicValue::String(s) | XdmAtomicValue::UntypedAtomic(s) => f.write_str(s),
            XdmAtomicValue::Integer(i) => write!(f, "{i}"),
            XdmAtomicValue::Decimal(d) => f.write_str(&format_decimal(d)),
            XdmAtomicValue::Float(v) => f.write_str(&format_float(*v)),
            XdmAtomicValue::Double(v) => f.write_str(&format_double(*v)),
            XdmAtomicValue::YearMonthDuration(d) => write!(f, "{d}"),
            XdmAtomicValue::DayTimeDuration(d) => write!(f, "{d}"),
            XdmAtomicValue::Date(d) => write!(f, "{d}"),
            XdmAtomicValue::Time(t) => write!(f, "{t}"),
            XdmAtomicValue::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<bool> for XdmAtomicValue {
    fn from(b: bool) -> Self {
        XdmAtomicValue::Boolean(b)
    }
}

impl From<BigInt> for XdmAtomicValue {
    fn from(i: BigInt) -> Self {
        XdmAtomicValue::Integer(i)
    }
}

impl From<BigDecimal> for XdmAtomicValue {
    fn from(d: BigDecimal) -> Self {
        XdmAtomicValue::Decimal(d)
    }
}

impl From<f64> for XdmAtomicValue {
    fn from(d: f64) -> Self {
        XdmAtomicValue::Double(d)
    }
}

impl From<f32> for XdmAtomicValue {
    fn from(v: f32) -> Self {
        XdmAtomicValue::Float(v)
    }
}

impl From<YearMonthDuration> for XdmAtomicValue {
    fn from(d: YearMonthDuration) -> Self {
        XdmAtomicValue::YearMonthDuration(d)
    }
}

impl From<DayTimeDuration> for XdmAtomicValue {
    fn from(d: DayTimeDuration) -> Self {
        XdmAtomicValue::DayTimeDuration(d)
    }
}

impl From<XsDate> for XdmAtomicValue {
    fn from(d: XsDate) -> Self {
        XdmAtomicValue::Date(d)
    }
}

impl From<XsTime> for XdmAtomicValue {
    fn from(t: XsTime) -> Self {
        XdmAtomicValue::Time(t)
    }
}

impl From<XsDateTime> for XdmAtomicValue {
    fn from(dt: XsDateTime) -> Self {
        XdmAtomicValue::DateTime(dt)
    }
}
