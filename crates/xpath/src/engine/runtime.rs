use crate::consts::ERR_NS;
use crate::xdm::ExpandedName;
use crate::xdm::temporal::TimezoneOffset;
use core::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Arithmetic
    FOAR0001, // divide by zero
    FOAR0002, // numeric overflow / underflow
    // Casting and lexical validation
    FOCA0005, // NaN supplied as float/double value
    FORG0001, // invalid lexical form / casting failure
    // Date/time
    FODT0001, // overflow/underflow in date/time operation
    FODT0002, // overflow/underflow in duration operation
    FODT0003, // invalid timezone value
    // Type errors (incompatible operands, cardinality of value comparisons)
    XPTY0004,
}

/// ErrorCode notes:
/// - Only the codes an operator or a lexical constructor can raise are modeled.
/// - Use `Error::code_enum()` for structured handling instead of matching message text.
impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FOAR0001 => "FOAR0001",
            ErrorCode::FOAR0002 => "FOAR0002",
            ErrorCode::FOCA0005 => "FOCA0005",
            ErrorCode::FORG0001 => "FORG0001",
            ErrorCode::FODT0001 => "FODT0001",
            ErrorCode::FODT0002 => "FODT0002",
            ErrorCode::FODT0003 => "FODT0003",
            ErrorCode::XPTY0004 => "XPTY0004",
        }
    }

    /// Returns the QName (ExpandedName) for this error code.
    /// Namespace: http://www.w3.org/2005/xqt-errors
    pub fn qname(&self) -> ExpandedName {
        ExpandedName::new(Some(ERR_NS.to_string()), self.as_str())
    }

    /// Parses `err:LOCAL` or a bare local name.
    pub fn from_code(s: &str) -> Option<Self> {
        use ErrorCode::*;
        let local = s.strip_prefix("err:").unwrap_or(s);
        Some(match local {
            "FOAR0001" => FOAR0001,
            "FOAR0002" => FOAR0002,
            "FOCA0005" => FOCA0005,
            "FORG0001" => FORG0001,
            "FODT0001" => FODT0001,
            "FODT0002" => FODT0002,
            "FODT0003" => FODT0003,
            "XPTY0004" => XPTY0004,
            _ => return None,
        })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "err:{}", self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("error: {message} ({code})")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[source]
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>, // optional chained cause
}

impl Error {
    pub fn from_code(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            source: None,
        }
    }

    pub fn code_enum(&self) -> ErrorCode {
        self.code
    }

    /// Format the code as a human-readable string (err:LOCAL).
    pub fn format_code(&self) -> String {
        self.code.to_string()
    }

    /// Compose an error with a source cause.
    pub fn with_source(mut self, source: impl Into<Option<Arc<dyn std::error::Error + Send + Sync>>>) -> Self {
        self.source = source.into();
        self
    }

    pub(crate) fn type_error(msg: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::XPTY0004, msg)
    }

    pub(crate) fn invalid_lexical(type_name: &str, lexical: &str) -> Self {
        Self::from_code(ErrorCode::FORG0001, format!("invalid lexical form for {type_name}: '{lexical}'"))
    }
}

// Convenience conversions to attach common source errors with domain codes
impl From<std::num::ParseFloatError> for Error {
    fn from(e: std::num::ParseFloatError) -> Self {
        Error::from_code(ErrorCode::FORG0001, "invalid floating point literal")
            .with_source(Some(Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>))
    }
}

impl From<bigdecimal::ParseBigDecimalError> for Error {
    fn from(e: bigdecimal::ParseBigDecimalError) -> Self {
        Error::from_code(ErrorCode::FORG0001, "invalid decimal literal")
            .with_source(Some(Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>))
    }
}

/// What happens when an `xs:integer` / `xs:decimal` result needs more
/// integer digits than [`DecimalPolicy::max_digits`] allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowMode {
    /// Raise `err:FOAR0002`.
    #[default]
    Error,
    /// Clamp to the largest representable magnitude with the same sign.
    Saturate,
}

/// Precision limits for `xs:integer` and `xs:decimal` results.
///
/// `max_digits: None` means unbounded arbitrary precision. With a bound, an
/// integer part wider than `max_digits` digits is an overflow handled by
/// `on_overflow`; surplus fractional digits are rounded half-to-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecimalPolicy {
    pub max_digits: Option<u32>,
    pub on_overflow: OverflowMode,
}

impl DecimalPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(max_digits: u32, on_overflow: OverflowMode) -> Self {
        Self {
            max_digits: Some(max_digits),
            on_overflow,
        }
    }
}

/// Evaluation environment of a single operator call.
#[derive(Debug, Clone, Default)]
pub struct OperatorContext {
    /// Substituted for timezone-less dates/times when they are ordered or subtracted.
    pub implicit_timezone: TimezoneOffset,
    pub decimal_policy: DecimalPolicy,
}

pub struct OperatorContextBuilder {
    ctx: OperatorContext,
}

impl Default for OperatorContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorContextBuilder {
    pub fn new() -> Self {
        Self {
            ctx: OperatorContext::default(),
        }
    }

    /// Set the implicit timezone. Offsets outside -14:00..=+14:00 are ignored.
    pub fn with_timezone(mut self, offset_minutes: i32) -> Self {
        if let Ok(tz) = TimezoneOffset::new(offset_minutes) {
            self.ctx.implicit_timezone = tz;
        }
        self
    }

    pub fn with_decimal_policy(mut self, policy: DecimalPolicy) -> Self {
        self.ctx.decimal_policy = policy;
        self
    }

    pub fn build(self) -> OperatorContext {
        self.ctx
    }
}
