/// Namespace URI used for W3C-defined XPath/XQuery error codes (xqt-errors).
pub const ERR_NS: &str = "http://www.w3.org/2005/xqt-errors";

/// XML Schema namespace of the built-in atomic types.
pub const XS: &str = "http://www.w3.org/2001/XMLSchema";

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Scale floor for `xs:decimal` quotients.
pub const DECIMAL_DIV_MIN_SCALE: i64 = 18;

/// Significant digits of a `duration div duration` ratio.
pub const DURATION_RATIO_PRECISION: u32 = 16;

/// Timezone offsets are limited to -14:00..=+14:00.
pub const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;
