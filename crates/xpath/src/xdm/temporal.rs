//! Date, time and duration values of the XDM.
//!
//! Dates and times keep their local (as-written) calendar value together with
//! an optional timezone offset. A missing offset is a separate state from
//! `+00:00`; only ordering resolves it, through the implicit timezone of the
//! evaluation context.

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use core::fmt;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::consts::{MAX_TZ_OFFSET_MINUTES, SECONDS_PER_DAY};
use crate::engine::runtime::{Error, ErrorCode};
use crate::xdm::decimal::{pow10, trunc_to_bigint};
use crate::xdm::format_decimal;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Signed timezone offset in minutes, -840..=840.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimezoneOffset {
    minutes: i16,
}

impl TimezoneOffset {
    pub const UTC: TimezoneOffset = TimezoneOffset { minutes: 0 };

    pub fn new(minutes: i32) -> Result<Self, Error> {
        if minutes.unsigned_abs() > MAX_TZ_OFFSET_MINUTES.unsigned_abs() {
            return Err(Error::from_code(
                ErrorCode::FODT0003,
                format!("timezone offset {minutes} minutes outside -14:00..+14:00"),
            ));
        }
        // range checked above
        Ok(Self {
            minutes: minutes as i16,
        })
    }

    pub fn minutes(self) -> i32 {
        i32::from(self.minutes)
    }

    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes))
    }
}

impl fmt::Display for TimezoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes == 0 {
            return f.write_str("Z");
        }
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

fn write_tz(f: &mut fmt::Formatter<'_>, tz: Option<TimezoneOffset>) -> fmt::Result {
    match tz {
        Some(tz) => write!(f, "{tz}"),
        None => Ok(()),
    }
}

fn write_date(f: &mut fmt::Formatter<'_>, date: NaiveDate) -> fmt::Result {
    let year = date.year();
    if year < 0 {
        write!(f, "-{:04}", year.unsigned_abs())?;
    } else {
        write!(f, "{year:04}")?;
    }
    write!(f, "-{:02}-{:02}", date.month(), date.day())
}

fn write_time(f: &mut fmt::Formatter<'_>, time: NaiveTime) -> fmt::Result {
    write!(f, "{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())?;
    let nanos = time.nanosecond();
    if nanos != 0 {
        let frac = format!("{nanos:09}");
        write!(f, ".{}", frac.trim_end_matches('0'))?;
    }
    Ok(())
}

fn to_utc(local: NaiveDateTime, tz: Option<TimezoneOffset>, implicit: TimezoneOffset) -> Result<NaiveDateTime, Error> {
    let offset = tz.unwrap_or(implicit);
    local
        .checked_sub_signed(offset.as_delta())
        .ok_or_else(|| Error::from_code(ErrorCode::FODT0001, "date/time normalization out of range"))
}

/// `xs:date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XsDate {
    date: NaiveDate,
    tz: Option<TimezoneOffset>,
}

impl XsDate {
    pub fn new(date: NaiveDate, tz: Option<TimezoneOffset>) -> Self {
        Self { date, tz }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timezone(&self) -> Option<TimezoneOffset> {
        self.tz
    }

    /// UTC instant at which this date starts.
    pub fn normalize(&self, implicit: TimezoneOffset) -> Result<NaiveDateTime, Error> {
        to_utc(self.date.and_time(NaiveTime::MIN), self.tz, implicit)
    }
}

impl fmt::Display for XsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_date(f, self.date)?;
        write_tz(f, self.tz)
    }
}

/// `xs:time`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XsTime {
    time: NaiveTime,
    tz: Option<TimezoneOffset>,
}

impl XsTime {
    pub fn new(time: NaiveTime, tz: Option<TimezoneOffset>) -> Self {
        Self { time, tz }
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn timezone(&self) -> Option<TimezoneOffset> {
        self.tz
    }

    /// UTC instant of this time anchored on the reference date 1972-12-31.
    pub fn normalize(&self, implicit: TimezoneOffset) -> Result<NaiveDateTime, Error> {
        let anchor = NaiveDate::from_ymd_opt(1972, 12, 31)
            .ok_or_else(|| Error::from_code(ErrorCode::FODT0001, "invalid reference date 1972-12-31"))?;
        to_utc(anchor.and_time(self.time), self.tz, implicit)
    }
}

impl fmt::Display for XsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_time(f, self.time)?;
        write_tz(f, self.tz)
    }
}

/// `xs:dateTime`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XsDateTime {
    datetime: NaiveDateTime,
    tz: Option<TimezoneOffset>,
}

impl XsDateTime {
    pub fn new(datetime: NaiveDateTime, tz: Option<TimezoneOffset>) -> Self {
        Self { datetime, tz }
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    pub fn timezone(&self) -> Option<TimezoneOffset> {
        self.tz
    }

    pub fn normalize(&self, implicit: TimezoneOffset) -> Result<NaiveDateTime, Error> {
        to_utc(self.datetime, self.tz, implicit)
    }
}

impl fmt::Display for XsDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_date(f, self.datetime.date())?;
        f.write_str("T")?;
        write_time(f, self.datetime.time())?;
        write_tz(f, self.tz)
    }
}

/// `xs:yearMonthDuration` as a signed month count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct YearMonthDuration {
    months: i64,
}

impl YearMonthDuration {
    pub fn from_months(months: i64) -> Self {
        Self { months }
    }

    pub fn months(&self) -> i64 {
        self.months
    }

    pub fn is_zero(&self) -> bool {
        self.months == 0
    }
}

impl fmt::Display for YearMonthDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months == 0 {
            return f.write_str("P0M");
        }
        if self.months < 0 {
            f.write_str("-")?;
        }
        let abs = self.months.unsigned_abs();
        let (years, months) = (abs / 12, abs % 12);
        f.write_str("P")?;
        if years > 0 {
            write!(f, "{years}Y")?;
        }
        if months > 0 {
            write!(f, "{months}M")?;
        }
        Ok(())
    }
}

/// `xs:dayTimeDuration` as a signed, arbitrary-precision second count.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DayTimeDuration {
    seconds: BigDecimal,
}

impl DayTimeDuration {
    pub fn from_seconds(seconds: BigDecimal) -> Self {
        Self { seconds }
    }

    pub fn from_whole_seconds(seconds: i64) -> Self {
        Self {
            seconds: BigDecimal::from(seconds),
        }
    }

    pub fn seconds(&self) -> &BigDecimal {
        &self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds.is_zero()
    }

    /// Converts to a chrono delta, truncating below nanosecond precision.
    pub fn to_time_delta(&self) -> Result<TimeDelta, Error> {
        let overflow = || Error::from_code(ErrorCode::FODT0001, format!("duration {self} exceeds date/time range"));
        let (m, scale) = self.seconds.as_bigint_and_exponent();
        let nanos = if scale <= 9 {
            m * pow10((9 - scale).unsigned_abs())
        } else {
            m / pow10((scale - 9).unsigned_abs())
        };
        let nanos = nanos.to_i128().ok_or_else(overflow)?;
        let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).map_err(|_| overflow())?;
        // rem_euclid keeps this in 0..1e9
        let sub = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
        TimeDelta::new(secs, sub).ok_or_else(overflow)
    }

    pub fn from_time_delta(delta: TimeDelta) -> Self {
        let total = i128::from(delta.num_seconds()) * NANOS_PER_SECOND + i128::from(delta.subsec_nanos());
        Self {
            seconds: BigDecimal::new(BigInt::from(total), 9),
        }
    }
}

impl fmt::Display for DayTimeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds.is_zero() {
            return f.write_str("PT0S");
        }
        if self.seconds.is_negative() {
            f.write_str("-")?;
        }
        let abs = self.seconds.abs();
        let whole = trunc_to_bigint(&abs);
        let frac = &abs - BigDecimal::from(whole.clone());
        let day = BigInt::from(SECONDS_PER_DAY);
        let days = &whole / &day;
        let rem = &whole % &day;
        let hours = &rem / 3600u32;
        let minutes = (&rem % 3600u32) / 60u32;
        let secs = BigDecimal::from(&rem % 60u32) + frac;

        f.write_str("P")?;
        if !days.is_zero() {
            write!(f, "{days}D")?;
        }
        if !(hours.is_zero() && minutes.is_zero() && secs.is_zero()) {
            f.write_str("T")?;
            if !hours.is_zero() {
                write!(f, "{hours}H")?;
            }
            if !minutes.is_zero() {
                write!(f, "{minutes}M")?;
            }
            if !secs.is_zero() {
                write!(f, "{}S", format_decimal(&secs))?;
            }
        }
        Ok(())
    }
}
