//! Lexical constructors: text to validated atomic values.
//!
//! Every entry point applies whitespace collapsing (leading and trailing XML
//! whitespace is stripped; none of these types allows inner whitespace) and
//! reports malformed input as `err:FORG0001`.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use core::str::FromStr;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::consts::SECONDS_PER_DAY;
use crate::engine::runtime::{Error, ErrorCode};
use crate::xdm::temporal::{DayTimeDuration, TimezoneOffset, XsDate, XsDateTime, XsTime, YearMonthDuration};
use crate::xdm::{AtomicType, XdmAtomicValue};

fn collapse(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

/// `digits`, `digits.`, `digits.digits` or `.digits`.
fn is_decimal_body(s: &str) -> bool {
    match s.split_once('.') {
        None => all_digits(s),
        Some((int, frac)) => {
            (int.is_empty() || all_digits(int)) && (frac.is_empty() || all_digits(frac)) && !(int.is_empty() && frac.is_empty())
        }
    }
}

pub fn parse_integer(s: &str) -> Result<BigInt, Error> {
    let text = collapse(s);
    let (negative, body) = split_sign(text);
    if !all_digits(body) {
        return Err(Error::invalid_lexical("xs:integer", s));
    }
    let magnitude = BigInt::from_str(body).map_err(|_| Error::invalid_lexical("xs:integer", s))?;
    Ok(if negative { -magnitude } else { magnitude })
}

pub fn parse_decimal(s: &str) -> Result<BigDecimal, Error> {
    let text = collapse(s);
    let (negative, body) = split_sign(text);
    if !is_decimal_body(body) {
        return Err(Error::invalid_lexical("xs:decimal", s));
    }
    let mut normalized = String::with_capacity(body.len() + 3);
    if negative {
        normalized.push('-');
    }
    if body.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(body.strip_suffix('.').unwrap_or(body));
    Ok(BigDecimal::from_str(&normalized)?)
}

/// Validates the XSD float/double lexical space and returns the text to hand
/// to Rust's float parser, which itself accepts forms such as `inf`.
fn float_lexical<'a>(type_name: &str, s: &'a str) -> Result<&'a str, Error> {
    let text = collapse(s);
    if matches!(text, "INF" | "+INF" | "-INF" | "NaN") {
        return Ok(text);
    }
    let (_, body) = split_sign(text);
    let mantissa = match body.find(['e', 'E']) {
        Some(pos) => {
            let (_, exp) = split_sign(&body[pos + 1..]);
            if !all_digits(exp) {
                return Err(Error::invalid_lexical(type_name, s));
            }
            &body[..pos]
        }
        None => body,
    };
    if !is_decimal_body(mantissa) {
        return Err(Error::invalid_lexical(type_name, s));
    }
    Ok(text)
}

pub fn parse_double(s: &str) -> Result<f64, Error> {
    Ok(match float_lexical("xs:double", s)? {
        "INF" | "+INF" => f64::INFINITY,
        "-INF" => f64::NEG_INFINITY,
        "NaN" => f64::NAN,
        text => text.parse::<f64>()?,
    })
}

pub fn parse_float(s: &str) -> Result<f32, Error> {
    Ok(match float_lexical("xs:float", s)? {
        "INF" | "+INF" => f32::INFINITY,
        "-INF" => f32::NEG_INFINITY,
        "NaN" => f32::NAN,
        text => text.parse::<f32>()?,
    })
}

pub fn parse_boolean(s: &str) -> Result<bool, Error> {
    match collapse(s) {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::invalid_lexical("xs:boolean", s)),
    }
}

/// Splits a trailing `Z` / `±hh:mm` off a date or time lexical.
fn split_timezone<'a>(type_name: &str, original: &str, text: &'a str) -> Result<(&'a str, Option<TimezoneOffset>), Error> {
    if let Some(rest) = text.strip_suffix('Z') {
        return Ok((rest, Some(TimezoneOffset::UTC)));
    }
    let bytes = text.as_bytes();
    let n = bytes.len();
    if n >= 6 && matches!(bytes[n - 6], b'+' | b'-') && bytes[n - 3] == b':' {
        let (rest, tz) = text.split_at(n - 6);
        let bad = || Error::invalid_lexical(type_name, original);
        let (hh, mm) = (&tz[1..3], &tz[4..6]);
        if !all_digits(hh) || !all_digits(mm) {
            return Err(bad());
        }
        let hours: i32 = hh.parse().map_err(|_| bad())?;
        let minutes: i32 = mm.parse().map_err(|_| bad())?;
        if minutes > 59 {
            return Err(bad());
        }
        let total = hours * 60 + minutes;
        let signed = if tz.starts_with('-') { -total } else { total };
        let offset = TimezoneOffset::new(signed).map_err(|_| bad())?;
        return Ok((rest, Some(offset)));
    }
    Ok((text, None))
}

fn date_fields(type_name: &str, original: &str, text: &str) -> Result<NaiveDate, Error> {
    let bad = || Error::invalid_lexical(type_name, original);
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut parts = body.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(bad());
    };
    if !all_digits(y) || y.len() < 4 || (y.len() > 4 && y.starts_with('0')) {
        return Err(bad());
    }
    if !all_digits(m) || m.len() != 2 || !all_digits(d) || d.len() != 2 {
        return Err(bad());
    }
    let year: i32 = y.parse().map_err(|_| bad())?;
    let year = if negative { -year } else { year };
    let month: u32 = m.parse().map_err(|_| bad())?;
    let day: u32 = d.parse().map_err(|_| bad())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Returns the time and whether it was written as `24:00:00`.
fn time_fields(type_name: &str, original: &str, text: &str) -> Result<(NaiveTime, bool), Error> {
    let bad = || Error::invalid_lexical(type_name, original);
    let (hms, frac) = match text.split_once('.') {
        Some((hms, frac)) => (hms, Some(frac)),
        None => (text, None),
    };
    let mut parts = hms.split(':');
    let (Some(h), Some(m), Some(sec), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
        return Err(bad());
    };
    for p in [h, m, sec] {
        if p.len() != 2 || !all_digits(p) {
            return Err(bad());
        }
    }
    let nanos = match frac {
        Some(f) if all_digits(f) => {
            let mut digits: String = f.chars().take(9).collect();
            while digits.len() < 9 {
                digits.push('0');
            }
            digits.parse::<u32>().map_err(|_| bad())?
        }
        Some(_) => return Err(bad()),
        None => 0,
    };
    let hour: u32 = h.parse().map_err(|_| bad())?;
    let minute: u32 = m.parse().map_err(|_| bad())?;
    let second: u32 = sec.parse().map_err(|_| bad())?;
    if hour == 24 {
        if minute == 0 && second == 0 && nanos == 0 {
            return Ok((NaiveTime::MIN, true));
        }
        return Err(bad());
    }
    // leap seconds are not part of the value space
    if second > 59 {
        return Err(bad());
    }
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or_else(bad)?;
    Ok((time, false))
}

pub fn parse_date(s: &str) -> Result<XsDate, Error> {
    let (body, tz) = split_timezone("xs:date", s, collapse(s))?;
    let date = date_fields("xs:date", s, body)?;
    Ok(XsDate::new(date, tz))
}

/// `24:00:00` is accepted and denotes midnight.
pub fn parse_time(s: &str) -> Result<XsTime, Error> {
    let (body, tz) = split_timezone("xs:time", s, collapse(s))?;
    let (time, _) = time_fields("xs:time", s, body)?;
    Ok(XsTime::new(time, tz))
}

/// `T24:00:00` denotes the first instant of the following day.
pub fn parse_date_time(s: &str) -> Result<XsDateTime, Error> {
    let (body, tz) = split_timezone("xs:dateTime", s, collapse(s))?;
    let (date_part, time_part) = body
        .split_once('T')
        .ok_or_else(|| Error::invalid_lexical("xs:dateTime", s))?;
    let date = date_fields("xs:dateTime", s, date_part)?;
    let (time, end_of_day) = time_fields("xs:dateTime", s, time_part)?;
    let mut datetime = NaiveDateTime::new(date, time);
    if end_of_day {
        datetime = datetime
            .checked_add_signed(TimeDelta::days(1))
            .ok_or_else(|| Error::invalid_lexical("xs:dateTime", s))?;
    }
    Ok(XsDateTime::new(datetime, tz))
}

#[derive(Default)]
struct DurationFields {
    negative: bool,
    years: Option<BigInt>,
    months: Option<BigInt>,
    days: Option<BigInt>,
    hours: Option<BigInt>,
    minutes: Option<BigInt>,
    seconds: Option<BigDecimal>,
}

// -?P(nY)?(nM)?(nD)?(T(nH)?(nM)?(n(.n)?S)?)?
fn duration_fields(type_name: &str, s: &str) -> Result<DurationFields, Error> {
    let bad = || Error::invalid_lexical(type_name, s);
    let text = collapse(s);
    let mut fields = DurationFields::default();
    let text = match text.strip_prefix('-') {
        Some(rest) => {
            fields.negative = true;
            rest
        }
        None => text,
    };
    let body = text.strip_prefix('P').ok_or_else(bad)?;
    let (date_part, time_part) = match body.split_once('T') {
        Some((_, "")) => return Err(bad()),
        Some((d, t)) => (d, Some(t)),
        None => (body, None),
    };

    // designators must appear in this order, each at most once
    let mut rest = date_part;
    for (designator, slot) in [('Y', &mut fields.years), ('M', &mut fields.months), ('D', &mut fields.days)] {
        if let Some(pos) = rest.find(designator) {
            let digits = &rest[..pos];
            if !all_digits(digits) {
                return Err(bad());
            }
            *slot = Some(BigInt::from_str(digits).map_err(|_| bad())?);
            rest = &rest[pos + 1..];
        }
    }
    if !rest.is_empty() {
        return Err(bad());
    }

    if let Some(time) = time_part {
        let mut rest = time;
        for (designator, slot) in [('H', &mut fields.hours), ('M', &mut fields.minutes)] {
            if let Some(pos) = rest.find(designator) {
                let digits = &rest[..pos];
                if !all_digits(digits) {
                    return Err(bad());
                }
                *slot = Some(BigInt::from_str(digits).map_err(|_| bad())?);
                rest = &rest[pos + 1..];
            }
        }
        if let Some(secs) = rest.strip_suffix('S') {
            if !is_decimal_body(secs) || secs.starts_with('.') || secs.ends_with('.') {
                return Err(bad());
            }
            fields.seconds = Some(BigDecimal::from_str(secs).map_err(|_| bad())?);
        } else if !rest.is_empty() {
            return Err(bad());
        }
    }

    let any = fields.years.is_some()
        || fields.months.is_some()
        || fields.days.is_some()
        || fields.hours.is_some()
        || fields.minutes.is_some()
        || fields.seconds.is_some();
    if !any {
        return Err(bad());
    }
    Ok(fields)
}

pub fn parse_year_month_duration(s: &str) -> Result<YearMonthDuration, Error> {
    let f = duration_fields("xs:yearMonthDuration", s)?;
    if f.days.is_some() || f.hours.is_some() || f.minutes.is_some() || f.seconds.is_some() {
        return Err(Error::invalid_lexical("xs:yearMonthDuration", s));
    }
    let total = f.years.unwrap_or_default() * 12u8 + f.months.unwrap_or_default();
    let total = if f.negative { -total } else { total };
    let months = total
        .to_i64()
        .ok_or_else(|| Error::from_code(ErrorCode::FODT0002, format!("xs:yearMonthDuration out of range: '{s}'")))?;
    Ok(YearMonthDuration::from_months(months))
}

pub fn parse_day_time_duration(s: &str) -> Result<DayTimeDuration, Error> {
    let f = duration_fields("xs:dayTimeDuration", s)?;
    if f.years.is_some() || f.months.is_some() {
        return Err(Error::invalid_lexical("xs:dayTimeDuration", s));
    }
    let whole = f.days.unwrap_or_default() * SECONDS_PER_DAY
        + f.hours.unwrap_or_default() * 3600u32
        + f.minutes.unwrap_or_default() * 60u32;
    let total = BigDecimal::from(whole) + f.seconds.unwrap_or_default();
    let total = if f.negative && !total.is_zero() { -total } else { total };
    Ok(DayTimeDuration::from_seconds(crate::xdm::decimal::normalize(total)))
}

/// Construct a value of `target` from its lexical form.
///
/// Abstract types (`xs:anyAtomicType`, `xs:numeric`, `xs:duration`) have no
/// lexical space of their own here and raise `err:XPTY0004`.
pub fn parse_atomic(target: AtomicType, s: &str) -> Result<XdmAtomicValue, Error> {
    Ok(match target {
        AtomicType::String => XdmAtomicValue::String(s.to_string()),
        AtomicType::UntypedAtomic => XdmAtomicValue::UntypedAtomic(s.to_string()),
        AtomicType::Boolean => XdmAtomicValue::Boolean(parse_boolean(s)?),
        AtomicType::Integer => XdmAtomicValue::Integer(parse_integer(s)?),
        AtomicType::Decimal => XdmAtomicValue::Decimal(parse_decimal(s)?),
        AtomicType::Float => XdmAtomicValue::Float(parse_float(s)?),
        AtomicType::Double => XdmAtomicValue::Double(parse_double(s)?),
        AtomicType::YearMonthDuration => XdmAtomicValue::YearMonthDuration(parse_year_month_duration(s)?),
        AtomicType::DayTimeDuration => XdmAtomicValue::DayTimeDuration(parse_day_time_duration(s)?),
        AtomicType::Date => XdmAtomicValue::Date(parse_date(s)?),
        AtomicType::Time => XdmAtomicValue::Time(parse_time(s)?),
        AtomicType::DateTime => XdmAtomicValue::DateTime(parse_date_time(s)?),
        AtomicType::AnyAtomicType | AtomicType::Numeric | AtomicType::Duration => {
            return Err(Error::type_error(format!("cannot construct a value of abstract type {target}")));
        }
    })
}

/// Cast an `xs:untypedAtomic` operand to `target`; other values must already
/// be of that kind.
pub fn cast_untyped(value: &XdmAtomicValue, target: AtomicType) -> Result<XdmAtomicValue, Error> {
    match value {
        XdmAtomicValue::UntypedAtomic(s) => parse_atomic(target, s),
        other if other.kind() == target => Ok(other.clone()),
        other => Err(Error::type_error(format!("cannot cast {} to {target}", other.kind()))),
    }
}
