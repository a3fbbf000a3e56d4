//! Date/time and duration arithmetic.

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use core::str::FromStr;
use num_traits::{ToPrimitive, Zero};

use crate::consts::{DURATION_RATIO_PRECISION, SECONDS_PER_DAY};
use crate::engine::runtime::{Error, ErrorCode};
use crate::xdm::XdmAtomicValue;
use crate::xdm::decimal::{align, div_half_up, div_significant, normalize, trunc_to_bigint};
use crate::xdm::temporal::{DayTimeDuration, TimezoneOffset, XsDate, XsDateTime, XsTime, YearMonthDuration};

use super::numeric::{Num, divide_decimal};

fn date_overflow() -> Error {
    Error::from_code(ErrorCode::FODT0001, "date/time arithmetic overflow")
}

fn duration_overflow() -> Error {
    Error::from_code(ErrorCode::FODT0002, "duration arithmetic overflow")
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
            if leap { 29 } else { 28 }
        }
    }
}

/// Move `date` by `delta_months`, clamping the day to the target month's
/// last day (`2024-01-31 + P1M = 2024-02-29`). `None` outside chrono's range.
pub(crate) fn shift_months(date: NaiveDate, delta_months: i64) -> Option<NaiveDate> {
    let total = i64::from(date.year())
        .checked_mul(12)?
        .checked_add(i64::from(date.month0()))?
        .checked_add(delta_months)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

fn shift_datetime(dt: NaiveDateTime, delta: TimeDelta) -> Result<NaiveDateTime, Error> {
    dt.checked_add_signed(delta).ok_or_else(date_overflow)
}

/// Wrap a second count into a single day so huge durations still move a time.
fn wrap_day(seconds: &BigDecimal) -> DayTimeDuration {
    let whole = trunc_to_bigint(seconds);
    let frac = seconds - BigDecimal::from(whole.clone());
    let wrapped = BigDecimal::from(whole % SECONDS_PER_DAY) + frac;
    DayTimeDuration::from_seconds(wrapped)
}

/// `temporal + duration`, or `temporal - duration` when `subtract` is set.
/// The timezone of the temporal operand is carried over unchanged.
pub(crate) fn shift(temporal: &XdmAtomicValue, duration: &XdmAtomicValue, subtract: bool) -> Result<XdmAtomicValue, Error> {
    use XdmAtomicValue as V;
    match (temporal, duration) {
        (V::Date(d), V::YearMonthDuration(m)) => {
            let months = signed_months(m, subtract)?;
            let date = shift_months(d.date(), months).ok_or_else(date_overflow)?;
            Ok(V::Date(XsDate::new(date, d.timezone())))
        }
        (V::DateTime(dt), V::YearMonthDuration(m)) => {
            let months = signed_months(m, subtract)?;
            let local = dt.datetime();
            let date = shift_months(local.date(), months).ok_or_else(date_overflow)?;
            Ok(V::DateTime(XsDateTime::new(date.and_time(local.time()), dt.timezone())))
        }
        (V::Date(d), V::DayTimeDuration(s)) => {
            let delta = signed_delta(s, subtract)?;
            let moved = shift_datetime(d.date().and_time(NaiveTime::MIN), delta)?;
            Ok(V::Date(XsDate::new(moved.date(), d.timezone())))
        }
        (V::DateTime(dt), V::DayTimeDuration(s)) => {
            let delta = signed_delta(s, subtract)?;
            let moved = shift_datetime(dt.datetime(), delta)?;
            Ok(V::DateTime(XsDateTime::new(moved, dt.timezone())))
        }
        (V::Time(t), V::DayTimeDuration(s)) => {
            let delta = wrap_day(s.seconds()).to_time_delta()?;
            let delta = if subtract { -delta } else { delta };
            let (moved, _) = t.time().overflowing_add_signed(delta);
            Ok(V::Time(XsTime::new(moved, t.timezone())))
        }
        (t, d) => Err(Error::type_error(format!("cannot shift {} by {}", t.kind(), d.kind()))),
    }
}

fn signed_months(m: &YearMonthDuration, subtract: bool) -> Result<i64, Error> {
    if subtract {
        m.months().checked_neg().ok_or_else(date_overflow)
    } else {
        Ok(m.months())
    }
}

fn signed_delta(s: &DayTimeDuration, subtract: bool) -> Result<TimeDelta, Error> {
    let delta = s.to_time_delta()?;
    Ok(if subtract { -delta } else { delta })
}

/// `a - b` for two values of the same temporal kind, on their normalized
/// instants.
pub(crate) fn difference(
    a: &XdmAtomicValue,
    b: &XdmAtomicValue,
    implicit: TimezoneOffset,
) -> Result<DayTimeDuration, Error> {
    use XdmAtomicValue as V;
    let (x, y) = match (a, b) {
        (V::Date(x), V::Date(y)) => (x.normalize(implicit)?, y.normalize(implicit)?),
        (V::Time(x), V::Time(y)) => (x.normalize(implicit)?, y.normalize(implicit)?),
        (V::DateTime(x), V::DateTime(y)) => (x.normalize(implicit)?, y.normalize(implicit)?),
        (x, y) => {
            return Err(Error::type_error(format!("cannot subtract {} from {}", y.kind(), x.kind())));
        }
    };
    let delta = x.signed_duration_since(y);
    Ok(DayTimeDuration::from_seconds(normalize(
        DayTimeDuration::from_time_delta(delta).seconds().clone(),
    )))
}

/// Same-kind duration `+` / `-`.
pub(crate) fn combine_durations(
    a: &XdmAtomicValue,
    b: &XdmAtomicValue,
    subtract: bool,
) -> Result<XdmAtomicValue, Error> {
    use XdmAtomicValue as V;
    match (a, b) {
        (V::YearMonthDuration(x), V::YearMonthDuration(y)) => {
            let months = if subtract {
                x.months().checked_sub(y.months())
            } else {
                x.months().checked_add(y.months())
            };
            Ok(V::YearMonthDuration(YearMonthDuration::from_months(
                months.ok_or_else(duration_overflow)?,
            )))
        }
        (V::DayTimeDuration(x), V::DayTimeDuration(y)) => {
            let secs = if subtract {
                x.seconds() - y.seconds()
            } else {
                x.seconds() + y.seconds()
            };
            Ok(V::DayTimeDuration(DayTimeDuration::from_seconds(normalize(secs))))
        }
        (x, y) => Err(Error::type_error(format!("cannot combine {} with {}", x.kind(), y.kind()))),
    }
}

fn exact_factor(factor: &Num) -> Result<BigDecimal, Error> {
    match factor {
        Num::Int(i) => Ok(BigDecimal::from(i.clone())),
        Num::Dec(d) => Ok(d.clone()),
        other => {
            let f = other.to_f64();
            if f.is_nan() {
                return Err(Error::from_code(ErrorCode::FOCA0005, "NaN supplied as duration factor"));
            }
            if f.is_infinite() {
                return Err(duration_overflow());
            }
            // shortest round-trip digits of the float
            Ok(BigDecimal::from_str(&f.to_string())?)
        }
    }
}

fn infinite_factor(factor: &Num) -> bool {
    matches!(factor, Num::Float(_) | Num::Double(_)) && factor.to_f64().is_infinite()
}

/// `duration * factor`, or `duration div factor` when `divide` is set.
pub(crate) fn scale_duration(duration: &XdmAtomicValue, factor: &Num, divide: bool) -> Result<XdmAtomicValue, Error> {
    use XdmAtomicValue as V;
    if factor.is_nan() {
        return Err(Error::from_code(ErrorCode::FOCA0005, "NaN supplied as duration factor"));
    }
    match duration {
        V::YearMonthDuration(m) => {
            if divide && infinite_factor(factor) {
                return Ok(V::YearMonthDuration(YearMonthDuration::default()));
            }
            let f = exact_factor(factor)?;
            if divide && f.is_zero() {
                return Err(duration_overflow());
            }
            let months = BigDecimal::from(m.months());
            let (num, den, _) = if divide {
                align(&months, &f)
            } else {
                align(&(months * &f), &BigDecimal::from(1))
            };
            // rounded half toward positive infinity
            let months = div_half_up(&num, &den).to_i64().ok_or_else(duration_overflow)?;
            Ok(V::YearMonthDuration(YearMonthDuration::from_months(months)))
        }
        V::DayTimeDuration(s) => {
            if divide && infinite_factor(factor) {
                return Ok(V::DayTimeDuration(DayTimeDuration::default()));
            }
            let f = exact_factor(factor)?;
            let secs = if divide {
                if f.is_zero() {
                    return Err(duration_overflow());
                }
                divide_decimal(s.seconds(), &f)
            } else {
                normalize(s.seconds() * &f)
            };
            Ok(V::DayTimeDuration(DayTimeDuration::from_seconds(secs)))
        }
        other => Err(Error::type_error(format!("cannot scale {}", other.kind()))),
    }
}

/// `a div b` for two durations of the same kind.
pub(crate) fn duration_ratio(a: &XdmAtomicValue, b: &XdmAtomicValue) -> Result<BigDecimal, Error> {
    use XdmAtomicValue as V;
    let (x, y) = match (a, b) {
        (V::YearMonthDuration(x), V::YearMonthDuration(y)) => {
            (BigDecimal::from(x.months()), BigDecimal::from(y.months()))
        }
        (V::DayTimeDuration(x), V::DayTimeDuration(y)) => (x.seconds().clone(), y.seconds().clone()),
        (x, y) => {
            return Err(Error::type_error(format!("cannot divide {} by {}", x.kind(), y.kind())));
        }
    };
    if y.is_zero() {
        return Err(Error::from_code(ErrorCode::FOAR0001, "division of a duration by a zero duration"));
    }
    Ok(div_significant(&x, &y, DURATION_RATIO_PRECISION))
}
