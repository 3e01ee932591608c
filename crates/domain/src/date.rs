use chrono::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InvalidTimeOfDay {
    #[error("Time of day: `{0}` is not of the form HH:MM")]
    Malformed(String),
    #[error("Time of day: `{0}` is out of range")]
    OutOfRange(String),
}

/// Parses a wall-clock time of the form `HH:MM` (one or two digit hour).
pub fn parse_time_of_day(timestr: &str) -> Result<NaiveTime, InvalidTimeOfDay> {
    let parts = timestr.split(':').collect::<Vec<_>>();
    if parts.len() != 2 {
        return Err(InvalidTimeOfDay::Malformed(timestr.into()));
    }
    let (hour, minute) = (parts[0], parts[1]);
    let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_digits(hour) || hour.len() > 2 || !is_digits(minute) || minute.len() != 2 {
        return Err(InvalidTimeOfDay::Malformed(timestr.into()));
    }

    let hour = hour
        .parse::<u32>()
        .map_err(|_| InvalidTimeOfDay::Malformed(timestr.into()))?;
    let minute = minute
        .parse::<u32>()
        .map_err(|_| InvalidTimeOfDay::Malformed(timestr.into()))?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| InvalidTimeOfDay::OutOfRange(timestr.into()))
}

/// Day of week with Sunday as 0 and Saturday as 6
pub fn weekday_index(date: &NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Whole minutes from `now` until `instant`, truncated towards zero
pub fn minutes_until<Tz1: TimeZone, Tz2: TimeZone>(
    now: &DateTime<Tz1>,
    instant: &DateTime<Tz2>,
) -> i64 {
    instant
        .clone()
        .signed_duration_since(now.clone())
        .num_minutes()
}

/// Resolves a wall-clock date and time in a time zone, with the offset that
/// is in effect at that instant. Returns `None` for a time skipped by a
/// forward transition and the earlier instant for a repeated one.
pub fn local_instant<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    time: NaiveTime,
) -> Option<DateTime<FixedOffset>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|instant| instant.with_timezone(&instant.offset().fix()))
}

/// Renders a lead time, switching to hours above one hour: `45 min`, `2 h`, `1 h 30 min`
pub fn format_lead_time(minutes: i64) -> String {
    if minutes <= 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{} h", hours)
    } else {
        format!("{} h {} min", hours, rest)
    }
}

pub fn millis_to_utc(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
