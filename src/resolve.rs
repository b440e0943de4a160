use crate::parser::{ClockFields, ParseError};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::warn;

pub fn resolve_times(
    departure_date: NaiveDate,
    clock: &ClockFields,
    duration: Duration,
) -> Result<(NaiveDateTime, NaiveDateTime), ParseError> {
    let departs = departure_date.and_time(clock.departs);

    let duration_implied = departs
        .checked_add_signed(duration)
        .ok_or_else(|| resolution_error(departure_date, "duration overflows the calendar"))?
        .date();

    let arrival_date = match clock.day_offset {
        Some(offset) => {
            let by_suffix = departure_date
                .checked_add_signed(Duration::days(offset))
                .ok_or_else(|| resolution_error(departure_date, "day offset overflows the calendar"))?;

            if by_suffix != duration_implied {
                warn!(
                    departure = %departs,
                    suffix_date = %by_suffix,
                    duration_date = %duration_implied,
                    "day-offset suffix and duration disagree on the arrival day; keeping the suffix"
                );
            }

            by_suffix
        }
        None => duration_implied,
    };

    let mut arrives = arrival_date.and_time(clock.arrives);

    // A rounded duration text can undershoot midnight; the arrival clock is
    // still authoritative, so push it onto the next day.
    if arrives < departs {
        arrives = arrives
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| resolution_error(departure_date, "rollover overflows the calendar"))?;
    }

    Ok((departs, arrives))
}

fn resolution_error(departure_date: NaiveDate, detail: &str) -> ParseError {
    ParseError::TimeResolutionError(format!("{detail} (departure date {departure_date})"))
}
