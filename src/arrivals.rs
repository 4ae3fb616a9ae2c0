use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{add_minutes, minutes_between};
use crate::engine::Arrival;
use crate::error::{Error, Result};
use crate::models::{ArrivalPlan, RateRow};

/// Materializes an arrival feed for one operating day: sorted ascending and
/// clipped to operating hours, which is what the simulator expects.
pub fn build_arrivals(
    plan: &ArrivalPlan,
    date: NaiveDate,
    opening_hour: u32,
    closing_hour: u32,
    seed: Option<u64>,
) -> Result<Vec<Arrival>> {
    let opening = date
        .and_hms_opt(opening_hour, 0, 0)
        .ok_or(Error::InvalidOperatingHours {
            opening: opening_hour,
            closing: closing_hour,
        })?;
    let closing = date
        .and_hms_opt(closing_hour, 0, 0)
        .ok_or(Error::InvalidOperatingHours {
            opening: opening_hour,
            closing: closing_hour,
        })?;

    let mut arrivals = match plan {
        ArrivalPlan::Listed { entries } => {
            let mut arrivals = Vec::with_capacity(entries.len());
            for entry in entries {
                if !entry.minutes_after_opening.is_finite() || entry.minutes_after_opening < 0.0 {
                    return Err(Error::InvalidArrivalSpec(format!(
                        "{}:{}",
                        entry.minutes_after_opening, entry.ticket_type
                    )));
                }
                arrivals.push(Arrival {
                    at: add_minutes(opening, entry.minutes_after_opening),
                    ticket_type: entry.ticket_type.clone(),
                });
            }
            arrivals
        }
        ArrivalPlan::Poisson { rates } => thin_poisson_arrivals(rates, opening, closing, seed)?,
    };

    arrivals.retain(|arrival| arrival.at < closing);
    arrivals.sort_by_key(|arrival| arrival.at);
    Ok(arrivals)
}

/// Non-homogeneous Poisson process via thinning: candidates are drawn from a
/// homogeneous process at each ticket type's peak rate, then accepted with
/// probability rate(t) / peak.
fn thin_poisson_arrivals(
    rates: &[RateRow],
    opening: NaiveDateTime,
    closing: NaiveDateTime,
    seed: Option<u64>,
) -> Result<Vec<Arrival>> {
    for row in rates {
        if !row.per_hour.is_finite() || row.per_hour < 0.0 {
            return Err(Error::InvalidArrivalRate(row.per_hour));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0));
    let mut arrivals = Vec::new();

    for ticket_type in distinct_ticket_types(rates) {
        let peak = rates
            .iter()
            .filter(|row| row.ticket_type == ticket_type)
            .map(|row| row.per_hour)
            .fold(0.0f64, f64::max);
        if peak <= 0.0 {
            continue;
        }

        let span_hours = minutes_between(closing, opening) / 60.0;
        let mut elapsed_hours = 0.0;
        loop {
            let mut u = rng.gen::<f64>();
            if u <= f64::MIN_POSITIVE {
                u = f64::MIN_POSITIVE;
            }
            elapsed_hours += -u.ln() / peak;
            if elapsed_hours >= span_hours {
                break;
            }
            let at = add_minutes(opening, elapsed_hours * 60.0);
            let rate = rate_at(rates, ticket_type, at);
            if rng.gen::<f64>() < rate / peak {
                arrivals.push(Arrival {
                    at,
                    ticket_type: ticket_type.to_string(),
                });
            }
        }
    }

    Ok(arrivals)
}

fn distinct_ticket_types(rates: &[RateRow]) -> Vec<&str> {
    let mut ticket_types: Vec<&str> = Vec::new();
    for row in rates {
        if !ticket_types.contains(&row.ticket_type.as_str()) {
            ticket_types.push(&row.ticket_type);
        }
    }
    ticket_types
}

fn rate_at(rates: &[RateRow], ticket_type: &str, at: NaiveDateTime) -> f64 {
    let weekday = weekday_name(at.weekday());
    rates
        .iter()
        .find(|row| {
            row.ticket_type == ticket_type
                && row.hour == at.hour()
                && row.weekday.eq_ignore_ascii_case(weekday)
        })
        .map(|row| row.per_hour)
        .unwrap_or(0.0)
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
