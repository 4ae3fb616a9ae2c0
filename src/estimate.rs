use chrono::NaiveDateTime;

use crate::clock::minutes_between;
use crate::error::{Error, Result};
use crate::models::ServiceTimeTable;
use crate::state::Customer;

#[derive(Clone, Debug, PartialEq)]
pub struct WaitEstimate {
    pub customer_id: u64,
    pub total_wait_minutes: f64,
}

/// Projects each queued customer's total time in system: minutes already
/// waited plus minutes until one of the modeled windows frees up for them.
/// The window model is virtual and starts from all-idle; it is independent
/// of the simulator's real window state.
pub fn estimate_queue_waits(
    window_count: usize,
    queue: &[Customer],
    service_times: &ServiceTimeTable,
    now: NaiveDateTime,
) -> Result<Vec<WaitEstimate>> {
    if queue.is_empty() {
        return Ok(Vec::new());
    }
    if window_count == 0 {
        return Err(Error::NoServiceWindows);
    }

    let mut next_free = vec![0.0f64; window_count];
    let mut estimates = Vec::with_capacity(queue.len());

    for customer in queue {
        let service_minutes = service_times.lookup(&customer.ticket_type)?;
        let window = soonest_free_window(&next_free);
        let until_service = next_free[window];
        let already_waited = minutes_between(now, customer.arrival_time);
        estimates.push(WaitEstimate {
            customer_id: customer.id,
            total_wait_minutes: already_waited + until_service,
        });
        next_free[window] += service_minutes;
    }

    Ok(estimates)
}

fn soonest_free_window(next_free: &[f64]) -> usize {
    let mut soonest = 0;
    for (idx, free_at) in next_free.iter().enumerate().skip(1) {
        if *free_at < next_free[soonest] {
            soonest = idx;
        }
    }
    soonest
}
