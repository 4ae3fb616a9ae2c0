use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::estimate::{estimate_queue_waits, WaitEstimate};
use crate::models::{ServiceTimeTable, SimConfig};
use crate::state::Customer;
use crate::trace::QueueObserver;

#[derive(Clone, Debug)]
pub struct AgingPolicy {
    pub priority_tickets: HashSet<String>,
    pub priority_threshold: f64,
    pub non_priority_threshold: f64,
    pub max_forced_skips: u32,
    pub skip_ceiling: u32,
}

impl AgingPolicy {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            priority_tickets: config.priority_tickets.iter().cloned().collect(),
            priority_threshold: config.priority_threshold_minutes,
            non_priority_threshold: config.non_priority_threshold_minutes,
            max_forced_skips: config.max_forced_skips,
            skip_ceiling: config.skip_ceiling,
        }
    }

    pub fn is_priority(&self, customer: &Customer) -> bool {
        self.priority_tickets.contains(&customer.ticket_type)
    }
}

/// Moves priority customers forward until the queue is stable. Runs
/// stabilization passes: each pass recomputes projected waits, scans for the
/// first over-threshold priority customer that can move, commits the move,
/// and restarts, because a move invalidates every projected wait computed
/// before it. Terminates when a full pass makes no move.
pub fn optimize_queue(
    queue: &mut Vec<Customer>,
    service_times: &ServiceTimeTable,
    window_count: usize,
    policy: &AgingPolicy,
    now: NaiveDateTime,
    observer: &mut dyn QueueObserver,
) -> Result<()> {
    if queue.len() < 2 || !queue.iter().any(|customer| policy.is_priority(customer)) {
        return Ok(());
    }

    let mut pass = 0u32;
    loop {
        pass += 1;
        observer.pass_started(pass, queue.len());
        let waits = estimate_queue_waits(window_count, queue, service_times, now)?;
        let mut moved = false;

        // queue is untouched until a commit, so snapshot positions stay
        // valid for the whole scan
        for position in 0..queue.len() {
            if !policy.is_priority(&queue[position]) {
                continue;
            }
            if waits[position].total_wait_minutes <= policy.priority_threshold {
                continue;
            }

            let skips = forward_skips(queue, &waits, position, service_times, policy)?;
            if skips == 0 {
                continue;
            }
            let target = position - skips;

            for skipped in queue[target..position].iter_mut() {
                if !policy.priority_tickets.contains(&skipped.ticket_type) {
                    skipped.record_skip();
                }
            }
            let customer = queue.remove(position);
            let customer_id = customer.id;
            queue.insert(target, customer);
            observer.customer_moved(customer_id, position, target);
            moved = true;
            break;
        }

        observer.pass_finished(pass, moved);
        if !moved {
            break;
        }
    }

    Ok(())
}

/// Walks backward from `position` counting how many entries the priority
/// customer there may skip. The walk stops at another priority customer, at
/// an entry whose skip count reached the ceiling, or at an entry whose new
/// wait would break the non-priority threshold once the forced-skip budget
/// for this evaluation is spent.
fn forward_skips(
    queue: &[Customer],
    waits: &[WaitEstimate],
    position: usize,
    service_times: &ServiceTimeTable,
    policy: &AgingPolicy,
) -> Result<usize> {
    let service_minutes = service_times.lookup(&queue[position].ticket_type)?;
    let mut projected = waits[position].total_wait_minutes;
    let mut forced_used = 0u32;
    let mut skips = 0usize;

    for ahead in (0..position).rev() {
        let candidate = &queue[ahead];
        if policy.is_priority(candidate) {
            break;
        }
        if candidate.skip_count >= policy.skip_ceiling {
            break;
        }

        let candidate_new_wait = waits[ahead].total_wait_minutes + service_minutes;
        if candidate_new_wait > policy.non_priority_threshold {
            if forced_used >= policy.max_forced_skips {
                break;
            }
            forced_used += 1;
        }

        projected -= service_times.lookup(&candidate.ticket_type)?;
        skips = position - ahead;
        if projected < policy.priority_threshold {
            break;
        }
    }

    Ok(skips)
}
