use std::collections::VecDeque;

use chrono::{NaiveDate, NaiveDateTime};

use crate::arrivals::build_arrivals;
use crate::clock::{add_minutes, minutes_between};
use crate::error::{Error, Result};
use crate::models::{ServiceTimeTable, SimConfig};
use crate::optimize::{optimize_queue, AgingPolicy};
use crate::state::{Customer, ServiceWindow, SimulationRecord};
use crate::trace::{NoopObserver, QueueObserver};

#[derive(Clone, Debug)]
pub struct Arrival {
    pub at: NaiveDateTime,
    pub ticket_type: String,
}

pub struct ClinicSimulator {
    config: SimConfig,
    service_times: ServiceTimeTable,
    policy: AgingPolicy,
    windows: Vec<ServiceWindow>,
    queue: Vec<Customer>,
    pending: VecDeque<Customer>,
    record: SimulationRecord,
}

impl ClinicSimulator {
    pub fn new(config: SimConfig) -> Result<Self> {
        validate_config(&config)?;
        let service_times = ServiceTimeTable::new(&config.service_times)?;
        let policy = AgingPolicy::from_config(&config);
        let windows = (0..config.windows).map(ServiceWindow::new).collect();
        Ok(Self {
            config,
            service_times,
            policy,
            windows,
            queue: Vec::new(),
            pending: VecDeque::new(),
            record: SimulationRecord::default(),
        })
    }

    /// Runs one operating day over a pre-sorted arrival feed. Simulated time
    /// jumps from event to event (next arrival or next window completion);
    /// each iteration admits due arrivals, frees finished windows, assigns
    /// queue heads, and periodically invokes the queue optimizer.
    pub fn simulate_day(
        &mut self,
        arrivals: Vec<Arrival>,
        date: NaiveDate,
        observer: &mut dyn QueueObserver,
    ) -> Result<SimulationRecord> {
        let opening = instant_at(date, self.config.opening_hour, self.config.closing_hour)?;
        let closing = instant_at(date, self.config.closing_hour, self.config.closing_hour)?;

        self.windows = (0..self.config.windows).map(ServiceWindow::new).collect();
        self.queue.clear();
        self.record = SimulationRecord::new(opening, closing);
        self.pending = arrivals
            .into_iter()
            .enumerate()
            .map(|(ix, arrival)| Customer::new(ix as u64, arrival.at, arrival.ticket_type))
            .collect();

        let mut now = opening;
        let mut last_optimization = opening;

        while now < closing {
            self.admit_arrivals(now);
            self.release_completed(now);
            self.assign_windows(now)?;

            if minutes_between(now, last_optimization) >= self.config.optimization_interval_minutes
            {
                if self.queue.len() > 1 {
                    observer.optimization_triggered(now, self.queue.len());
                    optimize_queue(
                        &mut self.queue,
                        &self.service_times,
                        self.config.windows,
                        &self.policy,
                        now,
                        observer,
                    )?;
                }
                last_optimization = now;
            }

            match self.next_event_time() {
                Some(next) if next < closing => now = next,
                _ => {
                    now = closing;
                    break;
                }
            }
        }

        self.drain_queue(closing);
        self.run_grace_period(closing);

        Ok(std::mem::take(&mut self.record))
    }

    fn admit_arrivals(&mut self, now: NaiveDateTime) {
        while self
            .pending
            .front()
            .is_some_and(|customer| customer.arrival_time <= now)
        {
            if let Some(customer) = self.pending.pop_front() {
                debug_assert!(!self.queue.iter().any(|queued| queued.id == customer.id));
                self.record.record_arrival(&customer);
                self.queue.push(customer);
            }
        }
    }

    fn release_completed(&mut self, now: NaiveDateTime) {
        for window in &mut self.windows {
            if !window.is_available() && window.is_service_complete(now) {
                if let Some(customer) = window.finish_service() {
                    self.record.record_service_completion(customer.id, now);
                }
            }
        }
    }

    fn assign_windows(&mut self, now: NaiveDateTime) -> Result<()> {
        for window in &mut self.windows {
            if !window.is_available() || self.queue.is_empty() {
                continue;
            }
            let customer = self.queue.remove(0);
            let service_minutes = self.service_times.lookup(&customer.ticket_type)?;
            let completes_at = add_minutes(now, service_minutes);
            self.record.record_service_start(customer.id, now);
            window.begin_service(customer, completes_at);
        }
        Ok(())
    }

    fn drain_queue(&mut self, closing: NaiveDateTime) {
        for customer in self.queue.drain(..) {
            self.record.record_left_at_closing(customer.id, closing);
        }
    }

    fn run_grace_period(&mut self, closing: NaiveDateTime) {
        let grace_end = add_minutes(closing, self.config.grace_minutes);
        let mut now = closing;
        while now < grace_end {
            self.release_completed(now);
            if self.windows.iter().all(ServiceWindow::is_available) {
                break;
            }
            match self.next_completion_time() {
                Some(next) => now = next.min(grace_end),
                None => break,
            }
        }
        // the boundary itself still counts
        if now == grace_end {
            self.release_completed(now);
        }
    }

    fn next_event_time(&self) -> Option<NaiveDateTime> {
        let next_arrival = self.pending.front().map(|customer| customer.arrival_time);
        match (next_arrival, self.next_completion_time()) {
            (Some(arrival), Some(completion)) => Some(arrival.min(completion)),
            (Some(arrival), None) => Some(arrival),
            (None, completion) => completion,
        }
    }

    fn next_completion_time(&self) -> Option<NaiveDateTime> {
        self.windows
            .iter()
            .filter_map(ServiceWindow::completion_time)
            .min()
    }
}

pub fn run_simulation(config: &SimConfig, date: NaiveDate) -> Result<SimulationRecord> {
    let arrivals = build_arrivals(
        &config.arrivals,
        date,
        config.opening_hour,
        config.closing_hour,
        config.seed,
    )?;
    let mut simulator = ClinicSimulator::new(config.clone())?;
    simulator.simulate_day(arrivals, date, &mut NoopObserver)
}

fn instant_at(date: NaiveDate, hour: u32, closing: u32) -> Result<NaiveDateTime> {
    date.and_hms_opt(hour, 0, 0)
        .ok_or(Error::InvalidOperatingHours {
            opening: hour,
            closing,
        })
}

fn validate_config(config: &SimConfig) -> Result<()> {
    if config.windows == 0 {
        return Err(Error::NoServiceWindows);
    }
    if config.opening_hour >= config.closing_hour || config.closing_hour > 23 {
        return Err(Error::InvalidOperatingHours {
            opening: config.opening_hour,
            closing: config.closing_hour,
        });
    }
    if config.priority_threshold_minutes <= 0.0 {
        return Err(Error::InvalidThreshold("priority"));
    }
    if config.non_priority_threshold_minutes <= 0.0 {
        return Err(Error::InvalidThreshold("non-priority"));
    }
    if config.optimization_interval_minutes <= 0.0 {
        return Err(Error::InvalidOptimizationInterval);
    }
    if config.skip_ceiling == 0 {
        return Err(Error::InvalidSkipCeiling);
    }
    if config.grace_minutes < 0.0 {
        return Err(Error::InvalidGracePeriod);
    }
    Ok(())
}
