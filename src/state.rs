use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::minutes_between;

#[derive(Clone, Debug)]
pub struct Customer {
    pub id: u64,
    pub arrival_time: NaiveDateTime,
    pub ticket_type: String,
    pub skip_count: u32,
}

impl Customer {
    pub fn new(id: u64, arrival_time: NaiveDateTime, ticket_type: String) -> Self {
        Self {
            id,
            arrival_time,
            ticket_type,
            skip_count: 0,
        }
    }

    pub fn record_skip(&mut self) {
        self.skip_count += 1;
    }
}

impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Customer {}

#[derive(Clone, Debug)]
pub struct ServiceWindow {
    pub id: usize,
    in_service: Option<(Customer, NaiveDateTime)>,
}

impl ServiceWindow {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            in_service: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.in_service.is_none()
    }

    pub fn completion_time(&self) -> Option<NaiveDateTime> {
        self.in_service.as_ref().map(|(_, completes_at)| *completes_at)
    }

    pub fn begin_service(&mut self, customer: Customer, completes_at: NaiveDateTime) {
        debug_assert!(self.in_service.is_none());
        debug_assert!(completes_at >= customer.arrival_time);
        self.in_service = Some((customer, completes_at));
    }

    pub fn is_service_complete(&self, now: NaiveDateTime) -> bool {
        match &self.in_service {
            Some((_, completes_at)) => now >= *completes_at,
            None => false,
        }
    }

    pub fn finish_service(&mut self) -> Option<Customer> {
        self.in_service.take().map(|(customer, _)| customer)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CustomerRecord {
    pub customer_id: u64,
    pub ticket_type: String,
    pub arrival_time: NaiveDateTime,
    pub service_start: Option<NaiveDateTime>,
    pub service_end: Option<NaiveDateTime>,
    pub departure: Option<NaiveDateTime>,
    pub served: bool,
    pub left_unserved: bool,
}

impl CustomerRecord {
    pub fn wait_minutes(&self) -> Option<f64> {
        self.service_start
            .map(|start| minutes_between(start, self.arrival_time))
    }

    pub fn service_minutes(&self) -> Option<f64> {
        match (self.service_start, self.service_end) {
            (Some(start), Some(end)) => Some(minutes_between(end, start)),
            _ => None,
        }
    }

    pub fn total_minutes(&self) -> Option<f64> {
        self.departure
            .map(|departure| minutes_between(departure, self.arrival_time))
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SimulationRecord {
    pub opened_at: Option<NaiveDateTime>,
    pub closed_at: Option<NaiveDateTime>,
    pub entries: Vec<CustomerRecord>,
    #[serde(skip)]
    index: HashMap<u64, usize>,
}

impl SimulationRecord {
    pub fn new(opened_at: NaiveDateTime, closed_at: NaiveDateTime) -> Self {
        Self {
            opened_at: Some(opened_at),
            closed_at: Some(closed_at),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn record_arrival(&mut self, customer: &Customer) {
        debug_assert!(!self.index.contains_key(&customer.id));
        self.index.insert(customer.id, self.entries.len());
        self.entries.push(CustomerRecord {
            customer_id: customer.id,
            ticket_type: customer.ticket_type.clone(),
            arrival_time: customer.arrival_time,
            service_start: None,
            service_end: None,
            departure: None,
            served: false,
            left_unserved: false,
        });
    }

    pub fn record_service_start(&mut self, customer_id: u64, at: NaiveDateTime) {
        if let Some(entry) = self.entry_mut(customer_id) {
            debug_assert!(entry.service_start.is_none());
            entry.service_start = Some(at);
        }
    }

    pub fn record_service_completion(&mut self, customer_id: u64, at: NaiveDateTime) {
        if let Some(entry) = self.entry_mut(customer_id) {
            debug_assert!(!entry.served && !entry.left_unserved);
            entry.service_end = Some(at);
            entry.departure = Some(at);
            entry.served = true;
        }
    }

    pub fn record_left_at_closing(&mut self, customer_id: u64, at: NaiveDateTime) {
        if let Some(entry) = self.entry_mut(customer_id) {
            debug_assert!(!entry.served && !entry.left_unserved);
            entry.departure = Some(at);
            entry.left_unserved = true;
        }
    }

    pub fn summary(&self, bound_minutes: f64) -> DaySummary {
        let arrived = self.entries.len();
        let served = self.entries.iter().filter(|entry| entry.served).count();
        let left_unserved = self
            .entries
            .iter()
            .filter(|entry| entry.left_unserved)
            .count();

        let waits: Vec<f64> = self
            .entries
            .iter()
            .filter(|entry| entry.served)
            .filter_map(CustomerRecord::wait_minutes)
            .collect();
        let service_times: Vec<f64> = self
            .entries
            .iter()
            .filter(|entry| entry.served)
            .filter_map(CustomerRecord::service_minutes)
            .collect();
        let totals: Vec<f64> = self
            .entries
            .iter()
            .filter(|entry| entry.served)
            .filter_map(CustomerRecord::total_minutes)
            .collect();

        let over_bound = waits.iter().filter(|wait| **wait > bound_minutes).count();

        DaySummary {
            arrived,
            served,
            left_unserved,
            service_rate_pct: percentage(served, arrived),
            avg_wait_minutes: mean(&waits),
            max_wait_minutes: waits.iter().copied().fold(None, |max, wait| {
                Some(max.map_or(wait, |current: f64| current.max(wait)))
            }),
            avg_service_minutes: mean(&service_times),
            avg_total_minutes: mean(&totals),
            over_bound,
            over_bound_pct: percentage(over_bound, served),
        }
    }

    fn entry_mut(&mut self, customer_id: u64) -> Option<&mut CustomerRecord> {
        self.index
            .get(&customer_id)
            .copied()
            .map(|position| &mut self.entries[position])
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DaySummary {
    pub arrived: usize,
    pub served: usize,
    pub left_unserved: usize,
    pub service_rate_pct: f64,
    pub avg_wait_minutes: Option<f64>,
    pub max_wait_minutes: Option<f64>,
    pub avg_service_minutes: Option<f64>,
    pub avg_total_minutes: Option<f64>,
    pub over_bound: usize,
    pub over_bound_pct: f64,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 12)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn customer(id: u64, arrival_offset_minutes: i64, ticket_type: &str) -> Customer {
        Customer::new(
            id,
            base() + Duration::minutes(arrival_offset_minutes),
            ticket_type.to_string(),
        )
    }

    #[test]
    fn customer_equality_is_by_id() {
        let a = customer(1, 0, "P");
        let b = customer(1, 5, "NP");
        assert_eq!(a, b);
        assert_ne!(a, customer(2, 0, "P"));
    }

    #[test]
    fn window_lifecycle_idle_busy_idle() {
        let mut window = ServiceWindow::new(0);
        assert!(window.is_available());
        assert!(window.completion_time().is_none());

        let completes_at = base() + Duration::minutes(5);
        window.begin_service(customer(1, 0, "P"), completes_at);
        assert!(!window.is_available());
        assert_eq!(window.completion_time(), Some(completes_at));
        assert!(!window.is_service_complete(base() + Duration::minutes(4)));
        assert!(window.is_service_complete(completes_at));

        let finished = window.finish_service().unwrap();
        assert_eq!(finished.id, 1);
        assert!(window.is_available());
        assert!(window.finish_service().is_none());
    }

    #[test]
    fn record_partitions_served_and_left_unserved() {
        let closing = base() + Duration::hours(12);
        let mut record = SimulationRecord::new(base(), closing);
        for id in 0..3 {
            record.record_arrival(&customer(id, id as i64, "P"));
        }
        record.record_service_start(0, base() + Duration::minutes(5));
        record.record_service_completion(0, base() + Duration::minutes(10));
        record.record_service_start(1, base() + Duration::minutes(16));
        record.record_service_completion(1, base() + Duration::minutes(20));
        record.record_left_at_closing(2, closing);

        let summary = record.summary(10.0);
        assert_eq!(summary.arrived, 3);
        assert_eq!(summary.served, 2);
        assert_eq!(summary.left_unserved, 1);
        assert!((summary.service_rate_pct - 200.0 / 3.0).abs() < 1e-9);

        // waits are 5 and 15 minutes
        assert_eq!(summary.avg_wait_minutes, Some(10.0));
        assert_eq!(summary.max_wait_minutes, Some(15.0));
        assert_eq!(summary.over_bound, 1);
        assert_eq!(summary.over_bound_pct, 50.0);
    }

    #[test]
    fn summary_of_empty_record_has_no_wait_metrics() {
        let record = SimulationRecord::new(base(), base() + Duration::hours(12));
        let summary = record.summary(20.0);
        assert_eq!(summary.arrived, 0);
        assert_eq!(summary.service_rate_pct, 0.0);
        assert!(summary.avg_wait_minutes.is_none());
        assert!(summary.max_wait_minutes.is_none());
        assert_eq!(summary.over_bound_pct, 0.0);
    }

    #[test]
    fn wait_and_service_minutes_come_from_record_timestamps() {
        let mut record = SimulationRecord::new(base(), base() + Duration::hours(12));
        record.record_arrival(&customer(7, 0, "NP"));
        record.record_service_start(7, base() + Duration::minutes(12));
        record.record_service_completion(7, base() + Duration::minutes(18));

        let entry = &record.entries[0];
        assert_eq!(entry.wait_minutes(), Some(12.0));
        assert_eq!(entry.service_minutes(), Some(6.0));
        assert_eq!(entry.total_minutes(), Some(18.0));
    }
}
