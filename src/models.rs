use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimConfig {
    #[serde(default = "default_windows")]
    pub windows: usize,
    #[serde(default = "default_opening_hour")]
    pub opening_hour: u32,
    #[serde(default = "default_closing_hour")]
    pub closing_hour: u32,
    pub service_times: Vec<ServiceTimeEntry>,
    #[serde(default)]
    pub priority_tickets: Vec<String>,
    #[serde(default = "default_priority_threshold")]
    pub priority_threshold_minutes: f64,
    #[serde(default = "default_non_priority_threshold")]
    pub non_priority_threshold_minutes: f64,
    #[serde(default = "default_optimization_interval")]
    pub optimization_interval_minutes: f64,
    #[serde(default = "default_max_forced_skips")]
    pub max_forced_skips: u32,
    #[serde(default = "default_skip_ceiling")]
    pub skip_ceiling: u32,
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: f64,
    #[serde(default = "default_arrivals")]
    pub arrivals: ArrivalPlan,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServiceTimeEntry {
    pub ticket_type: String,
    pub minutes: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArrivalPlan {
    Listed { entries: Vec<ArrivalSpec> },
    Poisson { rates: Vec<RateRow> },
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ArrivalSpec {
    pub minutes_after_opening: f64,
    pub ticket_type: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RateRow {
    pub ticket_type: String,
    pub weekday: String,
    pub hour: u32,
    pub per_hour: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ServiceTimeTable {
    minutes_by_ticket: HashMap<String, f64>,
}

impl ServiceTimeTable {
    pub fn new(entries: &[ServiceTimeEntry]) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyServiceTimes);
        }
        let mut minutes_by_ticket = HashMap::new();
        for entry in entries {
            if entry.minutes <= 0.0 {
                return Err(Error::InvalidServiceTime(entry.ticket_type.clone()));
            }
            if minutes_by_ticket
                .insert(entry.ticket_type.clone(), entry.minutes)
                .is_some()
            {
                return Err(Error::DuplicateTicketType(entry.ticket_type.clone()));
            }
        }
        Ok(Self { minutes_by_ticket })
    }

    pub fn lookup(&self, ticket_type: &str) -> Result<f64> {
        self.minutes_by_ticket
            .get(ticket_type)
            .copied()
            .ok_or_else(|| Error::UnknownTicketType(ticket_type.to_string()))
    }
}

fn default_windows() -> usize {
    3
}

fn default_opening_hour() -> u32 {
    6
}

fn default_closing_hour() -> u32 {
    18
}

fn default_priority_threshold() -> f64 {
    10.0
}

fn default_non_priority_threshold() -> f64 {
    20.0
}

fn default_optimization_interval() -> f64 {
    10.0
}

fn default_max_forced_skips() -> u32 {
    1
}

fn default_skip_ceiling() -> u32 {
    3
}

fn default_grace_minutes() -> f64 {
    60.0
}

fn default_arrivals() -> ArrivalPlan {
    ArrivalPlan::Listed {
        entries: Vec::new(),
    }
}
