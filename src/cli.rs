use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::load_config;
use crate::error::{Error, Result};
use crate::models::{ArrivalPlan, ArrivalSpec, ServiceTimeEntry, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "clinic-sim", about = "Clinic queue simulator with priority aging")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate one operating day and print the results
    Run(DayArgs),
    /// Print the effective configuration without simulating
    ShowConfig(DayArgs),
}

#[derive(clap::Args, Debug)]
pub struct DayArgs {
    #[arg(long, help = "TOML or JSON config file; flags override its values")]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub windows: Option<usize>,
    #[arg(long, help = "Opening hour, 24h clock")]
    pub open: Option<u32>,
    #[arg(long, help = "Closing hour, 24h clock")]
    pub close: Option<u32>,
    #[arg(long = "service-time", help = "ticket_type:minutes; repeatable")]
    pub service_times: Vec<String>,
    #[arg(long = "arrive", help = "minutes_after_opening:ticket_type; repeatable")]
    pub arrivals: Vec<String>,
    #[arg(long = "priority", help = "Ticket type treated as priority; repeatable")]
    pub priority: Vec<String>,
    #[arg(long = "p-threshold", help = "Target wait for priority customers, minutes")]
    pub p_threshold: Option<f64>,
    #[arg(
        long = "np-threshold",
        help = "Wait a skipped non-priority customer may be pushed to, minutes"
    )]
    pub np_threshold: Option<f64>,
    #[arg(long, help = "Minutes between optimizer invocations")]
    pub interval: Option<f64>,
    #[arg(long = "max-forced-skips")]
    pub max_forced_skips: Option<u32>,
    #[arg(long = "skip-ceiling")]
    pub skip_ceiling: Option<u32>,
    #[arg(long, help = "Minutes the clinic keeps serving after closing")]
    pub grace: Option<f64>,
    #[arg(long, help = "Seed for generated arrivals; omit for a fixed default")]
    pub seed: Option<u64>,
    #[arg(long, default_value = "2025-05-12")]
    pub date: String,
    #[arg(long, value_enum, default_value = "human")]
    pub format: FormatArg,
    #[arg(long, help = "Trace optimizer passes on stderr")]
    pub trace: bool,
    #[arg(long = "wait-bound", default_value_t = 20.0)]
    pub wait_bound: f64,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum FormatArg {
    Human,
    Summary,
    Json,
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub format: FormatArg,
    pub trace: bool,
    pub wait_bound: f64,
}

pub fn parse_args() -> Result<Args> {
    Args::try_parse().map_err(|e| Error::Cli(e.to_string()))
}

pub fn build_config(args: &DayArgs) -> Result<(SimConfig, NaiveDate, RunOptions)> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => flag_defaults(),
    };

    if let Some(windows) = args.windows {
        config.windows = windows;
    }
    if let Some(open) = args.open {
        config.opening_hour = open;
    }
    if let Some(close) = args.close {
        config.closing_hour = close;
    }
    if !args.service_times.is_empty() {
        config.service_times = args
            .service_times
            .iter()
            .map(|spec| parse_service_time_spec(spec))
            .collect::<Result<Vec<_>>>()?;
    }
    if !args.arrivals.is_empty() {
        config.arrivals = ArrivalPlan::Listed {
            entries: args
                .arrivals
                .iter()
                .map(|spec| parse_arrival_spec(spec))
                .collect::<Result<Vec<_>>>()?,
        };
    }
    if !args.priority.is_empty() {
        config.priority_tickets = args.priority.clone();
    }
    if let Some(p_threshold) = args.p_threshold {
        config.priority_threshold_minutes = p_threshold;
    }
    if let Some(np_threshold) = args.np_threshold {
        config.non_priority_threshold_minutes = np_threshold;
    }
    if let Some(interval) = args.interval {
        config.optimization_interval_minutes = interval;
    }
    if let Some(max_forced_skips) = args.max_forced_skips {
        config.max_forced_skips = max_forced_skips;
    }
    if let Some(skip_ceiling) = args.skip_ceiling {
        config.skip_ceiling = skip_ceiling;
    }
    if let Some(grace) = args.grace {
        config.grace_minutes = grace;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .map_err(|err| Error::Cli(format!("invalid date '{}': {}", args.date, err)))?;

    let options = RunOptions {
        format: args.format.clone(),
        trace: args.trace,
        wait_bound: args.wait_bound,
    };

    Ok((config, date, options))
}

pub fn parse_service_time_spec(input: &str) -> Result<ServiceTimeEntry> {
    let (ticket_type, minutes) = input
        .split_once(':')
        .ok_or_else(|| Error::InvalidServiceTimeSpec(input.to_string()))?;
    let ticket_type = ticket_type.trim();
    let minutes: f64 = minutes
        .trim()
        .parse()
        .map_err(|_| Error::InvalidServiceTimeSpec(input.to_string()))?;
    if ticket_type.is_empty() {
        return Err(Error::InvalidServiceTimeSpec(input.to_string()));
    }
    Ok(ServiceTimeEntry {
        ticket_type: ticket_type.to_string(),
        minutes,
    })
}

pub fn parse_arrival_spec(input: &str) -> Result<ArrivalSpec> {
    let (minutes, ticket_type) = input
        .split_once(':')
        .ok_or_else(|| Error::InvalidArrivalSpec(input.to_string()))?;
    let minutes_after_opening: f64 = minutes
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArrivalSpec(input.to_string()))?;
    let ticket_type = ticket_type.trim();
    if ticket_type.is_empty() {
        return Err(Error::InvalidArrivalSpec(input.to_string()));
    }
    Ok(ArrivalSpec {
        minutes_after_opening,
        ticket_type: ticket_type.to_string(),
    })
}

pub fn describe_config(config: &SimConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("Windows: {}\n", config.windows));
    out.push_str(&format!(
        "Hours: {:02}:00-{:02}:00\n",
        config.opening_hour, config.closing_hour
    ));
    let priority = if config.priority_tickets.is_empty() {
        "none".to_string()
    } else {
        config.priority_tickets.join(", ")
    };
    out.push_str(&format!("Priority tickets: {}\n", priority));
    out.push_str(&format!(
        "Priority threshold: {} min\n",
        config.priority_threshold_minutes
    ));
    out.push_str(&format!(
        "Non-priority threshold: {} min\n",
        config.non_priority_threshold_minutes
    ));
    out.push_str(&format!(
        "Optimization interval: {} min\n",
        config.optimization_interval_minutes
    ));
    out.push_str(&format!("Forced skips per pass: {}\n", config.max_forced_skips));
    out.push_str(&format!("Skip ceiling: {}\n", config.skip_ceiling));
    out.push_str(&format!("Grace period: {} min\n", config.grace_minutes));
    out.push_str("Service times:\n");
    for entry in &config.service_times {
        out.push_str(&format!("- {}: {} min\n", entry.ticket_type, entry.minutes));
    }
    match &config.arrivals {
        ArrivalPlan::Listed { entries } => {
            out.push_str(&format!("Arrivals: {} listed\n", entries.len()));
        }
        ArrivalPlan::Poisson { rates } => {
            out.push_str(&format!("Arrivals: poisson ({} rate rows)\n", rates.len()));
        }
    }
    out
}

fn flag_defaults() -> SimConfig {
    SimConfig {
        windows: 3,
        opening_hour: 6,
        closing_hour: 18,
        service_times: Vec::new(),
        priority_tickets: Vec::new(),
        priority_threshold_minutes: 10.0,
        non_priority_threshold_minutes: 20.0,
        optimization_interval_minutes: 10.0,
        max_forced_skips: 1,
        skip_ceiling: 3,
        grace_minutes: 60.0,
        arrivals: ArrivalPlan::Listed {
            entries: Vec::new(),
        },
        seed: None,
    }
}
