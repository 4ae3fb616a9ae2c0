use crate::state::{CustomerRecord, DaySummary, SimulationRecord};

pub trait Formatter {
    fn write(&self, record: &SimulationRecord, bound_minutes: f64) -> String;
}

pub struct SummaryFormatter;

pub struct HumanFormatter;

pub struct JsonFormatter;

impl Formatter for SummaryFormatter {
    fn write(&self, record: &SimulationRecord, bound_minutes: f64) -> String {
        let mut out = metadata_block(record);
        out.push_str(&summary_block(&record.summary(bound_minutes), bound_minutes));
        out
    }
}

impl Formatter for HumanFormatter {
    fn write(&self, record: &SimulationRecord, bound_minutes: f64) -> String {
        let mut out = metadata_block(record);
        out.push_str("Timeline:\n");
        for entry in &record.entries {
            out.push_str(&timeline_line(entry));
        }
        out.push_str(&summary_block(&record.summary(bound_minutes), bound_minutes));
        out
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, record: &SimulationRecord, bound_minutes: f64) -> String {
        let value = serde_json::json!({
            "opened_at": record.opened_at,
            "closed_at": record.closed_at,
            "summary": record.summary(bound_minutes),
            "customers": record.entries,
        });
        let mut out =
            serde_json::to_string_pretty(&value).unwrap_or_else(|err| format!("{{\"error\": \"{}\"}}", err));
        out.push('\n');
        out
    }
}

fn metadata_block(record: &SimulationRecord) -> String {
    let mut out = String::from("Metadata:\n");
    match (record.opened_at, record.closed_at) {
        (Some(opened), Some(closed)) => {
            out.push_str(&format!("date: {}\n", opened.format("%Y-%m-%d")));
            out.push_str(&format!(
                "hours: {}-{}\n",
                opened.format("%H:%M"),
                closed.format("%H:%M")
            ));
        }
        _ => out.push_str("date: n/a\n"),
    }
    out
}

fn summary_block(summary: &DaySummary, bound_minutes: f64) -> String {
    let mut out = String::from("Summary:\n");
    out.push_str(&format!("arrived: {}\n", summary.arrived));
    out.push_str(&format!("served: {}\n", summary.served));
    out.push_str(&format!("left unserved: {}\n", summary.left_unserved));
    out.push_str(&format!("service rate: {:.1}%\n", summary.service_rate_pct));
    out.push_str(&format!("avg wait: {}\n", minutes_or_na(summary.avg_wait_minutes)));
    out.push_str(&format!("max wait: {}\n", minutes_or_na(summary.max_wait_minutes)));
    out.push_str(&format!(
        "waits over {} min: {} ({:.1}%)\n",
        bound_minutes, summary.over_bound, summary.over_bound_pct
    ));
    out
}

fn timeline_line(entry: &CustomerRecord) -> String {
    let prefix = format!(
        "customer {} ({}) arrived {}",
        entry.customer_id,
        entry.ticket_type,
        entry.arrival_time.format("%H:%M")
    );
    match (entry.served, entry.left_unserved) {
        (true, _) => {
            let start = entry
                .service_start
                .map(|at| at.format("%H:%M").to_string())
                .unwrap_or_else(|| "?".to_string());
            let end = entry
                .service_end
                .map(|at| at.format("%H:%M").to_string())
                .unwrap_or_else(|| "?".to_string());
            format!("{} served {}-{}\n", prefix, start, end)
        }
        (false, true) => {
            let at = entry
                .departure
                .map(|at| at.format("%H:%M").to_string())
                .unwrap_or_else(|| "?".to_string());
            format!("{} left unserved at {}\n", prefix, at)
        }
        (false, false) => {
            if entry.service_start.is_some() {
                format!("{} still in service\n", prefix)
            } else {
                format!("{} still waiting\n", prefix)
            }
        }
    }
}

fn minutes_or_na(minutes: Option<f64>) -> String {
    match minutes {
        Some(minutes) => format!("{:.2} min", minutes),
        None => "n/a".to_string(),
    }
}
