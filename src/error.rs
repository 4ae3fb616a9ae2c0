use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("window count must be greater than 0")]
    NoServiceWindows,
    #[error("unknown ticket type '{0}'")]
    UnknownTicketType(String),
    #[error("service time table must not be empty")]
    EmptyServiceTimes,
    #[error("duplicate ticket type '{0}'")]
    DuplicateTicketType(String),
    #[error("service time for '{0}' must be > 0 minutes")]
    InvalidServiceTime(String),
    #[error("{0} threshold must be > 0 minutes")]
    InvalidThreshold(&'static str),
    #[error("skip ceiling must be > 0")]
    InvalidSkipCeiling,
    #[error("optimization interval must be > 0 minutes")]
    InvalidOptimizationInterval,
    #[error("grace period must be >= 0 minutes")]
    InvalidGracePeriod,
    #[error("operating hours {opening}:00-{closing}:00 are invalid")]
    InvalidOperatingHours { opening: u32, closing: u32 },
    #[error("arrival rate must be >= 0 (got {0})")]
    InvalidArrivalRate(f64),
    #[error("invalid arrival entry '{0}': expected minutes:ticket_type")]
    InvalidArrivalSpec(String),
    #[error("invalid service time entry '{0}': expected ticket_type:minutes")]
    InvalidServiceTimeSpec(String),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
