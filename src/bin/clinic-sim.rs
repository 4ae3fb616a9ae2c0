use clinic_sim::arrivals::build_arrivals;
use clinic_sim::cli::{self, Command, DayArgs, FormatArg};
use clinic_sim::engine::ClinicSimulator;
use clinic_sim::error::Result;
use clinic_sim::output::{Formatter, HumanFormatter, JsonFormatter, SummaryFormatter};
use clinic_sim::trace::{NoopObserver, QueueObserver, StderrObserver};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args()?;
    match args.command {
        Command::Run(day_args) => run_day(&day_args),
        Command::ShowConfig(day_args) => show_config(&day_args),
    }
}

fn run_day(args: &DayArgs) -> Result<()> {
    let (config, date, options) = cli::build_config(args)?;
    let arrivals = build_arrivals(
        &config.arrivals,
        date,
        config.opening_hour,
        config.closing_hour,
        config.seed,
    )?;
    let mut simulator = ClinicSimulator::new(config)?;

    let mut observer: Box<dyn QueueObserver> = if options.trace {
        Box::new(StderrObserver)
    } else {
        Box::new(NoopObserver)
    };
    let record = simulator.simulate_day(arrivals, date, observer.as_mut())?;

    let formatter = formatter_for(&options.format);
    print!("{}", formatter.write(&record, options.wait_bound));

    Ok(())
}

fn show_config(args: &DayArgs) -> Result<()> {
    let (config, _, _) = cli::build_config(args)?;
    print!("{}", cli::describe_config(&config));
    Ok(())
}

fn formatter_for(format: &FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
