mod common;
mod logic;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::{RulesFile, split_csv};
use hos_engine::{
    HosRules, LogSheetHeader, RandomFallback, TableEstimator, TripPlanner, TripRequest, TripResult,
    load_rules,
};
use logic::{ScenarioResult, ScenarioRunner, expand_scenario_keys, find_catalog_scenario, list_scenarios};

const DEFAULT_SCENARIO_SEED: u64 = 1337;

#[derive(Debug, Parser)]
#[command(name = "hos-planner", version)]
#[command(
    about = "Plan truck trips under Hours-of-Service rules and verify the engine against a scenario catalog"
)]
struct Args {
    /// Current location of the driver
    #[arg(long)]
    origin: Option<String>,

    /// Pickup location
    #[arg(long)]
    pickup: Option<String>,

    /// Dropoff location
    #[arg(long)]
    dropoff: Option<String>,

    /// Hours already used in the current 70-hour cycle
    #[arg(long, default_value_t = 0.0)]
    cycle_used: f64,

    /// Take a sleeper-berth period when the daily counters run high
    #[arg(long)]
    sleeper_berth: bool,

    /// Drive the delivery leg without fuel stops
    #[arg(long)]
    no_fuel_stops: bool,

    /// First trip day (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Seed for the distance fallback (plan mode) or the first iteration (scenario mode)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with HOS rule overrides
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Driver name printed on the log sheets
    #[arg(long)]
    driver: Option<String>,

    /// Carrier name printed on the log sheets
    #[arg(long)]
    carrier: Option<String>,

    /// Vehicle number printed on the log sheets
    #[arg(long)]
    vehicle: Option<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown", "api"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Catalog scenarios to run (comma-separated, or `all`)
    #[arg(long)]
    scenarios: Option<String>,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Number of iterations per scenario
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let rules = load_rules(&RulesFile::new(args.rules.clone())).context("loading HOS rules")?;
    let start_date = args.date.unwrap_or_else(|| Local::now().date_naive());

    if let Some(tokens) = args.scenarios.as_deref() {
        let results = run_scenarios(&args, tokens, &rules, start_date)?;
        if results.iter().any(|r| !r.passed) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let result = plan_trip(&args, rules, start_date)?;
    let mut output_target = OutputTarget::new(args.output.clone())?;
    write_trip_report(&args.report, &mut output_target, &result)?;
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🚚 HOS Trip Planner".bright_cyan().bold());
    println!("{}", "===================".cyan());
}

fn build_request(args: &Args) -> Result<TripRequest> {
    let (Some(origin), Some(pickup), Some(dropoff)) = (
        args.origin.as_deref(),
        args.pickup.as_deref(),
        args.dropoff.as_deref(),
    ) else {
        bail!("plan mode needs --origin, --pickup and --dropoff (or use --scenarios)");
    };
    Ok(TripRequest::new(origin, pickup, dropoff, args.cycle_used)
        .with_sleeper_berth(args.sleeper_berth)
        .with_fuel_stops(!args.no_fuel_stops))
}

fn build_header(args: &Args) -> LogSheetHeader {
    let defaults = LogSheetHeader::default();
    LogSheetHeader {
        driver_name: args.driver.clone().unwrap_or(defaults.driver_name),
        carrier_name: args.carrier.clone().unwrap_or(defaults.carrier_name),
        vehicle_number: args.vehicle.clone().unwrap_or(defaults.vehicle_number),
    }
}

fn plan_trip(args: &Args, rules: HosRules, start_date: NaiveDate) -> Result<TripResult> {
    let request = build_request(args)?;
    let fallback = args
        .seed
        .map_or_else(RandomFallback::from_entropy, RandomFallback::seeded);
    let mut planner = TripPlanner::new(TableEstimator::with_fallback(fallback))
        .with_rules(rules)
        .context("applying HOS rules")?
        .with_header(build_header(args));
    planner
        .plan(&request, start_date)
        .with_context(|| format!("planning {}", request.route_label()))
}

fn write_trip_report<W: Write + ?Sized>(report: &str, out: &mut W, result: &TripResult) -> Result<()> {
    match report {
        "json" => logic::trip_report::write_json(out, result),
        "markdown" => logic::trip_report::write_markdown(out, result),
        "api" => logic::trip_report::write_api(out, result),
        _ => logic::trip_report::write_console(out, result),
    }
}

fn run_scenarios(
    args: &Args,
    tokens: &str,
    rules: &HosRules,
    start_date: NaiveDate,
) -> Result<Vec<ScenarioResult>> {
    let keys = expand_scenario_keys(&split_csv(tokens));
    if keys.is_empty() {
        bail!("--scenarios needs at least one scenario key (see --list-scenarios)");
    }
    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let runner = ScenarioRunner::new(rules.clone(), start_date, args.verbose);
    let base_seed = args.seed.unwrap_or(DEFAULT_SCENARIO_SEED);
    let mut results = Vec::new();
    for key in &keys {
        match find_catalog_scenario(key) {
            Some(scenario) => results.push(runner.run_scenario(&scenario, base_seed, args.iterations)),
            None => eprintln!("⚠️  Unknown scenario: {}", key.yellow()),
        }
    }
    if results.is_empty() {
        bail!("no known scenarios in {tokens:?} (see --list-scenarios)");
    }

    write_scenario_reports(args, &results, start_time)?;
    Ok(results)
}

fn write_scenario_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" | "api" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, results)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                results,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
