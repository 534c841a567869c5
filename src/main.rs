use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use gold_sip::cli::setup::setup;
use gold_sip::core::log::init_logging;
use chrono::NaiveDate;
use gold_sip::CurrentPrice;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Inputs shared by every calculation.
#[derive(Args)]
struct PlanArgs {
    /// Amount invested every month
    #[arg(long)]
    monthly_amount: f64,

    /// Number of monthly contributions
    #[arg(long)]
    months: u32,
}

/// How to pick the valuation price.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ValuationArgs {
    /// Current gold price per gram
    #[arg(long)]
    current_price: Option<f64>,

    /// Fetch the current price from the configured providers
    #[arg(long)]
    live: bool,
}

impl From<ValuationArgs> for CurrentPrice {
    fn from(args: ValuationArgs) -> CurrentPrice {
        match (args.live, args.current_price) {
            (false, Some(price)) => CurrentPrice::Fixed(price),
            _ => CurrentPrice::Live,
        }
    }
}

impl From<Commands> for gold_sip::AppCommand {
    fn from(cmd: Commands) -> gold_sip::AppCommand {
        match cmd {
            Commands::Calculate {
                plan,
                average_price,
                valuation,
                start_date,
                json,
            } => gold_sip::AppCommand::Calculate(gold_sip::CalculateArgs {
                monthly_amount: plan.monthly_amount,
                months: plan.months,
                average_price,
                current_price: valuation.into(),
                start_date,
                json,
            }),
            Commands::Price => gold_sip::AppCommand::Price,
            Commands::Sensitivity {
                plan,
                average_price,
                valuation,
                offsets,
            } => gold_sip::AppCommand::Sensitivity(gold_sip::SensitivityArgs {
                monthly_amount: plan.monthly_amount,
                months: plan.months,
                average_price,
                current_price: valuation.into(),
                offsets,
            }),
            Commands::Breakdown {
                plan,
                current_price,
                prices,
                start_date,
            } => gold_sip::AppCommand::Breakdown(gold_sip::BreakdownArgs {
                monthly_amount: plan.monthly_amount,
                months: plan.months,
                current_price,
                prices,
                start_date,
            }),
            Commands::Impact {
                plan,
                average_price,
                current_price,
            } => gold_sip::AppCommand::Impact(gold_sip::ImpactArgs {
                monthly_amount: plan.monthly_amount,
                months: plan.months,
                average_price,
                current_price,
            }),
            Commands::Target {
                plan,
                valuation,
                cagr,
            } => gold_sip::AppCommand::Target(gold_sip::TargetArgs {
                monthly_amount: plan.monthly_amount,
                months: plan.months,
                current_price: valuation.into(),
                target_cagr: cagr,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Calculate returns for a gold SIP
    Calculate {
        #[command(flatten)]
        plan: PlanArgs,
        /// Average gold price per gram paid over the plan
        #[arg(long)]
        average_price: f64,
        #[command(flatten)]
        valuation: ValuationArgs,
        /// Date of the first contribution, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Print metrics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display the live gold price and which providers answered
    Price,
    /// Show returns across a range of current prices
    Sensitivity {
        #[command(flatten)]
        plan: PlanArgs,
        /// Average gold price per gram paid over the plan
        #[arg(long)]
        average_price: f64,
        #[command(flatten)]
        valuation: ValuationArgs,
        /// Price changes in percent, e.g. -20,-10,0,10,20
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        offsets: Option<Vec<f64>>,
    },
    /// Month by month purchases at varying prices
    Breakdown {
        #[command(flatten)]
        plan: PlanArgs,
        /// Gold price per gram to value the holding at
        #[arg(long)]
        current_price: f64,
        /// Monthly gold prices per gram, the last one repeats
        #[arg(long, value_delimiter = ',', required = true)]
        prices: Vec<f64>,
        /// Date of the first contribution, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    /// Compare outcomes for different monthly amounts
    Impact {
        #[command(flatten)]
        plan: PlanArgs,
        /// Average gold price per gram paid over the plan
        #[arg(long)]
        average_price: f64,
        /// Gold price per gram to value the holding at
        #[arg(long)]
        current_price: f64,
    },
    /// Average purchase price needed to reach a target CAGR
    Target {
        #[command(flatten)]
        plan: PlanArgs,
        #[command(flatten)]
        valuation: ValuationArgs,
        /// Target compound annual growth rate in percent
        #[arg(long, allow_hyphen_values = true)]
        cagr: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => gold_sip::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
