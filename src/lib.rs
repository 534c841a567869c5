pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::cache::QuoteCache;
use crate::core::config::AppConfig;
use crate::core::price::PriceQuote;
use crate::core::report::ReportStyle;
use crate::core::resolver::PriceResolver;
use crate::core::sip::{self, ContributionSchedule};
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

/// Price to value the holding at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentPrice {
    Fixed(f64),
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculateArgs {
    pub monthly_amount: f64,
    pub months: u32,
    pub average_price: f64,
    pub current_price: CurrentPrice,
    pub start_date: Option<NaiveDate>,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityArgs {
    pub monthly_amount: f64,
    pub months: u32,
    pub average_price: f64,
    pub current_price: CurrentPrice,
    /// Price changes in percent; defaults to -20% through +20% in 5% steps.
    pub offsets: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownArgs {
    pub monthly_amount: f64,
    pub months: u32,
    pub current_price: f64,
    pub prices: Vec<f64>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactArgs {
    pub monthly_amount: f64,
    pub months: u32,
    pub average_price: f64,
    pub current_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetArgs {
    pub monthly_amount: f64,
    pub months: u32,
    pub current_price: CurrentPrice,
    /// Desired compound annual growth rate, in percent.
    pub target_cagr: f64,
}

pub enum AppCommand {
    Calculate(CalculateArgs),
    Price,
    Sensitivity(SensitivityArgs),
    Breakdown(BreakdownArgs),
    Impact(ImpactArgs),
    Target(TargetArgs),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Gold SIP calculator starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let style = ReportStyle {
        currency_symbol: config.currency_symbol.clone(),
    };

    match command {
        AppCommand::Calculate(args) => {
            let schedule = ContributionSchedule::new(args.monthly_amount, args.months)
                .with_start_date(args.start_date);
            let (current_price, quote) = resolve_current_price(args.current_price, &config).await?;
            let result = sip::calculate(&schedule, args.average_price, current_price)?;
            cli::calculate::run(&result, quote.as_ref(), &style, args.json)
        }
        AppCommand::Price => {
            let resolver = build_resolver(&config)?;
            cli::price::run(&resolver, &style).await
        }
        AppCommand::Sensitivity(args) => {
            let schedule = ContributionSchedule::new(args.monthly_amount, args.months);
            let offsets: Vec<f64> = match args.offsets {
                Some(percents) => percents.iter().map(|p| p / 100.0).collect(),
                None => sip::DEFAULT_SENSITIVITY_OFFSETS.to_vec(),
            };
            let (current_price, quote) = resolve_current_price(args.current_price, &config).await?;
            let points = sip::sensitivity(&schedule, args.average_price, current_price, &offsets)?;
            cli::sensitivity::run(&points, &style)?;
            print_price_notice(quote.as_ref());
            Ok(())
        }
        AppCommand::Breakdown(args) => {
            let schedule = ContributionSchedule::new(args.monthly_amount, args.months)
                .with_start_date(args.start_date);
            let rows = sip::purchase_breakdown(&schedule, &args.prices, args.current_price)?;
            cli::breakdown::run(&rows, args.current_price, &style)
        }
        AppCommand::Impact(args) => {
            let schedule = ContributionSchedule::new(args.monthly_amount, args.months);
            let scenarios = sip::amount_impact(
                &schedule,
                args.average_price,
                args.current_price,
                &sip::DEFAULT_AMOUNT_MULTIPLIERS,
            )?;
            cli::impact::run(&scenarios, &style)
        }
        AppCommand::Target(args) => {
            let schedule = ContributionSchedule::new(args.monthly_amount, args.months);
            let (current_price, quote) = resolve_current_price(args.current_price, &config).await?;
            let required =
                sip::required_average_price(&schedule, current_price, args.target_cagr)?;
            cli::target::run(&schedule, current_price, args.target_cagr, required, &style)?;
            print_price_notice(quote.as_ref());
            Ok(())
        }
    }
}

/// Wires configured providers, the quote store and the cache into a resolver.
pub fn build_resolver(config: &AppConfig) -> Result<PriceResolver> {
    if !(config.mock_price.is_finite() && config.mock_price > 0.0) {
        anyhow::bail!(
            "mock_price must be a positive number, got {}",
            config.mock_price
        );
    }
    if !(config.usd_inr_rate.is_finite() && config.usd_inr_rate > 0.0) {
        anyhow::bail!(
            "usd_inr_rate must be a positive number, got {}",
            config.usd_inr_rate
        );
    }

    let providers = providers::build_providers(&config.providers, config.usd_inr_rate);
    let cache = QuoteCache::new(store::open_quote_store(config), config.cache_ttl());
    Ok(PriceResolver::new(
        providers,
        cache,
        config.mock_price,
        config.request_timeout(),
    ))
}

async fn resolve_current_price(
    choice: CurrentPrice,
    config: &AppConfig,
) -> Result<(f64, Option<PriceQuote>)> {
    match choice {
        CurrentPrice::Fixed(price) => Ok((price, None)),
        CurrentPrice::Live => {
            let resolver = build_resolver(config)?;
            let quote = cli::ui::with_spinner(
                "Fetching live gold price...",
                resolver.get_price(resolver.default_timeout()),
            )
            .await;
            info!("Using {} price {}", quote.source, quote.price);
            Ok((quote.price, Some(quote)))
        }
    }
}

fn print_price_notice(quote: Option<&PriceQuote>) {
    if let Some(notice) = quote.and_then(crate::core::report::price_notice) {
        println!(
            "\n{}",
            cli::ui::style_text(&notice, cli::ui::StyleType::Warning)
        );
    }
}
