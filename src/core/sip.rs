//! Return calculations for a gold systematic investment plan (SIP).
//!
//! Units are purchased at a single averaged price across the whole schedule
//! rather than month by month at varying prices. This is a modeling choice:
//! callers supply the historical average they paid and the price to value the
//! holding at. [`purchase_breakdown`] is available when a per-month price
//! series is known.
use crate::core::error::{SipError, ensure_positive};
use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

pub const DEFAULT_SENSITIVITY_OFFSETS: [f64; 9] =
    [-0.20, -0.15, -0.10, -0.05, 0.0, 0.05, 0.10, 0.15, 0.20];
pub const DEFAULT_AMOUNT_MULTIPLIERS: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Calendar length of one plan month when dating contributions.
pub const DAYS_PER_MONTH: u64 = 30;

/// Annual growth factors beyond this are reported as a calculation error.
const MAX_ANNUAL_GROWTH: f64 = 1e18;

/// Growth factors the decimal power handles without losing precision.
/// Ratios outside it are annualized in `f64`.
const DECIMAL_GROWTH_RANGE: RangeInclusive<f64> = 1e-9..=1e18;

/// A fixed monthly contribution over a number of months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionSchedule {
    pub monthly_amount: f64,
    pub duration_months: u32,
    /// Date of the first contribution, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl ContributionSchedule {
    pub fn new(monthly_amount: f64, duration_months: u32) -> Self {
        Self {
            monthly_amount,
            duration_months,
            start_date: None,
        }
    }

    pub fn with_start_date(mut self, start_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self
    }

    /// Date of the contribution in month `month_index`, counting from 1.
    pub fn month_date(&self, month_index: u32) -> Option<NaiveDate> {
        let offset = u64::from(month_index.saturating_sub(1)) * DAYS_PER_MONTH;
        self.start_date?.checked_add_days(Days::new(offset))
    }

    /// Date the plan completes, `duration_months` plan months after the start.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let offset = u64::from(self.duration_months) * DAYS_PER_MONTH;
        self.start_date?.checked_add_days(Days::new(offset))
    }

    fn validate(&self) -> Result<(), SipError> {
        ensure_positive("monthly_amount", self.monthly_amount)?;
        if self.duration_months == 0 {
            return Err(SipError::invalid("duration_months", 0.0));
        }
        if let Some(start) = self.start_date
            && self.end_date().is_none()
        {
            return Err(SipError::Calculation(format!(
                "plan starting {start} ends beyond the supported calendar"
            )));
        }
        Ok(())
    }
}

/// Computed metrics for a schedule valued at a given price. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct SipResult {
    pub schedule: ContributionSchedule,
    pub average_price: f64,
    pub current_price: f64,
    pub total_investment: f64,
    pub total_units: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
    /// Compound annual growth rate, in percent.
    pub cagr: f64,
    pub duration_years: f64,
}

impl SipResult {
    /// Month by month snapshots. Every call starts a fresh iteration.
    pub fn monthly_breakdown(&self) -> MonthlyBreakdown {
        MonthlyBreakdown {
            schedule: self.schedule,
            monthly_amount: self.schedule.monthly_amount,
            units_per_month: self.schedule.monthly_amount / self.average_price,
            current_price: self.current_price,
            next_month: 1,
            last_month: self.schedule.duration_months,
        }
    }

    pub fn is_profit(&self) -> bool {
        self.profit_loss > 0.0
    }

    pub fn metrics(&self) -> SipMetrics {
        SipMetrics {
            total_investment: self.total_investment,
            total_units: self.total_units,
            current_value: self.current_value,
            profit_loss: self.profit_loss,
            profit_loss_percentage: self.profit_loss_percentage,
            cagr: self.cagr,
            duration_years: self.duration_years,
            start_date: self.schedule.start_date,
            end_date: self.schedule.end_date(),
            monthly_breakdown: self.monthly_breakdown().collect(),
        }
    }
}

/// Serializable view of a [`SipResult`], breakdown included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SipMetrics {
    pub total_investment: f64,
    pub total_units: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
    pub cagr: f64,
    pub duration_years: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub monthly_breakdown: Vec<MonthlySnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySnapshot {
    pub month_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_date: Option<NaiveDate>,
    pub cumulative_investment: f64,
    pub cumulative_units: f64,
    pub value_at_current_price: f64,
}

/// Lazy sequence of [`MonthlySnapshot`]s, valued at the final current price.
#[derive(Debug, Clone)]
pub struct MonthlyBreakdown {
    schedule: ContributionSchedule,
    monthly_amount: f64,
    units_per_month: f64,
    current_price: f64,
    next_month: u32,
    last_month: u32,
}

impl Iterator for MonthlyBreakdown {
    type Item = MonthlySnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_month > self.last_month {
            return None;
        }
        let month = self.next_month;
        self.next_month += 1;

        // Multiply rather than accumulate so the last row matches the total exactly.
        let cumulative_units = self.units_per_month * f64::from(month);
        Some(MonthlySnapshot {
            month_index: month,
            month_date: self.schedule.month_date(month),
            cumulative_investment: self.monthly_amount * f64::from(month),
            cumulative_units,
            value_at_current_price: cumulative_units * self.current_price,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last_month as usize + 1).saturating_sub(self.next_month as usize);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthlyBreakdown {}

/// Calculates investment metrics for a schedule bought at `average_price`
/// and valued at `current_price`.
pub fn calculate(
    schedule: &ContributionSchedule,
    average_price: f64,
    current_price: f64,
) -> Result<SipResult, SipError> {
    schedule.validate()?;
    ensure_positive("average_price", average_price)?;
    ensure_positive("current_price", current_price)?;

    let total_investment = schedule.monthly_amount * f64::from(schedule.duration_months);
    let total_units = total_investment / average_price;
    let current_value = total_units * current_price;
    let profit_loss = current_value - total_investment;
    let profit_loss_percentage = profit_loss / total_investment * 100.0;
    let duration_years = f64::from(schedule.duration_months) / 12.0;

    let cagr = compound_annual_growth_rate(total_investment, current_value, duration_years)?;
    debug!(
        total_investment,
        current_value, duration_years, cagr, "Calculated SIP returns"
    );

    Ok(SipResult {
        schedule: *schedule,
        average_price,
        current_price,
        total_investment,
        total_units,
        current_value,
        profit_loss,
        profit_loss_percentage,
        cagr,
        duration_years,
    })
}

/// Annualized growth from `begin_value` to `end_value` over `years`, in percent.
pub fn compound_annual_growth_rate(
    begin_value: f64,
    end_value: f64,
    years: f64,
) -> Result<f64, SipError> {
    if !(begin_value.is_finite() && begin_value > 0.0) {
        return Err(SipError::Calculation(format!(
            "starting value must be positive, got {begin_value}"
        )));
    }
    if !(years.is_finite() && years > 0.0) {
        return Err(SipError::Calculation(format!(
            "holding period must be positive, got {years} years"
        )));
    }
    let growth = end_value / begin_value;
    if !(growth.is_finite() && growth > 0.0) {
        return Err(SipError::Calculation(format!(
            "growth ratio {growth} has no real root"
        )));
    }
    if growth == 1.0 {
        return Ok(0.0);
    }
    // Decimal powers panic once the result leaves the Decimal range.
    let annual_growth = growth.powf(years.recip());
    if !(annual_growth.is_finite() && annual_growth <= MAX_ANNUAL_GROWTH) {
        return Err(SipError::Calculation(format!(
            "growth of {growth}x over {years} years is too large to annualize"
        )));
    }
    if !(DECIMAL_GROWTH_RANGE.contains(&growth) && DECIMAL_GROWTH_RANGE.contains(&annual_growth)) {
        return Ok((annual_growth - 1.0) * 100.0);
    }

    let to_decimal = |v: f64, what: &str| {
        Decimal::from_f64(v)
            .ok_or_else(|| SipError::Calculation(format!("{what} {v} is out of range")))
    };
    let growth_ratio = to_decimal(growth, "growth ratio")?;
    let n_years = to_decimal(years, "holding period")?;

    let rate = cagr(Decimal::ONE, growth_ratio, n_years);
    (rate * Decimal::from(100))
        .to_f64()
        .filter(|r| r.is_finite())
        .ok_or_else(|| SipError::Calculation("growth rate is not representable".to_string()))
}

/// Average purchase price the schedule must have been bought at for a
/// valuation at `current_price` to show `target_cagr` percent a year.
pub fn required_average_price(
    schedule: &ContributionSchedule,
    current_price: f64,
    target_cagr: f64,
) -> Result<f64, SipError> {
    schedule.validate()?;
    ensure_positive("current_price", current_price)?;
    if !(target_cagr.is_finite() && target_cagr > -100.0) {
        return Err(SipError::invalid("target_cagr", target_cagr));
    }

    let duration_years = f64::from(schedule.duration_months) / 12.0;
    let growth = (1.0 + target_cagr / 100.0).powf(duration_years);
    let average_price = current_price / growth;
    if !(average_price.is_finite() && average_price > 0.0) {
        return Err(SipError::Calculation(format!(
            "{target_cagr}% a year over {duration_years} years has no attainable average price"
        )));
    }
    debug!(target_cagr, duration_years, average_price, "Solved for average price");
    Ok(average_price)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityPoint {
    /// Fractional change applied to the current price, `0.1` is +10%.
    pub offset: f64,
    pub current_price: f64,
    pub result: SipResult,
}

/// Recalculates the schedule with `current_price` scaled by `1 + offset` for
/// each offset, in the given order.
pub fn sensitivity(
    schedule: &ContributionSchedule,
    average_price: f64,
    current_price: f64,
    offsets: &[f64],
) -> Result<Vec<SensitivityPoint>, SipError> {
    offsets
        .iter()
        .map(|&offset| {
            if !offset.is_finite() {
                return Err(SipError::invalid("offset", offset));
            }
            let scenario_price = current_price * (1.0 + offset);
            let result = calculate(schedule, average_price, scenario_price)?;
            Ok(SensitivityPoint {
                offset,
                current_price: scenario_price,
                result,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmountScenario {
    pub multiplier: f64,
    pub monthly_amount: f64,
    pub result: SipResult,
}

/// Recalculates the schedule with the monthly amount scaled by each multiplier.
pub fn amount_impact(
    schedule: &ContributionSchedule,
    average_price: f64,
    current_price: f64,
    multipliers: &[f64],
) -> Result<Vec<AmountScenario>, SipError> {
    multipliers
        .iter()
        .map(|&multiplier| {
            ensure_positive("multiplier", multiplier)?;
            let scaled = ContributionSchedule {
                monthly_amount: schedule.monthly_amount * multiplier,
                ..*schedule
            };
            let result = calculate(&scaled, average_price, current_price)?;
            Ok(AmountScenario {
                multiplier,
                monthly_amount: scaled.monthly_amount,
                result,
            })
        })
        .collect()
}

/// One month of a purchase schedule bought at that month's price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PurchaseRow {
    pub month_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_date: Option<NaiveDate>,
    pub price: f64,
    pub units_bought: f64,
    pub cumulative_units: f64,
    pub cumulative_investment: f64,
    pub value_at_current_price: f64,
}

/// Buys `monthly_amount` worth of gold each month at the matching entry of
/// `monthly_prices`. The last price repeats if the series is short.
pub fn purchase_breakdown(
    schedule: &ContributionSchedule,
    monthly_prices: &[f64],
    current_price: f64,
) -> Result<Vec<PurchaseRow>, SipError> {
    schedule.validate()?;
    ensure_positive("current_price", current_price)?;
    let Some(&last_price) = monthly_prices.last() else {
        return Err(SipError::invalid("monthly_prices", 0.0));
    };
    for &price in monthly_prices {
        ensure_positive("monthly_prices", price)?;
    }

    let mut cumulative_units = 0.0;
    let rows = (1..=schedule.duration_months)
        .map(|month| {
            let price = monthly_prices
                .get(month as usize - 1)
                .copied()
                .unwrap_or(last_price);
            let units_bought = schedule.monthly_amount / price;
            cumulative_units += units_bought;
            PurchaseRow {
                month_index: month,
                month_date: schedule.month_date(month),
                price,
                units_bought,
                cumulative_units,
                cumulative_investment: schedule.monthly_amount * f64::from(month),
                value_at_current_price: cumulative_units * current_price,
            }
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_profit_scenario() {
        let schedule = ContributionSchedule::new(10000.0, 24);
        let result = calculate(&schedule, 8000.0, 10500.0).unwrap();

        assert_eq!(result.total_investment, 240000.0);
        assert_eq!(result.total_units, 30.0);
        assert_eq!(result.current_value, 315000.0);
        assert_eq!(result.profit_loss, 75000.0);
        assert_eq!(result.profit_loss_percentage, 31.25);
        assert_eq!(result.duration_years, 2.0);
        assert_close(result.cagr, 14.56, 0.01);
        assert!(result.is_profit());
    }

    #[test]
    fn test_loss_scenario() {
        let schedule = ContributionSchedule::new(5000.0, 12);
        let result = calculate(&schedule, 9000.0, 7000.0).unwrap();

        assert_eq!(result.total_investment, 60000.0);
        assert_close(result.total_units, 6.667, 0.001);
        assert_close(result.current_value, 46666.67, 0.01);
        assert_close(result.profit_loss, -13333.33, 0.01);
        assert!(result.cagr < 0.0);
        // One year holding period: CAGR equals the simple return.
        assert_close(result.cagr, result.profit_loss_percentage, 0.001);
        assert!(!result.is_profit());
    }

    #[test]
    fn test_flat_price_has_no_gain() {
        let schedule = ContributionSchedule::new(2500.0, 18);
        let result = calculate(&schedule, 9100.0, 9100.0).unwrap();

        assert_close(result.profit_loss, 0.0, 1e-9);
        assert_close(result.cagr, 0.0, 1e-9);
    }

    #[test]
    fn test_higher_current_price_increases_returns() {
        let schedule = ContributionSchedule::new(10000.0, 36);
        let results: Vec<SipResult> = [9000.0, 10500.0, 12000.0]
            .iter()
            .map(|&p| calculate(&schedule, 8000.0, p).unwrap())
            .collect();

        for pair in results.windows(2) {
            assert!(pair[1].current_value > pair[0].current_value);
            assert!(pair[1].profit_loss > pair[0].profit_loss);
            assert!(pair[1].cagr > pair[0].cagr);
        }
    }

    #[test]
    fn test_calculate_is_deterministic() {
        let schedule = ContributionSchedule::new(7777.0, 29);
        let first = calculate(&schedule, 6543.21, 10987.6).unwrap();
        let second = calculate(&schedule, 6543.21, 10987.6).unwrap();
        assert_eq!(first.cagr.to_bits(), second.cagr.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_inputs_name_the_field() {
        let valid = ContributionSchedule::new(1000.0, 12);
        let cases = [
            (ContributionSchedule::new(0.0, 12), 8000.0, 9000.0, "monthly_amount"),
            (ContributionSchedule::new(-5.0, 12), 8000.0, 9000.0, "monthly_amount"),
            (ContributionSchedule::new(1000.0, 0), 8000.0, 9000.0, "duration_months"),
            (valid, 0.0, 9000.0, "average_price"),
            (valid, 8000.0, -1.0, "current_price"),
            (valid, f64::NAN, 9000.0, "average_price"),
        ];

        for (schedule, average, current, expected_field) in cases {
            match calculate(&schedule, average, current) {
                Err(SipError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("expected invalid input for {expected_field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_cagr_rejects_degenerate_growth() {
        assert!(matches!(
            compound_annual_growth_rate(1000.0, 0.0, 2.0),
            Err(SipError::Calculation(_))
        ));
        assert!(matches!(
            compound_annual_growth_rate(1000.0, -50.0, 2.0),
            Err(SipError::Calculation(_))
        ));
        assert!(matches!(
            compound_annual_growth_rate(0.0, 50.0, 2.0),
            Err(SipError::Calculation(_))
        ));
        assert!(matches!(
            compound_annual_growth_rate(1000.0, 1500.0, 0.0),
            Err(SipError::Calculation(_))
        ));
    }

    #[test]
    fn test_cagr_fractional_years() {
        // 1.21 growth over two years is 10% a year.
        assert_close(
            compound_annual_growth_rate(100.0, 121.0, 2.0).unwrap(),
            10.0,
            0.001,
        );
        // Six months: (1.1)^2 - 1 = 21%.
        assert_close(
            compound_annual_growth_rate(100.0, 110.0, 0.5).unwrap(),
            21.0,
            0.001,
        );
    }

    #[test]
    fn test_cagr_for_short_and_long_plans() {
        let one_month = ContributionSchedule::new(1000.0, 1);
        let result = calculate(&one_month, 8000.0, 10500.0).unwrap();
        assert_close(result.cagr, 2513.3149, 0.01);

        let seven_months = ContributionSchedule::new(1000.0, 7);
        let result = calculate(&seven_months, 8000.0, 10500.0).unwrap();
        assert_close(result.cagr, 59.3881, 0.001);

        let fifty_years = ContributionSchedule::new(1000.0, 600);
        let result = calculate(&fifty_years, 1_000_000.0, 1.0).unwrap();
        assert_close(result.cagr, -24.1422, 0.001);
    }

    #[test]
    fn test_cagr_overflow_is_an_error() {
        // 10000x in a single month annualizes to 10^48.
        let one_month = ContributionSchedule::new(1000.0, 1);
        match calculate(&one_month, 100.0, 1_000_000.0) {
            Err(SipError::Calculation(message)) => assert!(message.contains("too large")),
            other => panic!("expected a calculation error, got {other:?}"),
        }
        assert!(matches!(
            compound_annual_growth_rate(1.0, 1e300, 1.0 / 12.0),
            Err(SipError::Calculation(_))
        ));
    }

    #[test]
    fn test_cagr_near_total_loss_stays_finite() {
        let one_month = ContributionSchedule::new(1000.0, 1);
        let result = calculate(&one_month, 1e12, 1e-3).unwrap();
        assert!(result.cagr.is_finite());
        assert_close(result.cagr, -100.0, 1e-6);
    }

    #[test]
    fn test_schedule_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let schedule = ContributionSchedule::new(1000.0, 3).with_start_date(Some(start));

        assert_eq!(schedule.month_date(1), Some(start));
        assert_eq!(schedule.month_date(2), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(schedule.month_date(3), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(schedule.end_date(), NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(ContributionSchedule::new(1000.0, 3).end_date(), None);

        let result = calculate(&schedule, 8000.0, 9000.0).unwrap();
        let dates: Vec<Option<NaiveDate>> =
            result.monthly_breakdown().map(|row| row.month_date).collect();
        assert_eq!(
            dates,
            vec![
                Some(start),
                NaiveDate::from_ymd_opt(2024, 1, 31),
                NaiveDate::from_ymd_opt(2024, 3, 1)
            ]
        );

        let value = serde_json::to_value(result.metrics()).unwrap();
        assert_eq!(value["start_date"], "2024-01-01");
        assert_eq!(value["end_date"], "2024-03-31");
        assert_eq!(value["monthly_breakdown"][1]["month_date"], "2024-01-31");

        let undated = calculate(&ContributionSchedule::new(1000.0, 3), 8000.0, 9000.0).unwrap();
        let value = serde_json::to_value(undated.metrics()).unwrap();
        assert!(value.get("start_date").is_none());
        assert!(value["monthly_breakdown"][0].get("month_date").is_none());
    }

    #[test]
    fn test_start_date_past_calendar_end_is_rejected() {
        let schedule =
            ContributionSchedule::new(1000.0, u32::MAX).with_start_date(Some(NaiveDate::MAX));
        assert!(matches!(
            calculate(&schedule, 8000.0, 9000.0),
            Err(SipError::Calculation(_))
        ));
    }

    #[test]
    fn test_required_average_price() {
        let schedule = ContributionSchedule::new(10000.0, 24);
        let achieved = calculate(&schedule, 8000.0, 10500.0).unwrap().cagr;
        assert_close(
            required_average_price(&schedule, 10500.0, achieved).unwrap(),
            8000.0,
            1e-6,
        );

        let average = required_average_price(&schedule, 10500.0, 12.0).unwrap();
        assert_close(average, 10500.0 / 1.2544, 1e-6);
        assert_close(
            calculate(&schedule, average, 10500.0).unwrap().cagr,
            12.0,
            1e-6,
        );
        assert_eq!(
            required_average_price(&schedule, 10500.0, 0.0).unwrap(),
            10500.0
        );
    }

    #[test]
    fn test_required_average_price_rejects_bad_targets() {
        let schedule = ContributionSchedule::new(10000.0, 24);
        for (current, target, expected_field) in [
            (10500.0, -100.0, "target_cagr"),
            (10500.0, f64::NAN, "target_cagr"),
            (0.0, 12.0, "current_price"),
        ] {
            match required_average_price(&schedule, current, target) {
                Err(SipError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("expected invalid input for {expected_field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_monthly_breakdown() {
        let schedule = ContributionSchedule::new(10000.0, 24);
        let result = calculate(&schedule, 8000.0, 10500.0).unwrap();

        let rows: Vec<MonthlySnapshot> = result.monthly_breakdown().collect();
        assert_eq!(rows.len(), 24);
        assert_eq!(result.monthly_breakdown().len(), 24);

        assert_eq!(rows[0].month_index, 1);
        assert_eq!(rows[0].cumulative_investment, 10000.0);
        assert_eq!(rows[0].cumulative_units, 1.25);
        assert_eq!(rows[0].value_at_current_price, 13125.0);

        let last = rows.last().unwrap();
        assert_eq!(last.month_index, 24);
        assert_eq!(last.cumulative_investment, result.total_investment);
        assert_close(last.cumulative_units, result.total_units, 1e-9);
        assert_close(last.value_at_current_price, result.current_value, 1e-6);

        // Restartable
        let again: Vec<MonthlySnapshot> = result.monthly_breakdown().collect();
        assert_eq!(rows, again);
    }

    #[test]
    fn test_metrics_serialization() {
        let schedule = ContributionSchedule::new(10000.0, 3);
        let result = calculate(&schedule, 8000.0, 10000.0).unwrap();
        let value = serde_json::to_value(result.metrics()).unwrap();

        for key in [
            "total_investment",
            "total_units",
            "current_value",
            "profit_loss",
            "profit_loss_percentage",
            "cagr",
            "monthly_breakdown",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["monthly_breakdown"].as_array().unwrap().len(), 3);
        assert_eq!(value["total_investment"], 30000.0);
    }

    #[test]
    fn test_sensitivity() {
        let schedule = ContributionSchedule::new(10000.0, 24);
        let points = sensitivity(&schedule, 8000.0, 10000.0, &[-0.2, 0.0, 0.1]).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].offset, -0.2);
        assert_close(points[0].current_price, 8000.0, 1e-9);
        assert_close(points[0].result.profit_loss, 0.0, 1e-6);
        assert_eq!(points[1].current_price, 10000.0);
        assert_eq!(
            points[1].result,
            calculate(&schedule, 8000.0, 10000.0).unwrap()
        );
        assert_close(points[2].current_price, 11000.0, 1e-9);
        assert!(points[2].result.cagr > points[1].result.cagr);
    }

    #[test]
    fn test_sensitivity_rejects_wipeout_offset() {
        let schedule = ContributionSchedule::new(10000.0, 24);
        let err = sensitivity(&schedule, 8000.0, 10000.0, &[0.0, -1.0]).unwrap_err();
        assert!(matches!(
            err,
            SipError::InvalidInput {
                field: "current_price",
                ..
            }
        ));
    }

    #[test]
    fn test_amount_impact() {
        let schedule = ContributionSchedule::new(10000.0, 12);
        let scenarios =
            amount_impact(&schedule, 8000.0, 10000.0, &DEFAULT_AMOUNT_MULTIPLIERS).unwrap();

        assert_eq!(scenarios.len(), 6);
        assert_eq!(scenarios[0].monthly_amount, 5000.0);
        assert_eq!(scenarios[0].result.total_investment, 60000.0);
        assert_eq!(scenarios[5].result.total_units, 30.0);
        // Scaling the amount leaves the rate of return unchanged.
        for scenario in &scenarios {
            assert_close(scenario.result.cagr, scenarios[2].result.cagr, 1e-6);
        }
        assert!(amount_impact(&schedule, 8000.0, 10000.0, &[0.0]).is_err());
    }

    #[test]
    fn test_purchase_breakdown_with_short_series() {
        let schedule = ContributionSchedule::new(1000.0, 4);
        let rows = purchase_breakdown(&schedule, &[500.0, 1000.0], 2000.0).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].units_bought, 2.0);
        assert_eq!(rows[1].units_bought, 1.0);
        assert_eq!(rows[2].price, 1000.0);
        assert_eq!(rows[3].price, 1000.0);
        assert_eq!(rows[3].cumulative_units, 5.0);
        assert_eq!(rows[3].cumulative_investment, 4000.0);
        assert_eq!(rows[3].value_at_current_price, 10000.0);
        assert_eq!(rows[3].month_date, None);
    }

    #[test]
    fn test_purchase_breakdown_dates_each_row() {
        let start = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let schedule = ContributionSchedule::new(1000.0, 2).with_start_date(Some(start));
        let rows = purchase_breakdown(&schedule, &[500.0], 600.0).unwrap();

        assert_eq!(rows[0].month_date, Some(start));
        assert_eq!(rows[1].month_date, NaiveDate::from_ymd_opt(2023, 7, 15));
    }

    #[test]
    fn test_purchase_breakdown_rejects_bad_series() {
        let schedule = ContributionSchedule::new(1000.0, 4);
        assert!(purchase_breakdown(&schedule, &[], 2000.0).is_err());
        assert!(purchase_breakdown(&schedule, &[500.0, 0.0], 2000.0).is_err());
        assert!(purchase_breakdown(&schedule, &[500.0], -1.0).is_err());
    }
}
