//! Systematic investment plan projection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{
    add, ensure_count, ensure_positive, ensure_range, monthly_rate, mul, percent_of, round_money,
};

/// SIP parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipInput {
    /// Instalment paid at the start of every month.
    pub monthly_investment: Decimal,
    /// Expected annual return in percent.
    pub annual_return: Decimal,
    /// Investment horizon in years.
    pub years: u32,
    /// Yearly increase of the instalment in percent.
    #[serde(default)]
    pub annual_step_up: Decimal,
}

/// Value of the investment at the end of a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipYear {
    /// 1-based year.
    pub year: u32,
    /// Cumulative amount invested.
    pub invested: Decimal,
    /// Portfolio value at year end.
    pub value: Decimal,
}

/// SIP result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipOutput {
    /// Sum of all instalments.
    pub invested_amount: Decimal,
    /// Gains over the invested amount.
    pub estimated_returns: Decimal,
    /// Final portfolio value.
    pub maturity_value: Decimal,
    /// Year-end projection.
    pub yearly: Vec<SipYear>,
}

/// Result of a month-by-month accumulation.
pub(crate) struct Accumulation {
    pub invested: Decimal,
    pub value: Decimal,
    pub yearly: Vec<SipYear>,
}

/// Accumulates monthly contributions made at the start of each month.
///
/// The instalment grows by `step_up_percent` at the start of every year after
/// the first, rounded to paise.
pub(crate) fn accumulate(
    instalment: Decimal,
    annual_return: Decimal,
    years: u32,
    step_up_percent: Decimal,
) -> Result<Accumulation, CalculatorError> {
    let rate = monthly_rate(annual_return);
    let growth = Decimal::ONE + rate;

    let mut instalment = instalment;
    let mut invested = Decimal::ZERO;
    let mut balance = Decimal::ZERO;
    let mut yearly = Vec::with_capacity(years as usize);

    for year in 1..=years {
        if year > 1 && !step_up_percent.is_zero() {
            instalment = round_money(add(instalment, percent_of(instalment, step_up_percent)?)?);
        }
        for _ in 0..12 {
            invested = add(invested, instalment)?;
            balance = mul(add(balance, instalment)?, growth)?;
        }
        yearly.push(SipYear {
            year,
            invested,
            value: round_money(balance),
        });
    }

    Ok(Accumulation {
        invested,
        value: round_money(balance),
        yearly,
    })
}

/// Projects a SIP.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs.
pub fn calculate(input: &SipInput) -> Result<SipOutput, CalculatorError> {
    ensure_positive(
        "monthly_investment",
        input.monthly_investment,
        Decimal::from(1_000_000_000),
    )?;
    ensure_range(
        "annual_return",
        input.annual_return,
        Decimal::ZERO,
        Decimal::from(50),
    )?;
    ensure_count("years", input.years, 1, 50)?;
    ensure_range(
        "annual_step_up",
        input.annual_step_up,
        Decimal::ZERO,
        Decimal::ONE_HUNDRED,
    )?;

    let acc = accumulate(
        input.monthly_investment,
        input.annual_return,
        input.years,
        input.annual_step_up,
    )?;

    Ok(SipOutput {
        invested_amount: acc.invested,
        estimated_returns: acc.value - acc.invested,
        maturity_value: acc.value,
        yearly: acc.yearly,
    })
}
