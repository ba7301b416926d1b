//! Public Provident Fund maturity projection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{add, ensure_count, ensure_range, percent_of, round_money};

/// PPF parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpfInput {
    /// Deposit made at the start of every financial year.
    pub yearly_investment: Decimal,
    /// Annual interest rate in percent.
    #[serde(default = "default_rate")]
    pub annual_rate: Decimal,
    /// Account tenure: 15 years plus optional 5-year extensions.
    #[serde(default = "default_years")]
    pub years: u32,
}

fn default_rate() -> Decimal {
    Decimal::new(71, 1)
}

fn default_years() -> u32 {
    15
}

/// One year of the PPF ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpfYear {
    /// 1-based year.
    pub year: u32,
    /// Balance at the start of the year.
    pub opening_balance: Decimal,
    /// Deposit for the year.
    pub deposit: Decimal,
    /// Interest credited at year end.
    pub interest: Decimal,
    /// Balance at the end of the year.
    pub closing_balance: Decimal,
}

/// PPF result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpfOutput {
    /// Sum of deposits.
    pub total_investment: Decimal,
    /// Sum of interest credited.
    pub total_interest: Decimal,
    /// Balance at maturity.
    pub maturity_value: Decimal,
    /// Yearly ledger.
    pub yearly: Vec<PpfYear>,
}

/// Projects a PPF account to maturity.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs or a tenure that is not
/// 15 years plus a multiple of 5.
pub fn calculate(input: &PpfInput) -> Result<PpfOutput, CalculatorError> {
    ensure_range(
        "yearly_investment",
        input.yearly_investment,
        Decimal::from(500),
        Decimal::from(150_000),
    )?;
    ensure_range(
        "annual_rate",
        input.annual_rate,
        Decimal::ZERO,
        Decimal::from(15),
    )?;
    ensure_count("years", input.years, 15, 50)?;
    if (input.years - 15) % 5 != 0 {
        return Err(CalculatorError::invalid(
            "years",
            "must be 15 plus a multiple of 5",
        ));
    }

    let mut balance = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut yearly = Vec::with_capacity(input.years as usize);

    for year in 1..=input.years {
        let opening = balance;
        let base = add(opening, input.yearly_investment)?;
        let interest = round_money(percent_of(base, input.annual_rate)?);
        balance = base + interest;
        total_interest += interest;

        yearly.push(PpfYear {
            year,
            opening_balance: opening,
            deposit: input.yearly_investment,
            interest,
            closing_balance: balance,
        });
    }

    Ok(PpfOutput {
        total_investment: input.yearly_investment * Decimal::from(input.years),
        total_interest,
        maturity_value: balance,
        yearly,
    })
}
