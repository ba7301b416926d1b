//! House rent allowance exemption under section 10(13A).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{add, ensure_amount, ensure_positive, percent_of, round_money};

/// HRA parameters. All amounts are annual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HraInput {
    /// Basic salary.
    pub basic_salary: Decimal,
    /// Dearness allowance counted for retirement benefits.
    #[serde(default)]
    pub dearness_allowance: Decimal,
    /// HRA received from the employer.
    pub hra_received: Decimal,
    /// Rent actually paid.
    pub rent_paid: Decimal,
    /// Whether the rented home is in a metro city.
    #[serde(default)]
    pub metro_city: bool,
}

/// HRA result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HraOutput {
    /// Candidate (a): actual HRA received.
    pub actual_hra: Decimal,
    /// Candidate (b): rent paid over 10% of salary.
    pub rent_over_ten_percent: Decimal,
    /// Candidate (c): 50% or 40% of salary.
    pub salary_percent_limit: Decimal,
    /// Exempt portion, the least of the three.
    pub exempt_hra: Decimal,
    /// Taxable portion.
    pub taxable_hra: Decimal,
}

/// Calculates the HRA exemption.
///
/// # Errors
///
/// Returns `InvalidInput` for negative amounts or a non-positive basic.
pub fn calculate(input: &HraInput) -> Result<HraOutput, CalculatorError> {
    let max = Decimal::from(1_000_000_000_000_i64);
    ensure_positive("basic_salary", input.basic_salary, max)?;
    ensure_amount("dearness_allowance", input.dearness_allowance)?;
    ensure_amount("hra_received", input.hra_received)?;
    ensure_amount("rent_paid", input.rent_paid)?;

    let salary = add(input.basic_salary, input.dearness_allowance)?;
    let rent_over_ten_percent = round_money(
        (input.rent_paid - percent_of(salary, Decimal::TEN)?).max(Decimal::ZERO),
    );
    let limit_percent = if input.metro_city { 50 } else { 40 };
    let salary_percent_limit = round_money(percent_of(salary, Decimal::from(limit_percent))?);

    let exempt_hra = input
        .hra_received
        .min(rent_over_ten_percent)
        .min(salary_percent_limit);

    Ok(HraOutput {
        actual_hra: input.hra_received,
        rent_over_ten_percent,
        salary_percent_limit,
        exempt_hra,
        taxable_hra: input.hra_received - exempt_hra,
    })
}
