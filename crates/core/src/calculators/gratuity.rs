//! Gratuity payable on leaving employment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{div, ensure_count, ensure_positive, mul, round_money};

/// Tax-exempt ceiling on gratuity.
pub const TAX_EXEMPT_LIMIT: Decimal = Decimal::from_parts(2_000_000, 0, 0, false, 0);

/// Minimum completed years of service for eligibility.
pub const MIN_SERVICE_YEARS: u32 = 5;

/// Gratuity parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GratuityInput {
    /// Last drawn monthly basic pay plus dearness allowance.
    pub monthly_salary: Decimal,
    /// Completed years of service.
    pub years_of_service: u32,
    /// Months served beyond the completed years.
    #[serde(default)]
    pub extra_months: u32,
    /// Whether the employer is covered under the Payment of Gratuity Act.
    #[serde(default = "default_covered")]
    pub covered_under_act: bool,
}

fn default_covered() -> bool {
    true
}

/// Gratuity result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GratuityOutput {
    /// Whether the employee qualifies.
    pub eligible: bool,
    /// Years counted in the formula.
    pub counted_years: u32,
    /// Gratuity amount.
    pub gratuity_amount: Decimal,
    /// Portion exempt from income tax.
    pub tax_exempt: Decimal,
    /// Portion subject to income tax.
    pub taxable: Decimal,
}

/// Calculates gratuity.
///
/// Covered employers pay `salary * 15 * years / 26` with six or more extra
/// months rounding the service up; others pay `salary * 15 * years / 30`
/// on completed years only.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs.
pub fn calculate(input: &GratuityInput) -> Result<GratuityOutput, CalculatorError> {
    ensure_positive(
        "monthly_salary",
        input.monthly_salary,
        Decimal::from(100_000_000),
    )?;
    ensure_count("years_of_service", input.years_of_service, 0, 60)?;
    ensure_count("extra_months", input.extra_months, 0, 11)?;

    let counted_years = if input.covered_under_act && input.extra_months >= 6 {
        input.years_of_service + 1
    } else {
        input.years_of_service
    };

    if input.years_of_service < MIN_SERVICE_YEARS {
        return Ok(GratuityOutput {
            eligible: false,
            counted_years,
            gratuity_amount: Decimal::ZERO,
            tax_exempt: Decimal::ZERO,
            taxable: Decimal::ZERO,
        });
    }

    let divisor = if input.covered_under_act { 26 } else { 30 };
    let amount = round_money(div(
        mul(
            input.monthly_salary,
            Decimal::from(15 * counted_years),
        )?,
        Decimal::from(divisor),
    )?);
    let tax_exempt = amount.min(TAX_EXEMPT_LIMIT);

    Ok(GratuityOutput {
        eligible: true,
        counted_years,
        gratuity_amount: amount,
        tax_exempt,
        taxable: amount - tax_exempt,
    })
}
