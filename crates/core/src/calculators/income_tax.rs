//! Individual income tax for FY 2025-26 (AY 2026-27).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{add, div, ensure_amount, ensure_range, mul, percent_of, round_money};

/// Tax regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Old regime with exemptions and deductions.
    Old,
    /// Default regime under section 115BAC.
    #[default]
    New,
}

/// Age bracket of the taxpayer. Only the old regime distinguishes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Below 60 years.
    #[default]
    Below60,
    /// 60 to 79 years.
    Senior,
    /// 80 years and above.
    SuperSenior,
}

const CESS_PERCENT: i64 = 4;
const NEW_REBATE_LIMIT: i64 = 1_200_000;
const OLD_REBATE_LIMIT: i64 = 500_000;
const OLD_REBATE_MAX: i64 = 12_500;

/// Surcharge brackets as (income above, rate percent).
const SURCHARGE_BRACKETS: [(i64, i64); 4] = [
    (5_000_000, 10),
    (10_000_000, 15),
    (20_000_000, 25),
    (50_000_000, 37),
];

/// Highest surcharge rate under the new regime.
const NEW_REGIME_SURCHARGE_CAP: i64 = 25;

/// Income tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxInput {
    /// Gross annual income.
    pub gross_income: Decimal,
    /// Tax regime.
    #[serde(default)]
    pub regime: TaxRegime,
    /// Age bracket.
    #[serde(default)]
    pub age_group: AgeGroup,
    /// Whether the standard deduction for salaried taxpayers applies.
    #[serde(default = "default_salaried")]
    pub salaried: bool,
    /// Chapter VI-A deductions. Ignored under the new regime.
    #[serde(default)]
    pub deductions: Decimal,
}

fn default_salaried() -> bool {
    true
}

/// Tax computed within one slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTax {
    /// Lower bound of the slab.
    pub from: Decimal,
    /// Upper bound, open-ended when absent.
    pub to: Option<Decimal>,
    /// Slab rate in percent.
    pub rate: Decimal,
    /// Income falling in this slab.
    pub taxable_amount: Decimal,
    /// Tax on that income.
    pub tax: Decimal,
}

/// Tax on a given taxable income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Regime used.
    pub regime: TaxRegime,
    /// Income the slabs were applied to.
    pub taxable_income: Decimal,
    /// Per-slab tax.
    pub slabs: Vec<SlabTax>,
    /// Slab tax before the section 87A rebate.
    pub tax_before_rebate: Decimal,
    /// Section 87A rebate.
    pub rebate: Decimal,
    /// Tax after rebate.
    pub tax_after_rebate: Decimal,
    /// Surcharge after marginal relief.
    pub surcharge: Decimal,
    /// Health and education cess.
    pub cess: Decimal,
    /// Total tax payable.
    pub total_tax: Decimal,
}

/// Income tax result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxOutput {
    /// Gross income as entered.
    pub gross_income: Decimal,
    /// Standard deduction applied.
    pub standard_deduction: Decimal,
    /// Chapter VI-A deductions applied.
    pub deductions: Decimal,
    /// Tax computation.
    #[serde(flatten)]
    pub breakdown: TaxBreakdown,
    /// Total tax as a percentage of gross income.
    pub effective_rate: Decimal,
}

struct Slab {
    from: i64,
    to: Option<i64>,
    rate: i64,
}

const fn slab(from: i64, to: Option<i64>, rate: i64) -> Slab {
    Slab { from, to, rate }
}

fn slabs(regime: TaxRegime, age: AgeGroup) -> Vec<Slab> {
    match regime {
        TaxRegime::New => vec![
            slab(0, Some(400_000), 0),
            slab(400_000, Some(800_000), 5),
            slab(800_000, Some(1_200_000), 10),
            slab(1_200_000, Some(1_600_000), 15),
            slab(1_600_000, Some(2_000_000), 20),
            slab(2_000_000, Some(2_400_000), 25),
            slab(2_400_000, None, 30),
        ],
        TaxRegime::Old => {
            let exemption = match age {
                AgeGroup::Below60 => 250_000,
                AgeGroup::Senior => 300_000,
                AgeGroup::SuperSenior => 500_000,
            };
            let mut table = vec![slab(0, Some(exemption), 0)];
            if exemption < 500_000 {
                table.push(slab(exemption, Some(500_000), 5));
            }
            table.push(slab(500_000, Some(1_000_000), 20));
            table.push(slab(1_000_000, None, 30));
            table
        }
    }
}

/// Standard deduction for salaried taxpayers.
#[must_use]
pub fn standard_deduction(regime: TaxRegime) -> Decimal {
    match regime {
        TaxRegime::New => Decimal::from(75_000),
        TaxRegime::Old => Decimal::from(50_000),
    }
}

fn slab_tax(
    income: Decimal,
    regime: TaxRegime,
    age: AgeGroup,
) -> Result<(Vec<SlabTax>, Decimal), CalculatorError> {
    let mut rows = Vec::new();
    let mut total = Decimal::ZERO;

    for s in slabs(regime, age) {
        let from = Decimal::from(s.from);
        if income <= from {
            break;
        }
        let to = s.to.map(Decimal::from);
        let upper = to.map_or(income, |to| income.min(to));
        let taxable_amount = upper - from;
        let rate = Decimal::from(s.rate);
        let tax = round_money(percent_of(taxable_amount, rate)?);
        total = add(total, tax)?;
        rows.push(SlabTax {
            from,
            to,
            rate,
            taxable_amount,
            tax,
        });
    }

    Ok((rows, total))
}

fn rebate(regime: TaxRegime, taxable: Decimal, tax: Decimal) -> Decimal {
    match regime {
        TaxRegime::New => {
            let limit = Decimal::from(NEW_REBATE_LIMIT);
            if taxable <= limit {
                tax
            } else {
                // Tax may not exceed the income above the rebate limit.
                let excess = taxable - limit;
                (tax - excess).max(Decimal::ZERO)
            }
        }
        TaxRegime::Old => {
            if taxable <= Decimal::from(OLD_REBATE_LIMIT) {
                tax.min(Decimal::from(OLD_REBATE_MAX))
            } else {
                Decimal::ZERO
            }
        }
    }
}

fn surcharge(
    taxable: Decimal,
    tax: Decimal,
    regime: TaxRegime,
    age: AgeGroup,
) -> Result<Decimal, CalculatorError> {
    let brackets: Vec<(i64, i64)> = SURCHARGE_BRACKETS
        .iter()
        .copied()
        .filter(|&(_, rate)| regime == TaxRegime::Old || rate <= NEW_REGIME_SURCHARGE_CAP)
        .collect();

    let Some(index) = brackets
        .iter()
        .rposition(|&(threshold, _)| taxable > Decimal::from(threshold))
    else {
        return Ok(Decimal::ZERO);
    };

    let (threshold, rate) = brackets[index];
    let previous_rate = if index == 0 { 0 } else { brackets[index - 1].1 };

    let surcharge = percent_of(tax, Decimal::from(rate))?;

    // Marginal relief: tax plus surcharge may not exceed the liability at the
    // threshold by more than the income above it.
    let threshold = Decimal::from(threshold);
    let (_, tax_at_threshold) = slab_tax(threshold, regime, age)?;
    let cap = tax_at_threshold
        + percent_of(tax_at_threshold, Decimal::from(previous_rate))?
        + (taxable - threshold);

    let relieved = if tax + surcharge > cap {
        (cap - tax).max(Decimal::ZERO)
    } else {
        surcharge
    };

    Ok(round_money(relieved))
}

/// Computes tax on an already reduced taxable income.
///
/// # Errors
///
/// Returns `Overflow` if intermediate values leave the decimal range.
pub fn tax_on_income(
    taxable_income: Decimal,
    regime: TaxRegime,
    age: AgeGroup,
) -> Result<TaxBreakdown, CalculatorError> {
    let taxable_income = taxable_income.max(Decimal::ZERO);
    let (slabs, tax_before_rebate) = slab_tax(taxable_income, regime, age)?;
    let rebate = rebate(regime, taxable_income, tax_before_rebate);
    let tax_after_rebate = tax_before_rebate - rebate;
    let surcharge = surcharge(taxable_income, tax_after_rebate, regime, age)?;
    let cess = round_money(percent_of(
        tax_after_rebate + surcharge,
        Decimal::from(CESS_PERCENT),
    )?);

    Ok(TaxBreakdown {
        regime,
        taxable_income,
        slabs,
        tax_before_rebate,
        rebate,
        tax_after_rebate,
        surcharge,
        cess,
        total_tax: tax_after_rebate + surcharge + cess,
    })
}

/// Calculates income tax from gross income.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs.
pub fn calculate(input: &IncomeTaxInput) -> Result<IncomeTaxOutput, CalculatorError> {
    ensure_range(
        "gross_income",
        input.gross_income,
        Decimal::ZERO,
        Decimal::from(1_000_000_000_000_i64),
    )?;
    ensure_amount("deductions", input.deductions)?;

    let standard_deduction = if input.salaried {
        standard_deduction(input.regime).min(input.gross_income)
    } else {
        Decimal::ZERO
    };
    let deductions = match input.regime {
        TaxRegime::Old => input
            .deductions
            .min(input.gross_income - standard_deduction),
        TaxRegime::New => Decimal::ZERO,
    };
    let taxable = input.gross_income - standard_deduction - deductions;

    let breakdown = tax_on_income(taxable, input.regime, input.age_group)?;
    let effective_rate = if input.gross_income.is_zero() {
        Decimal::ZERO
    } else {
        round_money(div(
            mul(breakdown.total_tax, Decimal::ONE_HUNDRED)?,
            input.gross_income,
        )?)
    };

    Ok(IncomeTaxOutput {
        gross_income: input.gross_income,
        standard_deduction,
        deductions,
        breakdown,
        effective_rate,
    })
}
