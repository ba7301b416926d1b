//! CTC to in-hand salary breakdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::hra::{self, HraInput};
use super::income_tax::{self, AgeGroup, TaxBreakdown, TaxRegime};
use super::math::{
    add, ensure_amount, ensure_positive, ensure_range, percent_of, round_money,
};

/// Monthly basic up to which PF is mandatory.
const PF_WAGE_CEILING_MONTHLY: i64 = 15_000;
/// PF contribution rate in percent, for employer and employee alike.
const PF_RATE: i64 = 12;
/// Combined ceiling for section 80C-type deductions including employee PF.
const SECTION_80C_LIMIT: i64 = 150_000;

/// Salary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryInput {
    /// Annual cost to company.
    pub annual_ctc: Decimal,
    /// Basic pay as a percent of CTC.
    #[serde(default = "default_basic_percent")]
    pub basic_percent: Decimal,
    /// HRA as a percent of basic.
    #[serde(default = "default_hra_percent")]
    pub hra_percent: Decimal,
    /// Whether the employer's PF share is part of the CTC.
    #[serde(default = "default_true")]
    pub employer_pf_in_ctc: bool,
    /// Whether PF is computed on basic capped at the statutory wage ceiling.
    #[serde(default = "default_true")]
    pub pf_wage_cap: bool,
    /// Annual professional tax.
    #[serde(default = "default_professional_tax")]
    pub professional_tax: Decimal,
    /// Tax regime.
    #[serde(default)]
    pub regime: TaxRegime,
    /// Age bracket.
    #[serde(default)]
    pub age_group: AgeGroup,
    /// Annual rent paid, for the old-regime HRA exemption.
    #[serde(default)]
    pub rent_paid: Decimal,
    /// Whether the employee lives in a metro city.
    #[serde(default)]
    pub metro_city: bool,
    /// Other Chapter VI-A deductions under the old regime.
    #[serde(default)]
    pub deductions: Decimal,
}

fn default_basic_percent() -> Decimal {
    Decimal::from(50)
}

fn default_hra_percent() -> Decimal {
    Decimal::from(50)
}

fn default_true() -> bool {
    true
}

fn default_professional_tax() -> Decimal {
    Decimal::from(2_400)
}

/// Salary components for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponents {
    /// Basic pay.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Special allowance balancing the gross.
    pub special_allowance: Decimal,
    /// Gross salary.
    pub gross: Decimal,
    /// Employer PF contribution.
    pub employer_pf: Decimal,
    /// Employee PF contribution.
    pub employee_pf: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Income tax.
    pub income_tax: Decimal,
    /// Take-home pay.
    pub net: Decimal,
}

impl SalaryComponents {
    fn monthly(&self) -> Self {
        let twelfth = |v: Decimal| round_money(v / Decimal::from(12));
        Self {
            basic: twelfth(self.basic),
            hra: twelfth(self.hra),
            special_allowance: twelfth(self.special_allowance),
            gross: twelfth(self.gross),
            employer_pf: twelfth(self.employer_pf),
            employee_pf: twelfth(self.employee_pf),
            professional_tax: twelfth(self.professional_tax),
            income_tax: twelfth(self.income_tax),
            net: twelfth(self.net),
        }
    }
}

/// Salary result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryOutput {
    /// Annual components.
    pub annual: SalaryComponents,
    /// Monthly components.
    pub monthly: SalaryComponents,
    /// HRA exemption claimed under the old regime.
    pub hra_exemption: Decimal,
    /// Income tax computation.
    pub tax: TaxBreakdown,
    /// Annual take-home.
    pub net_annual: Decimal,
    /// Monthly take-home.
    pub net_monthly: Decimal,
}

/// Breaks a CTC down into in-hand salary.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs, when basic pay plus the
/// employer PF share exceeds the CTC, or when the CTC cannot cover employee
/// PF, professional tax and income tax.
pub fn calculate(input: &SalaryInput) -> Result<SalaryOutput, CalculatorError> {
    ensure_positive(
        "annual_ctc",
        input.annual_ctc,
        Decimal::from(10_000_000_000_i64),
    )?;
    ensure_range(
        "basic_percent",
        input.basic_percent,
        Decimal::TEN,
        Decimal::ONE_HUNDRED,
    )?;
    ensure_range(
        "hra_percent",
        input.hra_percent,
        Decimal::ZERO,
        Decimal::from(50),
    )?;
    ensure_range(
        "professional_tax",
        input.professional_tax,
        Decimal::ZERO,
        Decimal::from(2_500),
    )?;
    ensure_amount("rent_paid", input.rent_paid)?;
    ensure_amount("deductions", input.deductions)?;

    let basic = round_money(percent_of(input.annual_ctc, input.basic_percent)?);
    let pf_wage = if input.pf_wage_cap {
        basic.min(Decimal::from(PF_WAGE_CEILING_MONTHLY * 12))
    } else {
        basic
    };
    let pf = round_money(percent_of(pf_wage, Decimal::from(PF_RATE))?);

    let gross = if input.employer_pf_in_ctc {
        input.annual_ctc - pf
    } else {
        input.annual_ctc
    };
    if basic > gross {
        return Err(CalculatorError::invalid(
            "basic_percent",
            "basic pay plus employer PF must not exceed the CTC",
        ));
    }
    let hra = round_money(percent_of(basic, input.hra_percent)?)
        .min((gross - basic).max(Decimal::ZERO));
    let special_allowance = (gross - basic - hra).max(Decimal::ZERO);

    let (hra_exemption, taxable) = match input.regime {
        TaxRegime::New => (
            Decimal::ZERO,
            gross - income_tax::standard_deduction(TaxRegime::New),
        ),
        TaxRegime::Old => {
            let exemption = hra::calculate(&HraInput {
                basic_salary: basic,
                dearness_allowance: Decimal::ZERO,
                hra_received: hra,
                rent_paid: input.rent_paid,
                metro_city: input.metro_city,
            })?
            .exempt_hra;
            let chapter_via = add(input.deductions, pf)?.min(Decimal::from(SECTION_80C_LIMIT));
            (
                exemption,
                gross
                    - income_tax::standard_deduction(TaxRegime::Old)
                    - input.professional_tax
                    - exemption
                    - chapter_via,
            )
        }
    };

    let tax = income_tax::tax_on_income(taxable, input.regime, input.age_group)?;
    let net_annual = gross - pf - input.professional_tax - tax.total_tax;
    if net_annual < Decimal::ZERO {
        return Err(CalculatorError::invalid(
            "annual_ctc",
            "too small to cover PF, professional tax and income tax",
        ));
    }

    let annual = SalaryComponents {
        basic,
        hra,
        special_allowance,
        gross,
        employer_pf: pf,
        employee_pf: pf,
        professional_tax: input.professional_tax,
        income_tax: tax.total_tax,
        net: net_annual,
    };
    let monthly = annual.monthly();
    let net_monthly = monthly.net;

    Ok(SalaryOutput {
        annual,
        monthly,
        hra_exemption,
        tax,
        net_annual,
        net_monthly,
    })
}
