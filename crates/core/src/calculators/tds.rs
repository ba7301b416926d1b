//! Tax deducted at source for common payment sections (FY 2025-26).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{ensure_positive, percent_of, round_money};

/// Payment sections with TDS obligations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TdsSection {
    /// Interest other than on securities.
    #[serde(rename = "194A")]
    Interest194A,
    /// Payments to contractors.
    #[serde(rename = "194C")]
    Contractor194C,
    /// Commission or brokerage.
    #[serde(rename = "194H")]
    Commission194H,
    /// Rent on plant and machinery.
    #[serde(rename = "194I(a)")]
    RentMachinery194Ia,
    /// Rent on land, building or furniture.
    #[serde(rename = "194I(b)")]
    RentProperty194Ib,
    /// Fees for technical services.
    #[serde(rename = "194J(a)")]
    TechnicalFees194Ja,
    /// Fees for professional services.
    #[serde(rename = "194J(b)")]
    ProfessionalFees194Jb,
    /// Purchase of goods.
    #[serde(rename = "194Q")]
    GoodsPurchase194Q,
}

/// Payee category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayeeType {
    /// Individual or Hindu undivided family.
    #[default]
    IndividualHuf,
    /// Company, firm or any other payee.
    Other,
}

impl TdsSection {
    /// All supported sections.
    pub const ALL: [Self; 8] = [
        Self::Interest194A,
        Self::Contractor194C,
        Self::Commission194H,
        Self::RentMachinery194Ia,
        Self::RentProperty194Ib,
        Self::TechnicalFees194Ja,
        Self::ProfessionalFees194Jb,
        Self::GoodsPurchase194Q,
    ];

    /// Section code as printed in the Income-tax Act.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Interest194A => "194A",
            Self::Contractor194C => "194C",
            Self::Commission194H => "194H",
            Self::RentMachinery194Ia => "194I(a)",
            Self::RentProperty194Ib => "194I(b)",
            Self::TechnicalFees194Ja => "194J(a)",
            Self::ProfessionalFees194Jb => "194J(b)",
            Self::GoodsPurchase194Q => "194Q",
        }
    }

    /// Nature of payment.
    #[must_use]
    pub const fn nature(self) -> &'static str {
        match self {
            Self::Interest194A => "Interest other than on securities",
            Self::Contractor194C => "Payments to contractors",
            Self::Commission194H => "Commission or brokerage",
            Self::RentMachinery194Ia => "Rent on plant and machinery",
            Self::RentProperty194Ib => "Rent on land, building or furniture",
            Self::TechnicalFees194Ja => "Fees for technical services",
            Self::ProfessionalFees194Jb => "Fees for professional services",
            Self::GoodsPurchase194Q => "Purchase of goods",
        }
    }

    /// Amount up to which no tax is deducted.
    #[must_use]
    pub fn threshold(self) -> Decimal {
        let rupees: i64 = match self {
            Self::Interest194A | Self::TechnicalFees194Ja | Self::ProfessionalFees194Jb => 50_000,
            Self::Contractor194C => 30_000,
            Self::Commission194H => 20_000,
            Self::RentMachinery194Ia | Self::RentProperty194Ib => 600_000,
            Self::GoodsPurchase194Q => 5_000_000,
        };
        Decimal::from(rupees)
    }

    /// Rate in percent when the payee has furnished a PAN.
    #[must_use]
    pub fn rate(self, payee: PayeeType) -> Decimal {
        match (self, payee) {
            (Self::Interest194A | Self::RentProperty194Ib | Self::ProfessionalFees194Jb, _) => {
                Decimal::TEN
            }
            (Self::Contractor194C, PayeeType::IndividualHuf) => Decimal::ONE,
            (
                Self::Contractor194C
                | Self::Commission194H
                | Self::RentMachinery194Ia
                | Self::TechnicalFees194Ja,
                _,
            ) => Decimal::from(2),
            (Self::GoodsPurchase194Q, _) => Decimal::new(1, 1),
        }
    }

    /// Rate in percent when no PAN is available.
    #[must_use]
    pub fn rate_without_pan(self, payee: PayeeType) -> Decimal {
        let floor = match self {
            Self::GoodsPurchase194Q => Decimal::from(5),
            _ => Decimal::from(20),
        };
        self.rate(payee).max(floor)
    }

    /// Whether tax is computed on the amount above the threshold only.
    #[must_use]
    pub const fn applies_to_excess(self) -> bool {
        matches!(self, Self::GoodsPurchase194Q)
    }
}

/// TDS parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdsInput {
    /// Payment section.
    pub section: TdsSection,
    /// Payment amount.
    pub amount: Decimal,
    /// Payee category.
    #[serde(default)]
    pub payee_type: PayeeType,
    /// Whether the payee furnished a PAN.
    #[serde(default = "default_pan")]
    pub pan_available: bool,
}

fn default_pan() -> bool {
    true
}

/// TDS result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdsOutput {
    /// Section code.
    pub section: TdsSection,
    /// Nature of payment.
    pub nature: String,
    /// Threshold for the section.
    pub threshold: Decimal,
    /// Applied rate in percent.
    pub rate: Decimal,
    /// Whether the amount crosses the threshold.
    pub tds_applicable: bool,
    /// Amount the rate was applied to.
    pub taxable_amount: Decimal,
    /// Tax to deduct.
    pub tds_amount: Decimal,
    /// Amount paid to the payee after deduction.
    pub net_payable: Decimal,
}

/// Calculates TDS on a payment.
///
/// # Errors
///
/// Returns `InvalidInput` for a non-positive amount.
pub fn calculate(input: &TdsInput) -> Result<TdsOutput, CalculatorError> {
    ensure_positive("amount", input.amount, Decimal::from(1_000_000_000_000_i64))?;

    let section = input.section;
    let threshold = section.threshold();
    let rate = if input.pan_available {
        section.rate(input.payee_type)
    } else {
        section.rate_without_pan(input.payee_type)
    };

    let tds_applicable = input.amount > threshold;
    let taxable_amount = match (tds_applicable, section.applies_to_excess()) {
        (false, _) => Decimal::ZERO,
        (true, true) => input.amount - threshold,
        (true, false) => input.amount,
    };
    let tds_amount = round_money(percent_of(taxable_amount, rate)?);

    Ok(TdsOutput {
        section,
        nature: section.nature().to_string(),
        threshold,
        rate,
        tds_applicable,
        taxable_amount,
        tds_amount,
        net_payable: input.amount - tds_amount,
    })
}
