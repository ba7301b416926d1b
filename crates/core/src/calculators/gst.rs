//! Goods and services tax on a supply.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{div, ensure_positive, ensure_range, mul, percent_of, round_money};

/// Whether the input amount excludes or includes GST.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstMode {
    /// GST is added on top of the amount.
    #[default]
    Exclusive,
    /// The amount already contains GST.
    Inclusive,
}

/// Place of supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Within one state: CGST + SGST.
    #[default]
    IntraState,
    /// Across states: IGST.
    InterState,
}

/// GST parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstInput {
    /// Amount to add GST to or extract GST from.
    pub amount: Decimal,
    /// GST rate in percent.
    pub rate: Decimal,
    /// Exclusive or inclusive amount.
    #[serde(default)]
    pub mode: GstMode,
    /// Place of supply.
    #[serde(default)]
    pub supply: SupplyType,
}

/// GST result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstOutput {
    /// Value of supply before tax.
    pub net_amount: Decimal,
    /// Total GST.
    pub gst_amount: Decimal,
    /// Value of supply including tax.
    pub gross_amount: Decimal,
    /// Central GST share.
    pub cgst: Decimal,
    /// State GST share.
    pub sgst: Decimal,
    /// Integrated GST.
    pub igst: Decimal,
}

/// Calculates GST.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs.
pub fn calculate(input: &GstInput) -> Result<GstOutput, CalculatorError> {
    ensure_positive("amount", input.amount, Decimal::from(1_000_000_000_000_i64))?;
    ensure_range("rate", input.rate, Decimal::ZERO, Decimal::ONE_HUNDRED)?;

    let (net_amount, gst_amount, gross_amount) = match input.mode {
        GstMode::Exclusive => {
            let gst = round_money(percent_of(input.amount, input.rate)?);
            (input.amount, gst, input.amount + gst)
        }
        GstMode::Inclusive => {
            let net = round_money(div(
                mul(input.amount, Decimal::ONE_HUNDRED)?,
                Decimal::ONE_HUNDRED + input.rate,
            )?);
            (net, input.amount - net, input.amount)
        }
    };

    let (cgst, sgst, igst) = match input.supply {
        SupplyType::IntraState => {
            let cgst = round_money(gst_amount / Decimal::from(2));
            (cgst, gst_amount - cgst, Decimal::ZERO)
        }
        SupplyType::InterState => (Decimal::ZERO, Decimal::ZERO, gst_amount),
    };

    Ok(GstOutput {
        net_amount,
        gst_amount,
        gross_amount,
        cgst,
        sgst,
        igst,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(amount: Decimal, rate: Decimal, mode: GstMode, supply: SupplyType) -> GstInput {
        GstInput {
            amount,
            rate,
            mode,
            supply,
        }
    }

    #[test]
    fn test_exclusive_intra_state() {
        let out = calculate(&input(
            dec!(10000),
            dec!(18),
            GstMode::Exclusive,
            SupplyType::IntraState,
        ))
        .unwrap();
        assert_eq!(out.gst_amount, dec!(1800));
        assert_eq!(out.gross_amount, dec!(11800));
        assert_eq!(out.cgst, dec!(900));
        assert_eq!(out.sgst, dec!(900));
        assert_eq!(out.igst, Decimal::ZERO);
    }

    #[test]
    fn test_inclusive_inter_state() {
        let out = calculate(&input(
            dec!(11800),
            dec!(18),
            GstMode::Inclusive,
            SupplyType::InterState,
        ))
        .unwrap();
        assert_eq!(out.net_amount, dec!(10000));
        assert_eq!(out.gst_amount, dec!(1800));
        assert_eq!(out.igst, dec!(1800));
        assert_eq!(out.cgst, Decimal::ZERO);
    }

    #[test]
    fn test_odd_paise_split() {
        let out = calculate(&input(
            dec!(100.10),
            dec!(5),
            GstMode::Exclusive,
            SupplyType::IntraState,
        ))
        .unwrap();
        assert_eq!(out.gst_amount, dec!(5.01));
        assert_eq!(out.cgst + out.sgst, out.gst_amount);
    }

    #[test]
    fn test_zero_rate() {
        let out = calculate(&input(
            dec!(500),
            Decimal::ZERO,
            GstMode::Inclusive,
            SupplyType::IntraState,
        ))
        .unwrap();
        assert_eq!(out.net_amount, dec!(500));
        assert_eq!(out.gst_amount, Decimal::ZERO);
    }
}
