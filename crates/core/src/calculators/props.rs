//! Property-based tests for the calculators.
//!
//! - Determinism: the same input always yields the same output
//! - Financial identities hold exactly after rounding

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::emi::{self, EmiInput};
use super::gst::{self, GstInput, GstMode, SupplyType};
use super::income_tax::{self, AgeGroup, TaxRegime};
use super::ppf::{self, PpfInput};
use super::sip::{self, SipInput};
use super::tds::{self, PayeeType, TdsInput, TdsSection};

/// Money amounts from 1.00 to 10,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (100i64..1_000_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

/// Percentages with two decimals in `0..=max`.
fn percent(max: i64) -> impl Strategy<Value = Decimal> {
    (0i64..=max * 100).prop_map(|v| Decimal::new(v, 2))
}

fn regime() -> impl Strategy<Value = TaxRegime> {
    prop_oneof![Just(TaxRegime::Old), Just(TaxRegime::New)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Total payment equals principal plus total interest, and the loan is
    /// fully repaid.
    #[test]
    fn prop_emi_identities(
        principal in amount(),
        rate in percent(30),
        months in 1u32..=360,
    ) {
        let input = EmiInput { principal, annual_rate: rate, tenure_months: months };
        let out = emi::calculate(&input).unwrap();

        prop_assert_eq!(out.total_payment, principal + out.total_interest);
        let repaid: Decimal = out.schedule.iter().map(|r| r.principal).sum();
        prop_assert_eq!(repaid, principal);
        prop_assert_eq!(out.schedule.last().map(|r| r.balance), Some(Decimal::ZERO));
        prop_assert!(out.schedule.iter().all(|r| r.balance >= Decimal::ZERO));
    }

    #[test]
    fn prop_emi_deterministic(
        principal in amount(),
        rate in percent(50),
        months in 1u32..=120,
    ) {
        let input = EmiInput { principal, annual_rate: rate, tenure_months: months };
        prop_assert_eq!(emi::calculate(&input), emi::calculate(&input));
    }

    /// Maturity value equals invested amount plus returns.
    #[test]
    fn prop_sip_identity(
        monthly in (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2)),
        rate in percent(30),
        years in 1u32..=40,
        step_up in percent(20),
    ) {
        let out = sip::calculate(&SipInput {
            monthly_investment: monthly,
            annual_return: rate,
            years,
            annual_step_up: step_up,
        }).unwrap();

        prop_assert_eq!(out.maturity_value, out.invested_amount + out.estimated_returns);
        prop_assert!(out.maturity_value >= out.invested_amount);
        prop_assert_eq!(out.yearly.len(), years as usize);
    }

    /// Net plus GST equals gross, and the split adds back up.
    #[test]
    fn prop_gst_identity(
        amount in amount(),
        rate in percent(40),
        inclusive in any::<bool>(),
        intra in any::<bool>(),
    ) {
        let out = gst::calculate(&GstInput {
            amount,
            rate,
            mode: if inclusive { GstMode::Inclusive } else { GstMode::Exclusive },
            supply: if intra { SupplyType::IntraState } else { SupplyType::InterState },
        }).unwrap();

        prop_assert_eq!(out.net_amount + out.gst_amount, out.gross_amount);
        prop_assert_eq!(out.cgst + out.sgst + out.igst, out.gst_amount);
    }

    #[test]
    fn prop_ppf_maturity_identity(
        deposit in (500i64..=150_000i64).prop_map(Decimal::from),
        rate in percent(15),
        extensions in 0u32..=7,
    ) {
        let out = ppf::calculate(&PpfInput {
            yearly_investment: deposit,
            annual_rate: rate,
            years: 15 + extensions * 5,
        }).unwrap();
        prop_assert_eq!(out.maturity_value, out.total_investment + out.total_interest);
    }

    #[test]
    fn prop_tds_never_exceeds_amount(
        amount in amount(),
        section_index in 0usize..8,
        pan in any::<bool>(),
    ) {
        let out = tds::calculate(&TdsInput {
            section: TdsSection::ALL[section_index],
            amount,
            payee_type: PayeeType::Other,
            pan_available: pan,
        }).unwrap();
        prop_assert!(out.tds_amount <= amount);
        prop_assert_eq!(out.net_payable + out.tds_amount, amount);
    }

    /// More taxable income never means less tax.
    #[test]
    fn prop_income_tax_monotonic(
        income in (0i64..50_000_000i64).prop_map(Decimal::from),
        extra in (1i64..1_000_000i64).prop_map(Decimal::from),
        regime in regime(),
    ) {
        let low = income_tax::tax_on_income(income, regime, AgeGroup::Below60).unwrap();
        let high = income_tax::tax_on_income(income + extra, regime, AgeGroup::Below60).unwrap();
        prop_assert!(high.total_tax >= low.total_tax);
        prop_assert!(low.total_tax <= income.max(Decimal::ZERO));
    }
}
