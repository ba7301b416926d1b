//! Loan EMI (equated monthly instalment) with amortization schedule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{
    add, div, ensure_count, ensure_positive, ensure_range, growth_factor, monthly_rate, mul,
    round_money,
};

/// Loan parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiInput {
    /// Loan amount.
    pub principal: Decimal,
    /// Annual interest rate in percent.
    pub annual_rate: Decimal,
    /// Loan tenure in months.
    pub tenure_months: u32,
}

/// One month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based month number.
    pub month: u32,
    /// Amount paid this month.
    pub payment: Decimal,
    /// Principal component.
    pub principal: Decimal,
    /// Interest component.
    pub interest: Decimal,
    /// Outstanding balance after the payment.
    pub balance: Decimal,
}

/// EMI result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiOutput {
    /// Monthly instalment.
    pub emi: Decimal,
    /// Sum of interest components.
    pub total_interest: Decimal,
    /// Sum of all payments.
    pub total_payment: Decimal,
    /// Month-by-month schedule.
    pub schedule: Vec<AmortizationRow>,
}

/// Calculates the EMI and amortization schedule.
///
/// The last row pays off whatever balance remains, so principal components
/// always sum to the loan amount.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs and `Overflow` if the
/// compound factor leaves the decimal range.
pub fn calculate(input: &EmiInput) -> Result<EmiOutput, CalculatorError> {
    ensure_positive("principal", input.principal, Decimal::from(1_000_000_000_000_i64))?;
    ensure_range(
        "annual_rate",
        input.annual_rate,
        Decimal::ZERO,
        Decimal::from(50),
    )?;
    ensure_count("tenure_months", input.tenure_months, 1, 600)?;

    let principal = input.principal;
    let months = Decimal::from(input.tenure_months);
    let rate = monthly_rate(input.annual_rate);

    let emi = if rate.is_zero() {
        round_money(principal / months)
    } else {
        let factor = growth_factor(rate, u64::from(input.tenure_months))?;
        let numerator = mul(mul(principal, rate)?, factor)?;
        round_money(div(numerator, factor - Decimal::ONE)?)
    };

    let mut schedule = Vec::with_capacity(input.tenure_months as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_payment = Decimal::ZERO;

    for month in 1..=input.tenure_months {
        let interest = round_money(mul(balance, rate)?);
        let mut principal_part = (emi - interest).max(Decimal::ZERO);
        if month == input.tenure_months || principal_part >= balance {
            principal_part = balance;
        }

        let payment = interest + principal_part;
        balance -= principal_part;
        total_interest = add(total_interest, interest)?;
        total_payment = add(total_payment, payment)?;

        schedule.push(AmortizationRow {
            month,
            payment,
            principal: principal_part,
            interest,
            balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    Ok(EmiOutput {
        emi,
        total_interest,
        total_payment,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn input(principal: Decimal, annual_rate: Decimal, tenure_months: u32) -> EmiInput {
        EmiInput {
            principal,
            annual_rate,
            tenure_months,
        }
    }

    #[test]
    fn test_standard_home_loan() {
        // 10 lakh at 10% for 10 years
        let out = calculate(&input(dec!(1000000), dec!(10), 120)).unwrap();
        assert_eq!(out.emi, dec!(13215.07));
        assert_eq!(out.schedule.len(), 120);
        assert_eq!(out.total_payment, dec!(1000000) + out.total_interest);
        assert_eq!(out.schedule.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_first_month_split() {
        let out = calculate(&input(dec!(100000), dec!(12), 12)).unwrap();
        let first = &out.schedule[0];
        assert_eq!(first.interest, dec!(1000.00));
        assert_eq!(first.principal, out.emi - dec!(1000.00));
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        let out = calculate(&input(dec!(1200), Decimal::ZERO, 12)).unwrap();
        assert_eq!(out.emi, dec!(100));
        assert_eq!(out.total_interest, Decimal::ZERO);
        assert_eq!(out.total_payment, dec!(1200));
    }

    #[test]
    fn test_zero_rate_uneven_last_payment() {
        let out = calculate(&input(dec!(1000), Decimal::ZERO, 3)).unwrap();
        assert_eq!(out.emi, dec!(333.33));
        assert_eq!(out.schedule[2].payment, dec!(333.34));
        assert_eq!(out.total_payment, dec!(1000));
    }

    #[test]
    fn test_principal_components_sum_to_loan() {
        let out = calculate(&input(dec!(750000), dec!(8.5), 240)).unwrap();
        let repaid: Decimal = out.schedule.iter().map(|r| r.principal).sum();
        assert_eq!(repaid, dec!(750000));
    }

    #[rstest]
    #[case(dec!(0), dec!(10), 12, "principal")]
    #[case(dec!(-5), dec!(10), 12, "principal")]
    #[case(dec!(1000), dec!(51), 12, "annual_rate")]
    #[case(dec!(1000), dec!(-1), 12, "annual_rate")]
    #[case(dec!(1000), dec!(10), 0, "tenure_months")]
    #[case(dec!(1000), dec!(10), 601, "tenure_months")]
    fn test_rejects_invalid_input(
        #[case] principal: Decimal,
        #[case] rate: Decimal,
        #[case] months: u32,
        #[case] expected_field: &str,
    ) {
        match calculate(&input(principal, rate, months)) {
            Err(CalculatorError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }
}
