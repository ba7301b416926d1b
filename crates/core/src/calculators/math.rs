//! Shared decimal helpers for the calculators.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

use super::error::CalculatorError;

/// Rounds a money amount to 2 decimal places, half away from zero.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `amount * percent / 100`, unrounded.
pub(crate) fn percent_of(amount: Decimal, percent: Decimal) -> Result<Decimal, CalculatorError> {
    Ok(mul(amount, percent)? / Decimal::ONE_HUNDRED)
}

pub(crate) fn mul(a: Decimal, b: Decimal) -> Result<Decimal, CalculatorError> {
    a.checked_mul(b).ok_or(CalculatorError::Overflow)
}

pub(crate) fn add(a: Decimal, b: Decimal) -> Result<Decimal, CalculatorError> {
    a.checked_add(b).ok_or(CalculatorError::Overflow)
}

pub(crate) fn div(a: Decimal, b: Decimal) -> Result<Decimal, CalculatorError> {
    a.checked_div(b).ok_or(CalculatorError::Overflow)
}

/// `(1 + rate)^periods`.
pub(crate) fn growth_factor(rate: Decimal, periods: u64) -> Result<Decimal, CalculatorError> {
    (Decimal::ONE + rate)
        .checked_powu(periods)
        .ok_or(CalculatorError::Overflow)
}

/// Converts an annual percentage into a monthly fraction.
pub(crate) fn monthly_rate(annual_percent: Decimal) -> Decimal {
    annual_percent / Decimal::from(1200)
}

/// Checks `min <= value <= max`.
pub(crate) fn ensure_range(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), CalculatorError> {
    if value < min || value > max {
        return Err(CalculatorError::invalid(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

/// Checks `0 < value <= max`.
pub(crate) fn ensure_positive(
    field: &'static str,
    value: Decimal,
    max: Decimal,
) -> Result<(), CalculatorError> {
    if value <= Decimal::ZERO {
        return Err(CalculatorError::invalid(field, "must be greater than 0"));
    }
    if value > max {
        return Err(CalculatorError::invalid(
            field,
            format!("must not exceed {max}"),
        ));
    }
    Ok(())
}

/// Largest money amount any calculator accepts.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Checks `0 <= value <= MAX_AMOUNT`.
pub(crate) fn ensure_amount(field: &'static str, value: Decimal) -> Result<(), CalculatorError> {
    if value < Decimal::ZERO {
        return Err(CalculatorError::invalid(field, "must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(CalculatorError::invalid(
            field,
            format!("must not exceed {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

/// Integer variant of [`ensure_range`].
pub(crate) fn ensure_count(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), CalculatorError> {
    if value < min || value > max {
        return Err(CalculatorError::invalid(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_money(dec!(2.5)), dec!(2.5));
    }

    #[test]
    fn test_growth_factor() {
        assert_eq!(growth_factor(dec!(0.1), 2).unwrap(), dec!(1.21));
        assert_eq!(growth_factor(Decimal::ZERO, 600).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_ensure_range() {
        assert!(ensure_range("rate", dec!(5), dec!(0), dec!(50)).is_ok());
        assert!(ensure_range("rate", dec!(50.01), dec!(0), dec!(50)).is_err());
        assert!(ensure_range("rate", dec!(-0.01), dec!(0), dec!(50)).is_err());
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("amount", dec!(0.01), dec!(10)).is_ok());
        assert_eq!(
            ensure_positive("amount", Decimal::ZERO, dec!(10)),
            Err(CalculatorError::invalid("amount", "must be greater than 0"))
        );
        assert!(ensure_positive("amount", dec!(11), dec!(10)).is_err());
    }

    #[test]
    fn test_ensure_amount() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
        assert!(ensure_amount("rent_paid", Decimal::ZERO).is_ok());
        assert!(ensure_amount("rent_paid", MAX_AMOUNT).is_ok());
        assert!(ensure_amount("rent_paid", dec!(-1)).is_err());
        assert!(ensure_amount("rent_paid", Decimal::MAX).is_err());
    }
}
