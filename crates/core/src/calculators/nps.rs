//! National Pension System corpus and pension estimate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CalculatorError;
use super::math::{
    div, ensure_count, ensure_positive, ensure_range, mul, percent_of, round_money,
};
use super::sip::accumulate;

/// NPS parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpsInput {
    /// Contribution made every month.
    pub monthly_contribution: Decimal,
    /// Subscriber's age today.
    pub current_age: u32,
    /// Age at which contributions stop.
    #[serde(default = "default_retirement_age")]
    pub retirement_age: u32,
    /// Expected annual return on the corpus in percent.
    pub expected_return: Decimal,
    /// Share of the corpus used to buy an annuity, in percent.
    #[serde(default = "default_annuity_percent")]
    pub annuity_percent: Decimal,
    /// Annual annuity rate in percent.
    #[serde(default = "default_annuity_rate")]
    pub annuity_rate: Decimal,
}

fn default_retirement_age() -> u32 {
    60
}

fn default_annuity_percent() -> Decimal {
    Decimal::from(40)
}

fn default_annuity_rate() -> Decimal {
    Decimal::from(6)
}

/// NPS result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpsOutput {
    /// Number of contribution years.
    pub years: u32,
    /// Sum of contributions.
    pub total_invested: Decimal,
    /// Growth over contributions.
    pub interest_earned: Decimal,
    /// Corpus at retirement.
    pub total_corpus: Decimal,
    /// Amount withdrawn as a lump sum.
    pub lump_sum_withdrawal: Decimal,
    /// Amount used to buy the annuity.
    pub annuity_investment: Decimal,
    /// Estimated monthly pension from the annuity.
    pub monthly_pension: Decimal,
}

/// Estimates the NPS corpus and pension.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs.
pub fn calculate(input: &NpsInput) -> Result<NpsOutput, CalculatorError> {
    ensure_positive(
        "monthly_contribution",
        input.monthly_contribution,
        Decimal::from(10_000_000),
    )?;
    ensure_count("current_age", input.current_age, 18, 70)?;
    if input.retirement_age <= input.current_age {
        return Err(CalculatorError::invalid(
            "retirement_age",
            "must be greater than current_age",
        ));
    }
    ensure_count("retirement_age", input.retirement_age, 19, 75)?;
    ensure_range(
        "expected_return",
        input.expected_return,
        Decimal::ZERO,
        Decimal::from(20),
    )?;
    ensure_range(
        "annuity_percent",
        input.annuity_percent,
        Decimal::from(40),
        Decimal::ONE_HUNDRED,
    )?;
    ensure_range(
        "annuity_rate",
        input.annuity_rate,
        Decimal::ZERO,
        Decimal::from(15),
    )?;

    let years = input.retirement_age - input.current_age;
    let acc = accumulate(
        input.monthly_contribution,
        input.expected_return,
        years,
        Decimal::ZERO,
    )?;

    let corpus = acc.value;
    let lump_sum = round_money(percent_of(
        corpus,
        Decimal::ONE_HUNDRED - input.annuity_percent,
    )?);
    let annuity_investment = corpus - lump_sum;
    let monthly_pension = round_money(div(
        mul(annuity_investment, input.annuity_rate)?,
        Decimal::from(1200),
    )?);

    Ok(NpsOutput {
        years,
        total_invested: acc.invested,
        interest_earned: corpus - acc.invested,
        total_corpus: corpus,
        lump_sum_withdrawal: lump_sum,
        annuity_investment,
        monthly_pension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> NpsInput {
        NpsInput {
            monthly_contribution: dec!(5000),
            current_age: 30,
            retirement_age: 60,
            expected_return: dec!(10),
            annuity_percent: dec!(40),
            annuity_rate: dec!(6),
        }
    }

    #[test]
    fn test_corpus_split() {
        let out = calculate(&input()).unwrap();
        assert_eq!(out.years, 30);
        assert_eq!(out.total_invested, dec!(1800000));
        assert_eq!(
            out.lump_sum_withdrawal + out.annuity_investment,
            out.total_corpus
        );
        assert_eq!(
            out.total_invested + out.interest_earned,
            out.total_corpus
        );
        assert_eq!(
            out.monthly_pension,
            round_money(out.annuity_investment * dec!(6) / dec!(1200))
        );
    }

    #[test]
    fn test_full_annuity_has_no_lump_sum() {
        let out = calculate(&NpsInput {
            annuity_percent: dec!(100),
            ..input()
        })
        .unwrap();
        assert_eq!(out.lump_sum_withdrawal, Decimal::ZERO);
        assert_eq!(out.annuity_investment, out.total_corpus);
    }

    #[test]
    fn test_retirement_must_follow_current_age() {
        let err = calculate(&NpsInput {
            current_age: 60,
            retirement_age: 60,
            ..input()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CalculatorError::InvalidInput {
                field: "retirement_age",
                ..
            }
        ));
    }

    #[test]
    fn test_annuity_percent_minimum() {
        assert!(
            calculate(&NpsInput {
                annuity_percent: dec!(39),
                ..input()
            })
            .is_err()
        );
    }

    #[test]
    fn test_defaults_from_json() {
        let parsed: NpsInput = serde_json::from_str(
            r#"{"monthly_contribution":"2000","current_age":25,"expected_return":"9"}"#,
        )
        .unwrap();
        assert_eq!(parsed.retirement_age, 60);
        assert_eq!(parsed.annuity_percent, dec!(40));
        assert_eq!(parsed.annuity_rate, dec!(6));
    }
}
