//! Rate conversion and the annuity formula.
//!
//! Every component goes through these functions; neither formula is
//! re-derived anywhere else in the crate.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// Converts an effective annual rate to the equivalent effective monthly rate.
///
/// `monthly = (1 + annual)^(1/12) - 1`. A zero annual rate yields a zero
/// monthly rate.
pub fn monthly_effective_rate(annual_rate: Rate) -> Rate {
    if annual_rate.is_zero() {
        return Rate::ZERO;
    }

    let base = Decimal::ONE + annual_rate.as_decimal();
    Rate::from_decimal(base.powd(Decimal::ONE / dec!(12)) - Decimal::ONE)
}

/// Fixed capital+interest payment of a french amortization, insurance excluded.
///
/// `P * r * (1+r)^n / ((1+r)^n - 1)` rounded to whole currency units, or the
/// plain `P / n` split for interest-free loans.
pub fn annuity_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
    if term_months == 0 {
        return Err(LoanError::invalid_input("term_months", "term must be at least one month"));
    }

    if annual_rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let r = monthly_effective_rate(annual_rate).as_decimal();
    let factor = (Decimal::ONE + r)
        .checked_powu(term_months as u64)
        .ok_or_else(|| LoanError::CalculationError {
            message: format!("compound factor overflow for {} months", term_months),
        })?;

    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LoanError::CalculationError {
            message: format!("monthly rate {} too small to amortize", r),
        });
    }

    let exact = principal.as_decimal() * r * factor / denominator;
    Ok(Money::from_decimal(exact).round_units())
}

/// Interest accrued on `balance` over one month, rounded to cents.
pub(crate) fn period_interest(balance: Money, monthly_rate: Rate) -> Money {
    Money::round2_of(balance.as_decimal() * monthly_rate.as_decimal())
}

/// Projected amount needed to settle `balance` at the next due date:
/// capital plus one month of interest plus insurance. Zero once nothing is owed.
pub(crate) fn projected_payoff(balance: Money, monthly_rate: Rate, insurance: Money) -> Money {
    if !balance.is_positive() {
        return Money::ZERO;
    }

    let b = balance.as_decimal();
    Money::round2_of(b + b * monthly_rate.as_decimal() + insurance.as_decimal())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_rate_compounds_back_to_annual() {
        for pct in [dec!(0.5), dec!(12), dec!(15.5), dec!(24), dec!(36.9)] {
            let annual = Rate::from_percentage(pct);
            let monthly = monthly_effective_rate(annual);

            let compounded = (Decimal::ONE + monthly.as_decimal()).powu(12);
            let expected = Decimal::ONE + annual.as_decimal();
            assert!((compounded - expected).abs() < dec!(0.00000001), "{} -> {}", pct, compounded);
        }
    }

    #[test]
    fn test_monthly_rate_is_geometric_not_linear() {
        let monthly = monthly_effective_rate(Rate::from_percentage(dec!(24)));
        // 24% EA is ~1.8088% EM, well below the naive 2%
        assert!(monthly.as_decimal() > dec!(0.01808));
        assert!(monthly.as_decimal() < dec!(0.01809));
    }

    #[test]
    fn test_zero_rate() {
        assert_eq!(monthly_effective_rate(Rate::ZERO), Rate::ZERO);

        let payment = annuity_payment(Money::from_major(1_000), Rate::ZERO, 3).unwrap();
        assert_eq!(payment, Money::from_decimal(dec!(333.33333333)));
    }

    #[test]
    fn test_annuity_payment() {
        let payment = annuity_payment(
            Money::from_major(12_000_000),
            Rate::from_percentage(dec!(24)),
            12,
        )
        .unwrap();

        // whole units only
        assert_eq!(payment, payment.round_units());
        assert!(payment > Money::from_major(1_120_000));
        assert!(payment < Money::from_major(1_125_000));
    }

    #[test]
    fn test_annuity_rejects_zero_term() {
        let err = annuity_payment(Money::from_major(1_000), Rate::from_percentage(dec!(10)), 0);
        assert!(matches!(err, Err(LoanError::InvalidInput { field: "term_months", .. })));
    }

    #[test]
    fn test_projected_payoff() {
        let monthly = Rate::from_decimal(dec!(0.01));
        assert_eq!(
            projected_payoff(Money::from_major(1_000), monthly, Money::from_major(5)),
            Money::from_major(1_015)
        );
        assert_eq!(projected_payoff(Money::ZERO, monthly, Money::from_major(5)), Money::ZERO);
    }
}
