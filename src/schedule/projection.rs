use tracing::debug;

use crate::config::EngineConfig;
use crate::credit::Credit;
use crate::decimal::Money;
use crate::errors::Result;
use crate::rates::{annuity_payment, monthly_effective_rate, period_interest};
use crate::types::{ExtraPayment, InstallmentStatus};

use super::{due_date, Installment, LoanSchedule};

/// What-if schedule with planned extra principal contributions.
///
/// Runs on the computed annuity payment and keeps the payment fixed, so every
/// contribution shortens the loan. The result stops once the balance is
/// retired and may hold fewer installments than the contracted term.
pub fn project_with_extra_payments(
    credit: &Credit,
    extras: &[ExtraPayment],
    config: &EngineConfig,
) -> Result<LoanSchedule> {
    credit.validate()?;
    config.validate()?;

    let payment = annuity_payment(credit.principal, credit.annual_rate, credit.term_months)?;
    let monthly_rate = monthly_effective_rate(credit.annual_rate);
    let horizon = config.projection_horizon(credit.term_months);

    let mut balance = credit.principal;
    let mut installments = Vec::new();
    let mut month = 1;

    while balance > config.payoff_tolerance && month <= horizon {
        let interest = period_interest(balance, monthly_rate);
        let extra = extras
            .iter()
            .find(|e| e.payment_number == month)
            .map(|e| e.amount.floor_zero())
            .unwrap_or(Money::ZERO);

        let principal = (payment - interest + extra).floor_zero().min(balance);
        let contribution = extra.min(principal);
        balance = (balance - principal).floor_zero();

        installments.push(Installment {
            payment_number: month,
            expiration_date: due_date(credit.start_date, month),
            installment_amount: (interest + principal + credit.insurance).round2(),
            interest,
            capital: (principal - contribution).round2(),
            balance: balance.round2(),
            status: InstallmentStatus::Pending,
            capital_contribution: Some(contribution).filter(|c| c.is_positive()),
        });

        month += 1;
    }

    debug!(
        credit_id = %credit.id,
        installments = installments.len(),
        remaining = %balance,
        "projected schedule with extra payments"
    );

    Ok(LoanSchedule::from_installments(installments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    use crate::decimal::Rate;

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn credit() -> Credit {
        Credit::builder()
            .principal(Money::from_major(24_000_000))
            .annual_rate(Rate::from_percentage(dec!(18)))
            .term_months(24)
            .insurance(Money::from_major(25_000))
            .build(&time())
            .unwrap()
    }

    #[test]
    fn test_without_extras_runs_full_term() {
        let credit = credit();
        let schedule = project_with_extra_payments(&credit, &[], &EngineConfig::default()).unwrap();

        assert_eq!(schedule.len(), 24);
        assert_eq!(schedule.total_paid, Money::ZERO);
        assert!(schedule.installments.iter().all(|i| i.capital_contribution.is_none()));
        assert!(schedule.installments.last().unwrap().balance <= Money::from_major(1));
    }

    #[test]
    fn test_extra_payment_shortens_loan() {
        let credit = credit();
        let config = EngineConfig::default();
        let base = project_with_extra_payments(&credit, &[], &config).unwrap();

        let extras = [ExtraPayment::new(3, Money::from_major(6_000_000))];
        let projected = project_with_extra_payments(&credit, &extras, &config).unwrap();

        assert!(projected.len() < base.len());
        assert!(projected.total_interest < base.total_interest);

        let third = projected.get(3).unwrap();
        assert_eq!(third.capital_contribution, Some(Money::from_major(6_000_000)));
        assert_eq!(third.capital, base.get(3).unwrap().capital);
        assert_eq!(
            third.installment_amount,
            (third.interest + third.capital + Money::from_major(6_000_000) + credit.insurance).round2()
        );
    }

    #[test]
    fn test_contribution_capped_at_balance() {
        let credit = credit();
        let extras = [ExtraPayment::new(1, Money::from_major(50_000_000))];
        let projected =
            project_with_extra_payments(&credit, &extras, &EngineConfig::default()).unwrap();

        assert_eq!(projected.len(), 1);
        let only = projected.get(1).unwrap();
        assert_eq!(only.balance, Money::ZERO);
        assert_eq!(only.capital + only.capital_contribution.unwrap(), credit.principal);
    }

    #[test]
    fn test_due_dates_follow_credit_start() {
        let start = Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap();
        let credit = Credit::builder()
            .principal(Money::from_major(6_000_000))
            .annual_rate(Rate::from_percentage(dec!(18)))
            .term_months(6)
            .start_date(start)
            .build(&time())
            .unwrap();

        let projected = project_with_extra_payments(&credit, &[], &EngineConfig::default()).unwrap();

        assert_eq!(projected.len(), 6);
        for installment in &projected.installments {
            assert_eq!(installment.expiration_date, due_date(start, installment.payment_number));
        }
        assert_eq!(
            projected.get(1).unwrap().expiration_date,
            Utc.with_ymd_and_hms(2023, 2, 28, 0, 0, 0).unwrap()
        );
    }
}
