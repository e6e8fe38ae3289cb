use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::debug;

use crate::credit::{validate_terms, Credit};
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::rates::{annuity_payment, monthly_effective_rate, period_interest};
use crate::types::InstallmentStatus;

use super::{due_date, Installment, LoanSchedule};

/// builds the baseline french amortization table for a set of loan terms
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleGenerator {
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    insurance: Money,
    installment_amount: Option<Money>,
    start_date: Option<DateTime<Utc>>,
}

impl ScheduleGenerator {
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            insurance: Money::ZERO,
            installment_amount: None,
            start_date: None,
        }
    }

    /// generator for a stored credit, using its bank installment and start date
    pub fn from_credit(credit: &Credit) -> Self {
        Self {
            principal: credit.principal,
            annual_rate: credit.annual_rate,
            term_months: credit.term_months,
            insurance: credit.insurance,
            installment_amount: credit.external_installment(),
            start_date: Some(credit.start_date),
        }
    }

    /// monthly insurance premium added to every installment
    pub fn insurance(mut self, insurance: Money) -> Self {
        self.insurance = insurance;
        self
    }

    /// fixed installment quoted by the bank, insurance included
    pub fn installment_amount(mut self, amount: Money) -> Self {
        self.installment_amount = Some(amount).filter(|a| !a.is_zero());
        self
    }

    pub fn start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    /// capital+interest part of every regular installment
    fn base_payment(&self) -> Result<Money> {
        match self.installment_amount {
            Some(amount) => Ok(amount - self.insurance),
            None => annuity_payment(self.principal, self.annual_rate, self.term_months),
        }
    }

    /// generate installments 1..=term_months, all pending
    ///
    /// Interest and capital are rounded to cents period by period. The last
    /// row takes whatever capital is left so the balance lands on zero.
    pub fn generate(&self, time_provider: &SafeTimeProvider) -> Result<Vec<Installment>> {
        validate_terms(
            self.principal,
            self.annual_rate,
            self.term_months,
            self.insurance,
            self.installment_amount,
        )?;

        let monthly_rate = monthly_effective_rate(self.annual_rate);
        let base_payment = self.base_payment()?;
        let start = self.start_date.unwrap_or_else(|| time_provider.now());

        debug!(
            principal = %self.principal,
            monthly_rate = %monthly_rate.as_decimal(),
            base_payment = %base_payment,
            term_months = self.term_months,
            "generating amortization schedule"
        );

        let mut remaining = self.principal;
        let mut installments = Vec::with_capacity(self.term_months as usize);

        for month in 1..=self.term_months {
            let interest = period_interest(remaining, monthly_rate);
            let expiration_date = due_date(start, month);

            let installment = if month == self.term_months {
                let capital = remaining.round2();
                let payoff = capital + interest + self.insurance;
                let installment_amount = self.installment_amount.unwrap_or(payoff);
                remaining = Money::ZERO;

                Installment {
                    payment_number: month,
                    expiration_date,
                    installment_amount: installment_amount.round2(),
                    interest,
                    capital,
                    balance: payoff.round2(),
                    status: InstallmentStatus::Pending,
                    capital_contribution: None,
                }
            } else {
                let capital = (base_payment - interest).round2();
                let debt_balance = (remaining + interest + self.insurance).round2();
                remaining = (remaining - capital).round2();

                Installment {
                    payment_number: month,
                    expiration_date,
                    installment_amount: (base_payment + self.insurance).round2(),
                    interest,
                    capital,
                    balance: debt_balance,
                    status: InstallmentStatus::Pending,
                    capital_contribution: None,
                }
            };

            installments.push(installment);
        }

        debug_assert!(remaining.is_zero());
        Ok(installments)
    }
}

/// baseline schedule for a stored credit, totals included
pub fn generate_from_credit(credit: &Credit, time_provider: &SafeTimeProvider) -> Result<LoanSchedule> {
    let installments = ScheduleGenerator::from_credit(credit).generate(time_provider)?;
    Ok(LoanSchedule::from_installments(installments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::errors::LoanError;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(start()))
    }

    fn bank_schedule() -> Vec<Installment> {
        ScheduleGenerator::new(Money::from_major(12_000_000), Rate::from_percentage(dec!(24)), 12)
            .installment_amount(Money::from_major(1_130_000))
            .start_date(start())
            .generate(&time())
            .unwrap()
    }

    #[test]
    fn test_first_installment_with_bank_amount() {
        let schedule = bank_schedule();
        let monthly_rate = monthly_effective_rate(Rate::from_percentage(dec!(24)));

        let first = &schedule[0];
        let expected_interest = Money::round2_of(dec!(12_000_000) * monthly_rate.as_decimal());
        assert_eq!(first.payment_number, 1);
        assert_eq!(first.interest, expected_interest);
        assert_eq!(first.capital, (Money::from_major(1_130_000) - expected_interest).round2());
        assert_eq!(first.installment_amount, Money::from_major(1_130_000));
        assert_eq!(first.balance, (Money::from_major(12_000_000) + expected_interest).round2());
        assert_eq!(first.status, InstallmentStatus::Pending);
    }

    #[test]
    fn test_capital_sums_to_principal() {
        let schedule = bank_schedule();
        assert_eq!(schedule.len(), 12);

        let total_capital: Money = schedule.iter().map(|i| i.capital).sum();
        assert_eq!(total_capital, Money::from_major(12_000_000));
    }

    #[test]
    fn test_final_installment_absorbs_rounding() {
        let schedule = bank_schedule();
        let last = &schedule[11];

        // bank amount is kept even though capital was forced to the residual
        assert_eq!(last.installment_amount, Money::from_major(1_130_000));
        assert_eq!(last.balance, (last.capital + last.interest).round2());
        assert_ne!(last.capital, schedule[10].capital);
    }

    #[test]
    fn test_numbering_and_due_dates() {
        let schedule = bank_schedule();
        for (idx, installment) in schedule.iter().enumerate() {
            assert_eq!(installment.payment_number, idx as u32 + 1);
        }
        assert_eq!(schedule[0].expiration_date, Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap());
        assert_eq!(schedule[11].expiration_date, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_computed_payment_without_bank_amount() {
        let insurance = Money::from_major(20_000);
        let schedule = ScheduleGenerator::new(Money::from_major(12_000_000), Rate::from_percentage(dec!(24)), 12)
            .insurance(insurance)
            .generate(&time())
            .unwrap();

        let base = annuity_payment(Money::from_major(12_000_000), Rate::from_percentage(dec!(24)), 12).unwrap();
        for installment in &schedule[..11] {
            assert_eq!(installment.installment_amount, base + insurance);
        }

        let last = &schedule[11];
        assert_eq!(last.installment_amount, (last.capital + last.interest + insurance).round2());
        assert_eq!(last.balance, last.installment_amount);

        // start date defaults to the provider's clock
        assert_eq!(schedule[0].expiration_date, Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_insurance_is_part_of_debt_balance() {
        let insurance = Money::from_major(15_000);
        let schedule = ScheduleGenerator::new(Money::from_major(12_000_000), Rate::from_percentage(dec!(24)), 12)
            .insurance(insurance)
            .installment_amount(Money::from_major(1_145_000))
            .start_date(start())
            .generate(&time())
            .unwrap();

        let first = &schedule[0];
        assert_eq!(first.balance, (Money::from_major(12_000_000) + first.interest + insurance).round2());
        assert_eq!(first.capital, (Money::from_major(1_130_000) - first.interest).round2());
    }

    #[test]
    fn test_zero_rate_splits_capital_evenly() {
        let schedule = ScheduleGenerator::new(Money::from_major(1_000), Rate::ZERO, 3)
            .start_date(start())
            .generate(&time())
            .unwrap();

        for installment in &schedule {
            assert_eq!(installment.interest, Money::ZERO);
        }
        assert_eq!(schedule[0].capital, Money::from_decimal(dec!(333.33)));
        assert_eq!(schedule[1].capital, Money::from_decimal(dec!(333.33)));
        assert_eq!(schedule[2].capital, Money::from_decimal(dec!(333.34)));

        let total: Decimal = schedule.iter().map(|i| i.capital.as_decimal()).sum();
        assert_eq!(total, dec!(1000));
    }

    #[test]
    fn test_single_month_term() {
        let schedule = ScheduleGenerator::new(Money::from_major(500_000), Rate::from_percentage(dec!(12)), 1)
            .start_date(start())
            .generate(&time())
            .unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].capital, Money::from_major(500_000));
        assert_eq!(schedule[0].installment_amount, schedule[0].balance);
    }

    #[test]
    fn test_rejects_invalid_terms() {
        let err = ScheduleGenerator::new(Money::from_major(1_000), Rate::from_percentage(dec!(10)), 0)
            .generate(&time());
        assert!(matches!(err, Err(LoanError::InvalidInput { field: "term_months", .. })));

        let err = ScheduleGenerator::new(Money::from_major(-1), Rate::from_percentage(dec!(10)), 12)
            .generate(&time());
        assert!(matches!(err, Err(LoanError::InvalidInput { field: "principal", .. })));

        let err = ScheduleGenerator::new(Money::from_major(1_000), Rate::from_percentage(dec!(10)), 12)
            .insurance(Money::from_major(-1))
            .generate(&time());
        assert!(matches!(err, Err(LoanError::InvalidInput { field: "insurance", .. })));
    }

    #[test]
    fn test_generate_from_credit_totals() {
        let credit = Credit::builder()
            .principal(Money::from_major(12_000_000))
            .annual_rate(Rate::from_percentage(dec!(24)))
            .term_months(12)
            .installment_amount(Money::from_major(1_130_000))
            .start_date(start())
            .build(&time())
            .unwrap();

        let schedule = generate_from_credit(&credit, &time()).unwrap();
        let interest: Money = schedule.installments.iter().map(|i| i.interest).sum();
        assert_eq!(schedule.total_interest, interest.round2());
        assert_eq!(schedule.total_paid, Money::ZERO);
        assert_eq!(schedule.total_scheduled(), Money::from_major(12 * 1_130_000));
    }
}
