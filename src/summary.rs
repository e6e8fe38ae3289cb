use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::credit::Credit;
use crate::decimal::{Money, Rate};
use crate::rates::monthly_effective_rate;
use crate::schedule::LoanSchedule;

/// headline figures for a credit and its (possibly reconciled) schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub loan_amount: Money,
    pub total_interest: Money,
    pub total_life_insurance: Money,
    pub total_payments: Money,
    /// amount of the first installment, insurance included
    pub monthly_payment: Money,
    /// contracted effective annual rate
    pub effective_rate: Rate,
    /// equivalent effective monthly rate
    pub monthly_rate: Rate,
    /// contracted term, never the schedule length
    pub term_months: u32,
}

impl LoanSummary {
    pub fn calculate(credit: &Credit, schedule: &LoanSchedule) -> Self {
        Self {
            loan_amount: credit.principal,
            total_interest: schedule.total_interest,
            total_life_insurance: credit.insurance * Decimal::from(schedule.len()),
            total_payments: schedule.total_scheduled(),
            monthly_payment: schedule
                .installments
                .first()
                .map(|i| i.installment_amount)
                .unwrap_or(Money::ZERO),
            effective_rate: credit.annual_rate,
            monthly_rate: monthly_effective_rate(credit.annual_rate),
            term_months: credit.term_months,
        }
    }
}

pub fn summarize(credit: &Credit, schedule: &LoanSchedule) -> LoanSummary {
    LoanSummary::calculate(credit, schedule)
}
