pub mod generator;
pub mod projection;
pub mod reconcile;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::InstallmentStatus;

pub use generator::{generate_from_credit, ScheduleGenerator};
pub use projection::project_with_extra_payments;
pub use reconcile::{reconcile, PaymentReconciler};

/// one period of an amortization schedule
///
/// `payment_number` is the key; installments are rebuilt on every
/// reconciliation and carry no other identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub payment_number: u32,
    /// due date
    pub expiration_date: DateTime<Utc>,
    /// capital + interest + insurance owed for the period
    pub installment_amount: Money,
    pub interest: Money,
    pub capital: Money,
    /// payoff figure: capital still owed plus the next period's interest and
    /// insurance. The final baseline row holds its own payoff instead, and
    /// paid rows hold zero.
    pub balance: Money,
    pub status: InstallmentStatus,
    /// principal paid beyond the scheduled capital portion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital_contribution: Option<Money>,
}

impl Installment {
    /// zero-valued row keeping a retired loan at its contracted length
    pub fn placeholder(payment_number: u32, expiration_date: DateTime<Utc>) -> Self {
        Self {
            payment_number,
            expiration_date,
            installment_amount: Money::ZERO,
            interest: Money::ZERO,
            capital: Money::ZERO,
            balance: Money::ZERO,
            status: InstallmentStatus::Pending,
            capital_contribution: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status.is_paid()
    }

    pub fn is_placeholder(&self) -> bool {
        self.installment_amount.is_zero() && self.capital.is_zero() && self.interest.is_zero()
    }
}

/// installments plus aggregate totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSchedule {
    pub installments: Vec<Installment>,
    /// interest over every installment
    pub total_interest: Money,
    /// installment amounts of paid installments only
    pub total_paid: Money,
}

impl LoanSchedule {
    /// wrap installments, computing totals the same way for every code path
    pub fn from_installments(installments: Vec<Installment>) -> Self {
        let total_interest = installments
            .iter()
            .map(|i| i.interest)
            .sum::<Money>()
            .round2();

        let total_paid = installments
            .iter()
            .filter(|i| i.is_paid())
            .map(|i| i.installment_amount)
            .sum::<Money>()
            .round2();

        Self {
            installments,
            total_interest,
            total_paid,
        }
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    /// get installment by its 1-based number
    pub fn get(&self, payment_number: u32) -> Option<&Installment> {
        payment_number
            .checked_sub(1)
            .and_then(|idx| self.installments.get(idx as usize))
    }

    /// sum of every installment amount, paid or not
    pub fn total_scheduled(&self) -> Money {
        self.installments
            .iter()
            .map(|i| i.installment_amount)
            .sum::<Money>()
            .round2()
    }

    pub fn total_capital(&self) -> Money {
        self.installments.iter().map(|i| i.capital).sum()
    }

    pub fn total_capital_contributions(&self) -> Money {
        self.installments
            .iter()
            .filter_map(|i| i.capital_contribution)
            .sum()
    }

    pub fn paid_count(&self) -> usize {
        self.installments.iter().filter(|i| i.is_paid()).count()
    }

    /// first installment not yet paid
    pub fn next_due(&self) -> Option<&Installment> {
        self.installments.iter().find(|i| !i.is_paid() && !i.is_placeholder())
    }
}

/// due date `months` calendar months after `start`
///
/// Month ends clamp (Jan 31 + 1 month is the last day of February); dates past
/// chrono's range saturate.
pub fn due_date(start: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    start
        .checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
