use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CreditId, PaymentId};

/// decisions taken while reconciling payments against a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// payment covered interest and insurance, installment marked paid
    InstallmentPaid {
        credit_id: CreditId,
        payment_id: PaymentId,
        payment_number: u32,
        amount_paid: Money,
        interest: Money,
        capital: Money,
        capital_contribution: Option<Money>,
        outstanding_principal: Money,
        payment_date: DateTime<Utc>,
    },
    /// payment fell short of interest and insurance, applied to capital only
    PartialPaymentApplied {
        credit_id: CreditId,
        payment_id: PaymentId,
        payment_number: u32,
        amount_paid: Money,
        minimum_required: Money,
        capital_contribution: Money,
        outstanding_principal: Money,
        payment_date: DateTime<Utc>,
    },
    /// payment left the installment untouched (non-positive amount or nothing owed)
    PaymentIgnored {
        credit_id: CreditId,
        payment_id: PaymentId,
        payment_number: u32,
        amount_paid: Money,
    },
    /// more payments than installments, the surplus ones were not matched
    UnmatchedPayments {
        credit_id: CreditId,
        count: usize,
    },
    /// installments after the processed ones were rebuilt from the new balance
    ScheduleRegenerated {
        credit_id: CreditId,
        from_payment_number: u32,
        outstanding_principal: Money,
    },
    /// balance retired before the contracted term
    LoanRetiredEarly {
        credit_id: CreditId,
        last_payment_number: u32,
        placeholder_count: u32,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
