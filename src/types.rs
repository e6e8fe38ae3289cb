use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a credit, owned by the external credit store
pub type CreditId = Uuid;

/// unique identifier for a payment, owned by the external payment store
pub type PaymentId = Uuid;

/// installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    /// not yet covered by a payment
    Pending,
    /// covered by a payment at least equal to interest plus insurance
    Paid,
}

impl InstallmentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, InstallmentStatus::Paid)
    }
}

/// extra principal contribution planned for a given installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPayment {
    pub payment_number: u32,
    pub amount: Money,
}

impl ExtraPayment {
    pub fn new(payment_number: u32, amount: Money) -> Self {
        Self {
            payment_number,
            amount,
        }
    }
}
