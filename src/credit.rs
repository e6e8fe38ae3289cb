use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{CreditId, PaymentId};

/// a registered credit, as delivered by the external credit store
///
/// Wire names follow the store's payload. `expirationDate` is the
/// disbursement date the schedule counts from, not an expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub id: CreditId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "totalLoan")]
    pub principal: Money,
    #[serde(rename = "annualInterestRate", with = "percentage")]
    pub annual_rate: Rate,
    pub term_months: u32,
    /// monthly life insurance premium, constant over the loan's life
    #[serde(rename = "lifeInsurance", default)]
    pub insurance: Money,
    #[serde(rename = "expirationDate")]
    pub start_date: DateTime<Utc>,
    /// fixed installment quoted by the servicing bank, insurance included
    #[serde(rename = "paymentAmount", default, skip_serializing_if = "Option::is_none")]
    pub installment_amount: Option<Money>,
}

impl Credit {
    pub fn builder() -> CreditBuilder {
        CreditBuilder::new()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let credit: Credit = serde_json::from_str(json)?;
        credit.validate()?;
        Ok(credit)
    }

    /// bank-quoted installment, a zero quote counts as absent
    pub fn external_installment(&self) -> Option<Money> {
        self.installment_amount.filter(|amount| !amount.is_zero())
    }

    pub fn validate(&self) -> Result<()> {
        validate_terms(
            self.principal,
            self.annual_rate,
            self.term_months,
            self.insurance,
            self.installment_amount,
        )
    }
}

/// shared guard for loan terms
pub(crate) fn validate_terms(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    insurance: Money,
    installment_amount: Option<Money>,
) -> Result<()> {
    if !principal.is_positive() {
        return Err(LoanError::invalid_input(
            "principal",
            format!("must be positive, got {}", principal),
        ));
    }

    if term_months == 0 {
        return Err(LoanError::invalid_input("term_months", "term must be at least one month"));
    }

    if annual_rate.is_negative() {
        return Err(LoanError::invalid_input(
            "annual_rate",
            format!("must not be negative, got {}", annual_rate),
        ));
    }

    if insurance.is_negative() {
        return Err(LoanError::invalid_input(
            "insurance",
            format!("must not be negative, got {}", insurance),
        ));
    }

    if let Some(amount) = installment_amount {
        if amount.is_negative() {
            return Err(LoanError::invalid_input(
                "installment_amount",
                format!("must not be negative, got {}", amount),
            ));
        }
    }

    Ok(())
}

/// a payment recorded against a credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub credit_id: CreditId,
    pub payment_date: DateTime<Utc>,
    pub amount_paid: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Payment {
    pub fn new(credit_id: CreditId, payment_date: DateTime<Utc>, amount_paid: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            credit_id,
            payment_date,
            amount_paid,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// builder for credits
#[derive(Debug, Default)]
pub struct CreditBuilder {
    id: Option<CreditId>,
    description: Option<String>,
    principal: Option<Money>,
    annual_rate: Option<Rate>,
    term_months: Option<u32>,
    insurance: Option<Money>,
    start_date: Option<DateTime<Utc>>,
    installment_amount: Option<Money>,
}

impl CreditBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: CreditId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn annual_rate(mut self, rate: Rate) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn insurance(mut self, insurance: Money) -> Self {
        self.insurance = Some(insurance);
        self
    }

    pub fn start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn installment_amount(mut self, amount: Money) -> Self {
        self.installment_amount = Some(amount);
        self
    }

    /// build, taking the start date from `time_provider` when none was given
    pub fn build(self, time_provider: &SafeTimeProvider) -> Result<Credit> {
        let principal = self.principal.ok_or(LoanError::InvalidConfiguration {
            message: "Principal required".to_string(),
        })?;

        let annual_rate = self.annual_rate.ok_or(LoanError::InvalidConfiguration {
            message: "Rate required".to_string(),
        })?;

        let term_months = self.term_months.ok_or(LoanError::InvalidConfiguration {
            message: "Term required".to_string(),
        })?;

        let credit = Credit {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            description: self.description,
            principal,
            annual_rate,
            term_months,
            insurance: self.insurance.unwrap_or(Money::ZERO),
            start_date: self.start_date.unwrap_or_else(|| time_provider.now()),
            installment_amount: self.installment_amount,
        };

        credit.validate()?;
        Ok(credit)
    }
}

/// annual rates travel as percentages (24 for 24% EA)
mod percentage {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::decimal::Rate;

    pub fn serialize<S: Serializer>(rate: &Rate, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&rate.as_percentage().normalize(), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rate, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Rate::from_percentage)
    }
}
