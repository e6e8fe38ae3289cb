/// serializable views handed to the rendering layer
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::credit::{Credit, Payment};
use crate::errors::Result;
use crate::events::EventStore;
use crate::schedule::{generate_from_credit, LoanSchedule, PaymentReconciler};
use crate::summary::LoanSummary;
use crate::types::CreditId;

/// schedule and headline figures of one credit, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub credit_id: CreditId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub summary: LoanSummary,
    pub schedule: LoanSchedule,
}

impl LoanView {
    /// generate, reconcile when payments exist, and summarize
    pub fn build(
        credit: &Credit,
        payments: &[Payment],
        config: &EngineConfig,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        let mut events = EventStore::new();
        Self::build_with_events(credit, payments, config, time_provider, &mut events)
    }

    pub fn build_with_events(
        credit: &Credit,
        payments: &[Payment],
        config: &EngineConfig,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Self> {
        credit.validate()?;
        config.validate()?;

        let baseline = generate_from_credit(credit, time_provider)?;
        let schedule = if payments.is_empty() {
            baseline
        } else {
            PaymentReconciler::new(config.clone())?.reconcile_with_events(&baseline, payments, credit, events)
        };

        debug!(
            credit_id = %credit.id,
            payments = payments.len(),
            paid = schedule.paid_count(),
            "built loan view"
        );

        Ok(Self {
            credit_id: credit.id,
            description: credit.description.clone(),
            summary: LoanSummary::calculate(credit, &schedule),
            schedule,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
