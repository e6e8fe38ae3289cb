pub mod config;
pub mod credit;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod rates;
pub mod schedule;
pub mod serialization;
pub mod summary;
pub mod types;

// re-export key types
pub use config::EngineConfig;
pub use credit::{Credit, CreditBuilder, Payment};
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use rates::{annuity_payment, monthly_effective_rate};
pub use schedule::{
    due_date, generate_from_credit, project_with_extra_payments, reconcile, Installment,
    LoanSchedule, PaymentReconciler, ScheduleGenerator,
};
pub use serialization::LoanView;
pub use summary::{summarize, LoanSummary};
pub use types::{CreditId, ExtraPayment, InstallmentStatus, PaymentId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
