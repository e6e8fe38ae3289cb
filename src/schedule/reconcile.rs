use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::credit::{Credit, Payment};
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::rates::{monthly_effective_rate, period_interest, projected_payoff};
use crate::types::InstallmentStatus;

use super::{due_date, Installment, LoanSchedule};

/// Crosses actual payments with a schedule.
///
/// Payments are sorted by date and matched by position: the i-th payment
/// settles the i-th installment whatever their dates. Each step re-derives
/// interest from the outstanding principal carried over from the previous
/// step. When any capital was applied, every installment after the matched
/// ones is rebuilt from the new balance up to the contracted term.
#[derive(Debug, Clone, Default)]
pub struct PaymentReconciler {
    config: EngineConfig,
}

/// loan terms resolved once per reconciliation
struct Terms {
    monthly_rate: Rate,
    insurance: Money,
    /// fixed installment used for regenerated rows
    installment_amount: Money,
}

impl PaymentReconciler {
    /// reconciler with a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn reconcile(&self, schedule: &LoanSchedule, payments: &[Payment], credit: &Credit) -> LoanSchedule {
        let mut events = EventStore::new();
        self.reconcile_with_events(schedule, payments, credit, &mut events)
    }

    /// reconcile, recording every decision in `events`
    pub fn reconcile_with_events(
        &self,
        schedule: &LoanSchedule,
        payments: &[Payment],
        credit: &Credit,
        events: &mut EventStore,
    ) -> LoanSchedule {
        let terms = Terms {
            monthly_rate: monthly_effective_rate(credit.annual_rate),
            insurance: credit.insurance,
            installment_amount: credit
                .external_installment()
                .or_else(|| schedule.installments.first().map(|i| i.installment_amount))
                .unwrap_or(Money::ZERO),
        };

        let mut sorted: Vec<&Payment> = payments.iter().collect();
        sorted.sort_by_key(|p| p.payment_date);

        if sorted.len() > schedule.len() {
            let count = sorted.len() - schedule.len();
            warn!(credit_id = %credit.id, count, "more payments than installments, surplus ignored");
            events.emit(Event::UnmatchedPayments {
                credit_id: credit.id,
                count,
            });
        }

        let mut installments = schedule.installments.clone();
        let processed = sorted.len().min(installments.len());

        let outstanding = sorted
            .iter()
            .zip(installments.iter_mut())
            .fold(credit.principal, |outstanding, (payment, installment)| {
                settle(outstanding, payment, installment, credit, &terms, events)
            });

        if outstanding < credit.principal {
            installments.truncate(processed);
            let tail = self.regenerate_tail(outstanding, processed as u32 + 1, credit, &terms, events);
            installments.extend(tail);
        }

        LoanSchedule::from_installments(installments)
    }

    /// rebuild installments `from..=term_months` starting at `outstanding`
    fn regenerate_tail(
        &self,
        outstanding: Money,
        from: u32,
        credit: &Credit,
        terms: &Terms,
        events: &mut EventStore,
    ) -> Vec<Installment> {
        info!(
            credit_id = %credit.id,
            from_payment_number = from,
            outstanding = %outstanding,
            "regenerating schedule from reduced balance"
        );
        events.emit(Event::ScheduleRegenerated {
            credit_id: credit.id,
            from_payment_number: from,
            outstanding_principal: outstanding,
        });

        let mut balance = outstanding;
        let mut tail = Vec::new();
        let mut placeholders = 0;

        for number in from..=credit.term_months {
            let expiration_date = due_date(credit.start_date, number);

            if balance <= self.config.payoff_tolerance {
                tail.push(Installment::placeholder(number, expiration_date));
                placeholders += 1;
                continue;
            }

            let interest = period_interest(balance, terms.monthly_rate);
            // an installment too small to cover interest amortizes nothing
            let max_capital = (terms.installment_amount - interest - terms.insurance).floor_zero();
            let capital = max_capital.min(balance);

            let installment_amount = if capital >= balance {
                interest + capital + terms.insurance
            } else {
                terms.installment_amount
            };

            let remaining = (balance - capital).floor_zero();

            tail.push(Installment {
                payment_number: number,
                expiration_date,
                installment_amount: installment_amount.round2(),
                interest,
                capital,
                balance: projected_payoff(remaining, terms.monthly_rate, terms.insurance),
                status: InstallmentStatus::Pending,
                capital_contribution: None,
            });

            balance = remaining;
        }

        if placeholders > 0 {
            let last_payment_number = credit.term_months - placeholders;
            info!(credit_id = %credit.id, last_payment_number, "loan retired before term");
            events.emit(Event::LoanRetiredEarly {
                credit_id: credit.id,
                last_payment_number,
                placeholder_count: placeholders,
            });
        }

        tail
    }
}

/// apply one payment to its positional installment, returning the new outstanding principal
fn settle(
    outstanding: Money,
    payment: &Payment,
    installment: &mut Installment,
    credit: &Credit,
    terms: &Terms,
    events: &mut EventStore,
) -> Money {
    let amount_paid = payment.amount_paid;
    let real_interest = period_interest(outstanding, terms.monthly_rate);
    let minimum_required = real_interest + terms.insurance;

    if amount_paid >= minimum_required {
        let capital_to_pay = (amount_paid - real_interest - terms.insurance).min(outstanding);
        let regular_capital = capital_to_pay.min(installment.capital);
        let extra_capital = (capital_to_pay - regular_capital).floor_zero();
        let outstanding = (outstanding - capital_to_pay).floor_zero();

        installment.status = InstallmentStatus::Paid;
        installment.interest = real_interest;
        installment.capital = regular_capital;
        installment.capital_contribution = Some(extra_capital).filter(|c| c.is_positive());
        installment.balance = Money::ZERO;

        debug!(
            payment_number = installment.payment_number,
            amount_paid = %amount_paid,
            interest = %real_interest,
            capital = %regular_capital,
            extra_capital = %extra_capital,
            outstanding = %outstanding,
            "installment paid"
        );
        events.emit(Event::InstallmentPaid {
            credit_id: credit.id,
            payment_id: payment.id,
            payment_number: installment.payment_number,
            amount_paid,
            interest: real_interest,
            capital: regular_capital,
            capital_contribution: installment.capital_contribution,
            outstanding_principal: outstanding,
            payment_date: payment.payment_date,
        });

        return outstanding;
    }

    if !amount_paid.is_positive() || !outstanding.is_positive() {
        debug!(
            payment_number = installment.payment_number,
            amount_paid = %amount_paid,
            "payment not applied"
        );
        events.emit(Event::PaymentIgnored {
            credit_id: credit.id,
            payment_id: payment.id,
            payment_number: installment.payment_number,
            amount_paid,
        });
        return outstanding;
    }

    let capital_abono = amount_paid.min(outstanding);
    let outstanding = (outstanding - capital_abono).floor_zero();

    installment.status = InstallmentStatus::Pending;
    installment.capital_contribution = Some(capital_abono);
    installment.balance = projected_payoff(outstanding, terms.monthly_rate, terms.insurance);

    debug!(
        payment_number = installment.payment_number,
        amount_paid = %amount_paid,
        minimum_required = %minimum_required,
        outstanding = %outstanding,
        "insufficient payment applied to capital"
    );
    events.emit(Event::PartialPaymentApplied {
        credit_id: credit.id,
        payment_id: payment.id,
        payment_number: installment.payment_number,
        amount_paid,
        minimum_required,
        capital_contribution: capital_abono,
        outstanding_principal: outstanding,
        payment_date: payment.payment_date,
    });

    outstanding
}

/// reconcile with the default configuration
pub fn reconcile(schedule: &LoanSchedule, payments: &[Payment], credit: &Credit) -> LoanSchedule {
    PaymentReconciler::default().reconcile(schedule, payments, credit)
}
