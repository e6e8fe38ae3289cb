/// reconcile - cross actual payments with the schedule
use loan_schedule_rs::chrono::{Duration, TimeZone, Utc};
use loan_schedule_rs::{
    generate_from_credit, Credit, Decimal, EventStore, EngineConfig, Money, Payment,
    PaymentReconciler, Rate, SafeTimeProvider, TimeSource,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    ));

    let credit = Credit::builder()
        .principal(Money::from_major(12_000_000))
        .annual_rate(Rate::from_percentage(Decimal::from(24)))
        .term_months(12)
        .insurance(Money::from_major(15_000))
        .installment_amount(Money::from_major(1_145_000))
        .build(&time)?;

    let baseline = generate_from_credit(&credit, &time)?;

    // delivered out of order on purpose: a regular payment, a large
    // contribution, then a short one
    let start = credit.start_date;
    let payments = vec![
        Payment::new(credit.id, start + Duration::days(92), Money::from_major(100_000))
            .with_comment("short month"),
        Payment::new(credit.id, start + Duration::days(31), Money::from_major(1_145_000)),
        Payment::new(credit.id, start + Duration::days(61), Money::from_major(4_000_000))
            .with_comment("bonus"),
    ];

    let mut events = EventStore::new();
    let reconciled = PaymentReconciler::new(EngineConfig::default())?
        .reconcile_with_events(&baseline, &payments, &credit, &mut events);

    for i in &reconciled.installments {
        println!(
            "{:>2}  {:?}  cuota {:>12}  capital {:>12}  abono {:>12}  saldo {:>12}",
            i.payment_number,
            i.status,
            i.installment_amount,
            i.capital,
            i.capital_contribution.unwrap_or(Money::ZERO),
            i.balance,
        );
    }

    println!("\n{} events", events.events().len());
    for event in events.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
