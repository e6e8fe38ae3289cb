/// extra payments - what-if projection of planned capital contributions
use loan_schedule_rs::chrono::{TimeZone, Utc};
use loan_schedule_rs::{
    project_with_extra_payments, Credit, Decimal, EngineConfig, ExtraPayment, Money, Rate,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    ));

    let credit = Credit::builder()
        .principal(Money::from_major(24_000_000))
        .annual_rate(Rate::from_percentage(Decimal::from(18)))
        .term_months(24)
        .insurance(Money::from_major(25_000))
        .build(&time)?;

    let config = EngineConfig::default();
    let plain = project_with_extra_payments(&credit, &[], &config)?;
    let extras = [
        ExtraPayment::new(6, Money::from_major(3_000_000)),
        ExtraPayment::new(12, Money::from_major(3_000_000)),
    ];
    let projected = project_with_extra_payments(&credit, &extras, &config)?;

    println!("without extras: {} installments, interest {}", plain.len(), plain.total_interest);
    println!("with extras:    {} installments, interest {}", projected.len(), projected.total_interest);
    println!("interest saved: {}", plain.total_interest - projected.total_interest);

    Ok(())
}
