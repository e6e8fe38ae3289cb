/// json view - what the rendering layer receives
use loan_schedule_rs::chrono::{Duration, TimeZone, Utc};
use loan_schedule_rs::{Credit, EngineConfig, LoanView, Money, Payment, SafeTimeProvider, TimeSource};

const CREDIT: &str = r#"{
    "id": "7f0c1d2e-3a4b-4c5d-8e9f-0a1b2c3d4e5f",
    "description": "vehicle",
    "totalLoan": 12000000,
    "annualInterestRate": 24,
    "lifeInsurance": 15000,
    "expirationDate": "2024-01-15T00:00:00Z",
    "termMonths": 12,
    "paymentAmount": 1145000
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    ));

    let credit = Credit::from_json(CREDIT)?;
    let payments = vec![
        Payment::new(credit.id, credit.start_date + Duration::days(31), Money::from_major(1_145_000)),
    ];

    let config = EngineConfig::from_json(r#"{ "payoffTolerance": "0.01" }"#)?;
    let view = LoanView::build(&credit, &payments, &config, &time)?;
    println!("{}", view.to_json()?);

    Ok(())
}
