/// quick start - baseline schedule for a bank-quoted credit
use loan_schedule_rs::chrono::{TimeZone, Utc};
use loan_schedule_rs::{generate_from_credit, summarize, Credit, Decimal, Money, Rate, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    ));

    // 12,000,000 at 24% EA over a year, bank quotes 1,130,000 a month
    let credit = Credit::builder()
        .principal(Money::from_major(12_000_000))
        .annual_rate(Rate::from_percentage(Decimal::from(24)))
        .term_months(12)
        .installment_amount(Money::from_major(1_130_000))
        .build(&time)?;

    let schedule = generate_from_credit(&credit, &time)?;
    for i in &schedule.installments {
        println!(
            "{:>2}  {}  cuota {:>12}  interes {:>10}  capital {:>12}  saldo {:>12}",
            i.payment_number,
            i.expiration_date.format("%Y-%m-%d"),
            i.installment_amount,
            i.interest,
            i.capital,
            i.balance,
        );
    }

    let summary = summarize(&credit, &schedule);
    println!("\ntotal interest: {}", summary.total_interest);
    println!("monthly rate:   {}", summary.monthly_rate);

    Ok(())
}
