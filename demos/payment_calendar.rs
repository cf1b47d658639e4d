/// payment dates around the US holidays, with a pinned start date
use loan_schedule_rs::chrono::{TimeZone, Utc};
use loan_schedule_rs::{
    BusinessDayCalendar, LoanCalculator, LoanRequest, Money, PeriodUnit, Rate, SafeTimeProvider,
    TimeSource,
};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let start = Utc.with_ymd_and_hms(2015, 11, 20, 0, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(start));

    // 20 000 repaid every 5 days, diminishing
    let request = LoanRequest::builder()
        .amount(Money::from_major(20_000))
        .installments(10)
        .interest_rate(Rate::from_percentage(dec!(4.25)))
        .diminishing(true)
        .period(5, PeriodUnit::Days)
        .build()?;

    let calculator = LoanCalculator::new();
    let loan = calculator.compute(&request, &time)?;

    for (i, inst) in loan.installments.iter().enumerate() {
        let candidate = PeriodUnit::Days.advance(start, 5 * i as u32)?;
        let note = calculator
            .calendar()
            .holiday_name(candidate)
            .map(|name| format!(" (rolled from {})", name))
            .unwrap_or_else(|| {
                if calculator.calendar().is_weekend(candidate) {
                    " (rolled from weekend)".to_string()
                } else {
                    String::new()
                }
            });
        println!(
            "{:>2} {} {:>9} = {:>9} + {:>6}{}",
            i + 1,
            inst.payment_day.format("%a %Y-%m-%d"),
            inst.installment,
            inst.capital,
            inst.interest,
            note
        );
    }

    println!("total {} (interest {})", loan.sum, loan.interest_sum);
    Ok(())
}
