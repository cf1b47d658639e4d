/// quick start - the two classic loans
use loan_schedule_rs::{compute_loan, LoanRequest, Money, Rate};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1 000 in 12 diminishing installments at 5%
    let small = LoanRequest::new(Money::from_major(1_000), 12, Rate::from_percentage(dec!(5)), true)?;
    println!("{}", compute_loan(&small)?.json()?);

    // 500 000 in 360 equal installments (30 years) at 3.5%
    let mortgage = LoanRequest::new(Money::from_major(500_000), 360, Rate::from_percentage(dec!(3.5)), false)?;
    let loan = compute_loan(&mortgage)?;
    println!(
        "mortgage: installment {}, total interest {}, total paid {}",
        loan.installments[0].installment, loan.interest_sum, loan.sum
    );

    Ok(())
}
