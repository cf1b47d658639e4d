pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod loan;
pub mod schedule;
pub mod types;

// re-export key types
pub use calendar::{
    BusinessDayCalendar, FixedHoliday, FloatingHoliday, HolidayCalendar, HolidayRules,
};
pub use config::LoanConfig;
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use loan::{compute_loan, Installment, LoanCalculator, LoanRequest, LoanRequestBuilder, LoanResult};
pub use schedule::PaymentScheduleGenerator;
pub use types::{AmortizationMethod, LoanState, PeriodUnit};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
