use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::calendar::HolidayCalendar;
use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::schedule::PaymentScheduleGenerator;
use crate::types::{AmortizationMethod, LoanState, PeriodUnit};

/// loan parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub amount: Money,
    pub installments_number: u32,
    /// annual rate
    pub interest_rate: Rate,
    pub method: AmortizationMethod,
    /// falls back to the calculator's configured default when unset
    pub period_duration: Option<u32>,
    pub period_unit: Option<PeriodUnit>,
    /// first payment anchor; "now" when unset
    pub from_date: Option<DateTime<Utc>>,
}

impl LoanRequest {
    /// monthly periods starting now
    pub fn new(amount: Money, installments_number: u32, interest_rate: Rate, diminishing: bool) -> Result<Self> {
        Self::builder()
            .amount(amount)
            .installments(installments_number)
            .interest_rate(interest_rate)
            .diminishing(diminishing)
            .build()
    }

    pub fn builder() -> LoanRequestBuilder {
        LoanRequestBuilder::new()
    }

    /// amount (in whole cents), installment count and rate must all be positive
    pub fn validate(&self) -> Result<()> {
        if !self.amount.round_cents().is_positive() || self.installments_number == 0 || !self.interest_rate.is_positive() {
            return Err(LoanError::InvalidArgument {
                amount: Some(self.amount),
                installments_number: Some(self.installments_number),
                interest_rate: Some(self.interest_rate),
                method: self.method,
            });
        }
        if self.period_duration == Some(0) {
            return Err(LoanError::InvalidConfiguration {
                message: "period duration must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// builder for loan requests
#[derive(Debug, Clone, Default)]
pub struct LoanRequestBuilder {
    amount: Option<Money>,
    installments_number: Option<u32>,
    interest_rate: Option<Rate>,
    method: AmortizationMethod,
    period_duration: Option<u32>,
    period_unit: Option<PeriodUnit>,
    from_date: Option<DateTime<Utc>>,
}

impl LoanRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn installments(mut self, installments_number: u32) -> Self {
        self.installments_number = Some(installments_number);
        self
    }

    pub fn interest_rate(mut self, rate: Rate) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn method(mut self, method: AmortizationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn diminishing(mut self, diminishing: bool) -> Self {
        self.method = AmortizationMethod::from_diminishing(diminishing);
        self
    }

    /// installments are spaced `duration` units apart
    pub fn period(mut self, duration: u32, unit: PeriodUnit) -> Self {
        self.period_duration = Some(duration);
        self.period_unit = Some(unit);
        self
    }

    pub fn from_date(mut self, date: DateTime<Utc>) -> Self {
        self.from_date = Some(date);
        self
    }

    pub fn build(self) -> Result<LoanRequest> {
        let (amount, installments_number, interest_rate) =
            match (self.amount, self.installments_number, self.interest_rate) {
                (Some(a), Some(n), Some(r)) => (a, n, r),
                (amount, installments_number, interest_rate) => {
                    return Err(LoanError::InvalidArgument {
                        amount,
                        installments_number,
                        interest_rate,
                        method: self.method,
                    })
                }
            };

        let request = LoanRequest {
            amount,
            installments_number,
            interest_rate,
            method: self.method,
            period_duration: self.period_duration,
            period_unit: self.period_unit,
            from_date: self.from_date,
        };
        request.validate()?;
        Ok(request)
    }
}

/// one period of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub capital: Money,
    pub interest: Money,
    /// capital + interest
    pub installment: Money,
    /// principal left after this period
    pub remain: Money,
    pub cumulative_interest: Money,
    pub payment_day: DateTime<Utc>,
}

/// computed schedule with totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub amount: Money,
    pub capital_sum: Money,
    pub interest_sum: Money,
    pub sum: Money,
    pub installments: Vec<Installment>,
    pub state: LoanState,
}

impl LoanResult {
    /// installment by 1-based number
    pub fn installment(&self, number: u32) -> Option<&Installment> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.installments.get(index)
    }

    pub fn json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// amortization calculator
#[derive(Debug, Clone, Default)]
pub struct LoanCalculator {
    config: LoanConfig,
    calendar: HolidayCalendar,
}

impl LoanCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoanConfig) -> Result<Self> {
        config.validate()?;
        let calendar = config.calendar();
        Ok(Self { config, calendar })
    }

    pub fn config(&self) -> &LoanConfig {
        &self.config
    }

    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// compute the full schedule; an unset start date is taken from `time_provider`
    pub fn compute(&self, request: &LoanRequest, time_provider: &SafeTimeProvider) -> Result<LoanResult> {
        request.validate()?;

        // the whole schedule works on whole cents so capital_sum reconciles to the reported amount
        let amount = request.amount.round_cents();
        let installments_number = request.installments_number;
        let monthly_rate = request.interest_rate.monthly_rate().as_decimal();
        let from_date = request.from_date.unwrap_or_else(|| time_provider.now());
        let period_duration = request.period_duration.unwrap_or(self.config.default_period_duration);
        let period_unit = request.period_unit.unwrap_or(self.config.default_period_unit);

        debug!(
            %amount,
            installments_number,
            rate = %request.interest_rate,
            method = ?request.method,
            "computing loan schedule"
        );

        let periodic = match request.method {
            AmortizationMethod::Diminishing => {
                Money::from_decimal_cents(amount.as_decimal() / Decimal::from(installments_number))
            }
            AmortizationMethod::Equal => annuity_payment(amount, monthly_rate, installments_number)?,
        };

        let dates = PaymentScheduleGenerator::new(&self.calendar).payment_dates(
            from_date,
            period_duration,
            period_unit,
            installments_number,
        )?;

        let mut installments = Vec::with_capacity(dates.len());
        let mut capital_sum = Money::ZERO;
        let mut interest_sum = Money::ZERO;
        let mut sum = Money::ZERO;

        for (period, payment_day) in dates.into_iter().enumerate() {
            let outstanding = amount - capital_sum;
            let interest = outstanding
                .as_decimal()
                .checked_mul(monthly_rate)
                .map(Money::from_decimal_cents)
                .ok_or_else(|| LoanError::CalculationError {
                    message: format!("interest on {} overflows", outstanding),
                })?;

            // diminishing keeps capital fixed, annuity keeps the installment fixed.
            // capital and interest are rounded before summing so installment == capital + interest exactly
            let (capital, installment) = match request.method {
                AmortizationMethod::Diminishing => (periodic, periodic + interest),
                AmortizationMethod::Equal => (periodic - interest, periodic),
            };
            let remain = (outstanding - capital).round_cents();

            trace!(period, %capital, %interest, %installment, %remain, "installment computed");

            installments.push(Installment {
                capital,
                interest,
                installment,
                remain,
                cumulative_interest: interest_sum + interest,
                payment_day,
            });

            sum += installment;
            capital_sum += capital;
            interest_sum += interest;
        }

        // last period absorbs the rounding drift
        if let Some(last) = installments.last_mut() {
            let drift = last.remain;
            last.installment += drift;
            last.capital += drift;
            capital_sum += drift;
            sum += drift;
            last.remain = Money::ZERO.round_cents();
        }

        let result = LoanResult {
            amount,
            capital_sum: capital_sum.round_cents(),
            interest_sum: interest_sum.round_cents(),
            sum: sum.round_cents(),
            installments,
            state: LoanState::Pending,
        };

        debug!(
            capital_sum = %result.capital_sum,
            interest_sum = %result.interest_sum,
            sum = %result.sum,
            "loan schedule computed"
        );

        Ok(result)
    }
}

/// compute with the default US calendar, starting now when no start date is given
pub fn compute_loan(request: &LoanRequest) -> Result<LoanResult> {
    let time = SafeTimeProvider::new(TimeSource::System);
    LoanCalculator::new().compute(request, &time)
}

/// constant installment P * r * (1 + r)^n / ((1 + r)^n - 1), rounded to the cent
fn annuity_payment(principal: Money, periodic_rate: Decimal, periods: u32) -> Result<Money> {
    let overflow = || LoanError::CalculationError {
        message: format!(
            "annuity factor overflows for rate {} over {} periods",
            periodic_rate, periods
        ),
    };

    let compound = checked_powu(Decimal::ONE + periodic_rate, periods).ok_or_else(overflow)?;

    let factor = periodic_rate
        .checked_mul(compound)
        .and_then(|numerator| numerator.checked_div(compound - Decimal::ONE))
        .ok_or_else(overflow)?;

    principal
        .as_decimal()
        .checked_mul(factor)
        .map(Money::from_decimal_cents)
        .ok_or_else(overflow)
}

/// base^exp by repeated squaring, None on overflow
fn checked_powu(base: Decimal, exp: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    let mut remaining = exp;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.checked_mul(square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.checked_mul(square)?;
        }
    }
    Some(result)
}
