use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::calendar::{start_of_day, BusinessDayCalendar};
use crate::errors::{LoanError, Result};
use crate::types::PeriodUnit;

const MAX_RESERVED_DATES: u32 = 1024;

/// derives installment dates that fall on working days
pub struct PaymentScheduleGenerator<'a, C: BusinessDayCalendar + ?Sized> {
    calendar: &'a C,
}

impl<'a, C: BusinessDayCalendar + ?Sized> PaymentScheduleGenerator<'a, C> {
    pub fn new(calendar: &'a C) -> Self {
        Self { calendar }
    }

    /// one payment date per installment, strictly increasing, all working days.
    ///
    /// Every period is offset from the same anchor (`period_duration * i`
    /// units) rather than from the previous payment, so month based units
    /// keep their calendar day instead of drifting after a roll.
    pub fn payment_dates(
        &self,
        from_date: DateTime<Utc>,
        period_duration: u32,
        period_unit: PeriodUnit,
        installments_number: u32,
    ) -> Result<Vec<DateTime<Utc>>> {
        let anchor = if self.calendar.is_working_day(from_date) {
            from_date
        } else {
            start_of_day(self.calendar.find_next_working_date(from_date)?)
        };

        debug!(
            %from_date,
            %anchor,
            period_duration,
            %period_unit,
            installments_number,
            "generating payment dates"
        );

        // counts past the representable date range fail in the loop, so only reserve a bounded amount
        let mut dates: Vec<DateTime<Utc>> =
            Vec::with_capacity(installments_number.min(MAX_RESERVED_DATES) as usize);
        for i in 0..installments_number {
            let offset = period_duration.checked_mul(i).ok_or_else(|| LoanError::InvalidDate {
                message: format!("period offset {} x {} overflows", period_duration, i),
            })?;
            let candidate = period_unit.advance(anchor, offset)?;

            let mut payment_date = self.resolve(candidate)?;

            // periods shorter than a weekend can resolve onto an earlier payment
            if let Some(&previous) = dates.last() {
                if payment_date <= previous {
                    trace!(period = i, %payment_date, %previous, "payment date collides, rolling past previous");
                    payment_date = start_of_day(self.calendar.find_next_working_date(previous)?);
                }
            }

            dates.push(payment_date);
        }

        Ok(dates)
    }

    /// candidate if it is a working day, else the next working day at midnight
    fn resolve(&self, candidate: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if self.calendar.is_working_day(candidate) {
            Ok(candidate)
        } else {
            Ok(start_of_day(self.calendar.find_next_working_date(candidate)?))
        }
    }
}
