//! Business day calendar.
//!
//! Weekends are always closed; holidays come from an injectable
//! [`HolidayRules`] table, the US table by default.

pub mod holidays;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use tracing::{trace, warn};

use crate::errors::{LoanError, Result};

pub use holidays::{FixedHoliday, FloatingHoliday, HolidayRules};

/// default bound on consecutive non-working days searched
pub const DEFAULT_MAX_SEARCH_DAYS: u32 = 30;

/// working day predicates over plain dates
pub trait BusinessDayCalendar {
    /// true if the date is a holiday
    fn is_holiday(&self, date: DateTime<Utc>) -> bool;

    /// upper bound on days `find_next_working_date` may advance
    fn max_search_days(&self) -> u32 {
        DEFAULT_MAX_SEARCH_DAYS
    }

    fn is_saturday(&self, date: DateTime<Utc>) -> bool {
        date.weekday() == Weekday::Sat
    }

    fn is_sunday(&self, date: DateTime<Utc>) -> bool {
        date.weekday() == Weekday::Sun
    }

    fn is_weekend(&self, date: DateTime<Utc>) -> bool {
        self.is_saturday(date) || self.is_sunday(date)
    }

    /// not a weekend and not a holiday
    fn is_working_day(&self, date: DateTime<Utc>) -> bool {
        !(self.is_weekend(date) || self.is_holiday(date))
    }

    /// first working day strictly after `date`, keeping the time of day
    fn find_next_working_date(&self, date: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let limit = self.max_search_days();
        let mut candidate = date;

        for _ in 0..limit {
            candidate = candidate
                .checked_add_signed(Duration::days(1))
                .ok_or_else(|| LoanError::InvalidDate {
                    message: format!("no day after {}", candidate.to_rfc3339()),
                })?;
            if self.is_working_day(candidate) {
                trace!(from = %date, to = %candidate, "rolled to next working day");
                return Ok(candidate);
            }
        }

        warn!(from = %date, limit, "no working day found within search bound");
        Err(LoanError::InvariantViolation {
            message: format!(
                "no working day within {} days after {}",
                limit,
                date.to_rfc3339()
            ),
        })
    }
}

/// calendar backed by a holiday table
#[derive(Debug, Clone, PartialEq)]
pub struct HolidayCalendar {
    rules: HolidayRules,
    max_search_days: u32,
}

impl HolidayCalendar {
    pub fn new(rules: HolidayRules) -> Self {
        Self {
            rules,
            max_search_days: DEFAULT_MAX_SEARCH_DAYS,
        }
    }

    pub fn with_max_search_days(mut self, days: u32) -> Self {
        self.max_search_days = days;
        self
    }

    pub fn rules(&self) -> &HolidayRules {
        &self.rules
    }

    /// holiday name for the date, if any
    pub fn holiday_name(&self, date: DateTime<Utc>) -> Option<&str> {
        self.rules.holiday_name(date.date_naive())
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::new(HolidayRules::us())
    }
}

impl BusinessDayCalendar for HolidayCalendar {
    fn is_holiday(&self, date: DateTime<Utc>) -> bool {
        self.rules.is_holiday(date.date_naive())
    }

    fn max_search_days(&self) -> u32 {
        self.max_search_days
    }
}

/// same day at 00:00
pub fn start_of_day(date: DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive().and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_weekends() {
        let cal = HolidayCalendar::default();

        assert!(cal.is_saturday(ymd(2015, 1, 3)));
        assert!(!cal.is_saturday(ymd(2015, 1, 4)));
        assert!(cal.is_sunday(ymd(2015, 1, 4)));
        assert!(!cal.is_working_day(ymd(2015, 1, 3)));
        assert!(!cal.is_working_day(ymd(2015, 1, 4)));
        assert!(cal.is_working_day(ymd(2015, 1, 5)));
    }

    #[test]
    fn test_holidays_are_not_working_days() {
        let cal = HolidayCalendar::default();

        assert!(cal.is_holiday(ymd(2015, 12, 25)));
        assert!(!cal.is_working_day(ymd(2015, 12, 25)));
        assert_eq!(cal.holiday_name(ymd(2015, 12, 25)), Some("Christmas Day"));
    }

    #[test]
    fn test_find_next_working_date() {
        let cal = HolidayCalendar::default();
        let cases = [
            // sunday -> monday
            (ymd(2015, 1, 11), ymd(2015, 1, 12)),
            // saturday -> monday
            (ymd(2015, 1, 24), ymd(2015, 1, 26)),
            // christmas friday -> monday
            (ymd(2015, 12, 25), ymd(2015, 12, 28)),
            // christmas thursday -> friday
            (ymd(2014, 12, 25), ymd(2014, 12, 26)),
        ];

        for (non_working, expected) in cases {
            assert_eq!(cal.find_next_working_date(non_working).unwrap(), expected);
        }
    }

    #[test]
    fn test_next_working_date_is_strictly_after() {
        let cal = HolidayCalendar::default();
        // tuesday is already a working day, next one is wednesday
        let tuesday = ymd(2015, 3, 10);
        assert_eq!(cal.find_next_working_date(tuesday).unwrap(), ymd(2015, 3, 11));
    }

    #[test]
    fn test_next_working_date_keeps_time_of_day() {
        let cal = HolidayCalendar::default();
        let saturday = Utc.with_ymd_and_hms(2015, 1, 3, 14, 45, 0).unwrap();
        assert_eq!(
            cal.find_next_working_date(saturday).unwrap(),
            Utc.with_ymd_and_hms(2015, 1, 5, 14, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_year_end_run() {
        let cal = HolidayCalendar::default();
        // dec 31 2015 thursday, jan 1 friday, weekend, monday jan 4
        assert_eq!(cal.find_next_working_date(ymd(2015, 12, 30)).unwrap(), ymd(2016, 1, 4));
    }

    #[test]
    fn test_search_bound_exceeded() {
        // every day of january is a holiday
        let mut rules = HolidayRules::empty();
        for day in 1..=31 {
            rules.fixed.push(FixedHoliday {
                month: 1,
                day,
                name: format!("Holiday {}", day),
            });
        }
        let cal = HolidayCalendar::new(rules);

        let err = cal.find_next_working_date(ymd(2015, 12, 31)).unwrap_err();
        assert!(matches!(err, LoanError::InvariantViolation { .. }));

        // a wider bound gets past january
        let cal = cal.with_max_search_days(40);
        assert_eq!(cal.find_next_working_date(ymd(2015, 12, 31)).unwrap(), ymd(2016, 2, 1));
    }

    #[test]
    fn test_start_of_day() {
        let noon = Utc.with_ymd_and_hms(2015, 6, 1, 12, 30, 15).unwrap();
        assert_eq!(start_of_day(noon), ymd(2015, 6, 1));
    }
}
