use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{LoanError, Result};

/// amortization method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AmortizationMethod {
    /// constant capital each period, payment shrinks with the balance
    Diminishing,
    /// constant payment (annuity), capital share grows over time
    #[default]
    Equal,
}

impl AmortizationMethod {
    /// map the `diminishing` flag used by callers to a method
    pub fn from_diminishing(diminishing: bool) -> Self {
        if diminishing {
            AmortizationMethod::Diminishing
        } else {
            AmortizationMethod::Equal
        }
    }
}

/// loan lifecycle tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanState {
    /// schedule computed, nothing paid yet
    #[default]
    Pending,
}

/// calendar unit used to space installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    #[default]
    Months,
    Quarters,
    Years,
}

impl PeriodUnit {
    /// advance `date` by `amount` units; month based units clamp to the end of month
    pub fn advance(&self, date: DateTime<Utc>, amount: u32) -> Result<DateTime<Utc>> {
        let amount_i64 = i64::from(amount);
        let result = match self {
            PeriodUnit::Minutes => Duration::try_minutes(amount_i64).and_then(|d| date.checked_add_signed(d)),
            PeriodUnit::Hours => Duration::try_hours(amount_i64).and_then(|d| date.checked_add_signed(d)),
            PeriodUnit::Days => Duration::try_days(amount_i64).and_then(|d| date.checked_add_signed(d)),
            PeriodUnit::Weeks => Duration::try_weeks(amount_i64).and_then(|d| date.checked_add_signed(d)),
            PeriodUnit::Months => date.checked_add_months(Months::new(amount)),
            PeriodUnit::Quarters => amount
                .checked_mul(3)
                .and_then(|m| date.checked_add_months(Months::new(m))),
            PeriodUnit::Years => amount
                .checked_mul(12)
                .and_then(|m| date.checked_add_months(Months::new(m))),
        };

        result.ok_or_else(|| LoanError::InvalidDate {
            message: format!("{} {} after {} is out of range", amount, self, date.to_rfc3339()),
        })
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodUnit::Minutes => "minutes",
            PeriodUnit::Hours => "hours",
            PeriodUnit::Days => "days",
            PeriodUnit::Weeks => "weeks",
            PeriodUnit::Months => "months",
            PeriodUnit::Quarters => "quarters",
            PeriodUnit::Years => "years",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PeriodUnit {
    type Err = LoanError;

    /// accepts plural, singular and short forms ("days", "day", "d"); "M" is months, "m" minutes
    fn from_str(s: &str) -> Result<Self> {
        let unit = match s {
            "m" => PeriodUnit::Minutes,
            "M" => PeriodUnit::Months,
            "Q" => PeriodUnit::Quarters,
            _ => match s.to_ascii_lowercase().as_str() {
                "minutes" | "minute" => PeriodUnit::Minutes,
                "hours" | "hour" | "h" => PeriodUnit::Hours,
                "days" | "day" | "d" => PeriodUnit::Days,
                "weeks" | "week" | "w" => PeriodUnit::Weeks,
                "months" | "month" => PeriodUnit::Months,
                "quarters" | "quarter" => PeriodUnit::Quarters,
                "years" | "year" | "y" => PeriodUnit::Years,
                _ => {
                    return Err(LoanError::InvalidConfiguration {
                        message: format!("unknown period unit: {}", s),
                    })
                }
            },
        };
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_advance_by_fixed_units() {
        let start = Utc.with_ymd_and_hms(2015, 1, 5, 10, 30, 0).unwrap();

        assert_eq!(
            PeriodUnit::Minutes.advance(start, 2).unwrap(),
            Utc.with_ymd_and_hms(2015, 1, 5, 10, 32, 0).unwrap()
        );
        assert_eq!(
            PeriodUnit::Days.advance(start, 5).unwrap(),
            Utc.with_ymd_and_hms(2015, 1, 10, 10, 30, 0).unwrap()
        );
        assert_eq!(
            PeriodUnit::Weeks.advance(start, 2).unwrap(),
            Utc.with_ymd_and_hms(2015, 1, 19, 10, 30, 0).unwrap()
        );
        assert_eq!(PeriodUnit::Days.advance(start, 0).unwrap(), start);
    }

    #[test]
    fn test_advance_months_clamps_to_month_end() {
        let start = Utc.with_ymd_and_hms(2015, 1, 31, 0, 0, 0).unwrap();

        assert_eq!(
            PeriodUnit::Months.advance(start, 1).unwrap(),
            Utc.with_ymd_and_hms(2015, 2, 28, 0, 0, 0).unwrap()
        );
        assert_eq!(
            PeriodUnit::Quarters.advance(start, 1).unwrap(),
            Utc.with_ymd_and_hms(2015, 4, 30, 0, 0, 0).unwrap()
        );
        assert_eq!(
            PeriodUnit::Years.advance(start, 1).unwrap(),
            Utc.with_ymd_and_hms(2016, 1, 31, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_advance_out_of_range() {
        let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let err = PeriodUnit::Years.advance(start, u32::MAX).unwrap_err();
        assert!(matches!(err, LoanError::InvalidDate { .. }));
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("days".parse::<PeriodUnit>().unwrap(), PeriodUnit::Days);
        assert_eq!("Day".parse::<PeriodUnit>().unwrap(), PeriodUnit::Days);
        assert_eq!("m".parse::<PeriodUnit>().unwrap(), PeriodUnit::Minutes);
        assert_eq!("M".parse::<PeriodUnit>().unwrap(), PeriodUnit::Months);
        assert_eq!("minutes".parse::<PeriodUnit>().unwrap(), PeriodUnit::Minutes);
        assert!("fortnights".parse::<PeriodUnit>().is_err());
    }

    #[test]
    fn test_state_serializes_as_pending() {
        assert_eq!(serde_json::to_string(&LoanState::Pending).unwrap(), "\"PENDING\"");
        assert_eq!(serde_json::to_string(&PeriodUnit::Days).unwrap(), "\"days\"");
    }

    #[test]
    fn test_method_from_flag() {
        assert_eq!(AmortizationMethod::from_diminishing(true), AmortizationMethod::Diminishing);
        assert_eq!(AmortizationMethod::from_diminishing(false), AmortizationMethod::Equal);
    }
}
