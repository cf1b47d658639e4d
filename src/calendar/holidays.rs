use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};

/// holiday on the same month/day every year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedHoliday {
    pub month: u32,
    pub day: u32,
    pub name: String,
}

/// holiday on the nth weekday of a month; week 5 means the last Monday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingHoliday {
    pub month: u32,
    pub week: u32,
    pub weekday: Weekday,
    pub name: String,
}

/// holiday table consulted by the business-day calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRules {
    pub fixed: Vec<FixedHoliday>,
    pub floating: Vec<FloatingHoliday>,
}

impl HolidayRules {
    /// US holiday table
    pub fn us() -> Self {
        let fixed = [
            (1, 1, "New Year's Day"),
            (7, 4, "Independence Day"),
            (11, 11, "Veteran's Day"),
            (11, 28, "Thanksgiving Day"),
            (11, 29, "Day after Thanksgiving"),
            (12, 24, "Christmas Eve"),
            (12, 25, "Christmas Day"),
            (12, 31, "New Year's Eve"),
        ]
        .into_iter()
        .map(|(month, day, name)| FixedHoliday {
            month,
            day,
            name: name.to_string(),
        })
        .collect();

        let floating = [
            (1, 3, Weekday::Mon, "Martin Luther King Jr. Day"),
            (2, 3, Weekday::Mon, "Washington's Birthday"),
            (5, 5, Weekday::Mon, "Memorial Day"),
            (9, 1, Weekday::Mon, "Labor Day"),
            (10, 2, Weekday::Mon, "Columbus Day"),
            (11, 4, Weekday::Thu, "Thanksgiving Day"),
        ]
        .into_iter()
        .map(|(month, week, weekday, name)| FloatingHoliday {
            month,
            week,
            weekday,
            name: name.to_string(),
        })
        .collect();

        Self { fixed, floating }
    }

    /// table without any holidays; only weekends are closed
    pub fn empty() -> Self {
        Self {
            fixed: Vec::new(),
            floating: Vec::new(),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }

    /// name of the holiday falling on `date`, fixed dates first
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        let (month, day) = (date.month(), date.day());
        if let Some(h) = self.fixed.iter().find(|h| h.month == month && h.day == day) {
            return Some(h.name.as_str());
        }

        let weekday = date.weekday();
        let week = week_of_month(date);
        self.floating
            .iter()
            .find(|h| h.month == month && h.week == week && h.weekday == weekday)
            .map(|h| h.name.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        for h in &self.fixed {
            // 2000 is a leap year so Feb 29 passes
            if NaiveDate::from_ymd_opt(2000, h.month, h.day).is_none() {
                return Err(LoanError::InvalidConfiguration {
                    message: format!("holiday {} has invalid date {}/{}", h.name, h.month, h.day),
                });
            }
        }
        for h in &self.floating {
            if !(1..=12).contains(&h.month) || !(1..=5).contains(&h.week) {
                return Err(LoanError::InvalidConfiguration {
                    message: format!(
                        "holiday {} has invalid month/week {}/{}",
                        h.name, h.month, h.week
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Default for HolidayRules {
    fn default() -> Self {
        Self::us()
    }
}

/// 1-based week of month; a Monday within a week of the month end counts as week 5
fn week_of_month(date: NaiveDate) -> u32 {
    let day = date.day();
    if date.weekday() == Weekday::Mon && day + 7 > 30 {
        5
    } else {
        1 + (day - 1) / 7
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_holidays_any_year() {
        let rules = HolidayRules::us();
        for year in [1999, 2015, 2024, 2031] {
            assert!(rules.is_holiday(ymd(year, 12, 25)));
            assert!(rules.is_holiday(ymd(year, 1, 1)));
            assert!(rules.is_holiday(ymd(year, 7, 4)));
        }
        assert_eq!(rules.holiday_name(ymd(2015, 12, 24)), Some("Christmas Eve"));
    }

    #[test]
    fn test_thanksgiving_fourth_thursday() {
        let rules = HolidayRules::us();
        // 2015-11-26, 2024-11-28 and 2023-11-23 are all 4th thursdays
        assert_eq!(rules.holiday_name(ymd(2015, 11, 26)), Some("Thanksgiving Day"));
        assert!(rules.is_holiday(ymd(2023, 11, 23)));
        assert!(rules.is_holiday(ymd(2024, 11, 28)));
        // third thursday is not
        assert!(!rules.is_holiday(ymd(2015, 11, 19)));
    }

    #[test]
    fn test_monday_holidays() {
        let rules = HolidayRules::us();
        assert_eq!(rules.holiday_name(ymd(2015, 1, 19)), Some("Martin Luther King Jr. Day"));
        assert_eq!(rules.holiday_name(ymd(2015, 2, 16)), Some("Washington's Birthday"));
        assert_eq!(rules.holiday_name(ymd(2015, 9, 7)), Some("Labor Day"));
        assert_eq!(rules.holiday_name(ymd(2015, 10, 12)), Some("Columbus Day"));
    }

    #[test]
    fn test_memorial_day_uses_week_five() {
        let rules = HolidayRules::us();
        // last mondays of may
        assert_eq!(rules.holiday_name(ymd(2015, 5, 25)), Some("Memorial Day"));
        assert!(rules.is_holiday(ymd(2020, 5, 25)));
        assert!(rules.is_holiday(ymd(2021, 5, 31)));
        // a week earlier is a normal monday
        assert!(!rules.is_holiday(ymd(2015, 5, 18)));

        assert_eq!(week_of_month(ymd(2015, 5, 25)), 5);
        assert_eq!(week_of_month(ymd(2015, 5, 26)), 4);
        assert_eq!(week_of_month(ymd(2015, 5, 1)), 1);
    }

    #[test]
    fn test_ordinary_tuesday_is_not_holiday() {
        let rules = HolidayRules::us();
        assert!(!rules.is_holiday(ymd(2015, 3, 10)));
        assert!(rules.holiday_name(ymd(2015, 3, 10)).is_none());
    }

    #[test]
    fn test_empty_rules() {
        assert!(!HolidayRules::empty().is_holiday(ymd(2015, 12, 25)));
    }

    #[test]
    fn test_validate_rejects_bad_dates() {
        assert!(HolidayRules::us().validate().is_ok());

        let mut rules = HolidayRules::empty();
        rules.fixed.push(FixedHoliday {
            month: 2,
            day: 30,
            name: "Nonexistent".to_string(),
        });
        assert!(rules.validate().is_err());

        let mut rules = HolidayRules::empty();
        rules.floating.push(FloatingHoliday {
            month: 13,
            week: 1,
            weekday: Weekday::Mon,
            name: "Nonexistent".to_string(),
        });
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_rules_load_from_json() {
        let json = r#"{
            "fixed": [{"month": 3, "day": 17, "name": "St. Patrick's Day"}],
            "floating": [{"month": 8, "week": 1, "weekday": "Mon", "name": "August Bank Holiday"}]
        }"#;
        let rules: HolidayRules = serde_json::from_str(json).unwrap();
        assert!(rules.is_holiday(ymd(2015, 3, 17)));
        assert!(rules.is_holiday(ymd(2015, 8, 3)));
        assert!(!rules.is_holiday(ymd(2015, 12, 25)));
    }
}
