use serde::{Deserialize, Serialize};

use crate::calendar::{HolidayCalendar, HolidayRules, DEFAULT_MAX_SEARCH_DAYS};
use crate::errors::{LoanError, Result};
use crate::types::PeriodUnit;

/// calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanConfig {
    /// holiday table used to roll payment dates
    pub holidays: HolidayRules,
    /// consecutive non-working days tolerated before giving up
    pub max_search_days: u32,
    /// period length used when a request does not set one
    pub default_period_duration: u32,
    pub default_period_unit: PeriodUnit,
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            holidays: HolidayRules::us(),
            max_search_days: DEFAULT_MAX_SEARCH_DAYS,
            default_period_duration: 1,
            default_period_unit: PeriodUnit::Months,
        }
    }
}

impl LoanConfig {
    /// parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_search_days == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "max_search_days must be positive".to_string(),
            });
        }
        if self.default_period_duration == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "default_period_duration must be positive".to_string(),
            });
        }
        self.holidays.validate()
    }

    /// business day calendar described by this configuration
    pub fn calendar(&self) -> HolidayCalendar {
        HolidayCalendar::new(self.holidays.clone()).with_max_search_days(self.max_search_days)
    }
}
