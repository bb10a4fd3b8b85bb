//! Entered countdown durations
//!
//! Months have no fixed length, so they are converted by adding them to the
//! local date the duration was entered on. Days count as 24 hours.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::consts::{DAY_MS, HOUR_MS, MINUTE_MS, SECOND_MS};
use crate::error::{ClockError, Result};
use crate::face::ArcKey;

/// Average month used when no months were entered (never drawn)
const NOMINAL_MONTH_MS: u64 = 30 * DAY_MS;

/// Input field of the countdown form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CountdownUnit {
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl CountdownUnit {
    /// Largest unit first
    pub const ALL: [CountdownUnit; 5] = [
        CountdownUnit::Months,
        CountdownUnit::Days,
        CountdownUnit::Hours,
        CountdownUnit::Minutes,
        CountdownUnit::Seconds,
    ];

    /// Ring that shows this unit
    pub fn arc_key(&self) -> ArcKey {
        match self {
            CountdownUnit::Months => ArcKey::Month,
            CountdownUnit::Days => ArcKey::Day,
            CountdownUnit::Hours => ArcKey::Hours,
            CountdownUnit::Minutes => ArcKey::Minutes,
            CountdownUnit::Seconds => ArcKey::Seconds,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CountdownUnit::Months => "months",
            CountdownUnit::Days => "days",
            CountdownUnit::Hours => "hours",
            CountdownUnit::Minutes => "minutes",
            CountdownUnit::Seconds => "seconds",
        }
    }

    /// Fixed length of the unit; `None` for months
    pub fn fixed_ms(&self) -> Option<u64> {
        match self {
            CountdownUnit::Months => None,
            CountdownUnit::Days => Some(DAY_MS),
            CountdownUnit::Hours => Some(HOUR_MS),
            CountdownUnit::Minutes => Some(MINUTE_MS),
            CountdownUnit::Seconds => Some(SECOND_MS),
        }
    }
}

impl fmt::Display for CountdownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountdownUnit {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CountdownUnit::ALL
            .into_iter()
            .find(|u| u.as_str() == wanted || u.as_str().trim_end_matches('s') == wanted)
            .ok_or_else(|| ClockError::Configuration(format!("unknown countdown unit '{s}'")))
    }
}

/// Duration as typed into the countdown form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationComponents {
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl DurationComponents {
    pub fn get(&self, unit: CountdownUnit) -> u32 {
        match unit {
            CountdownUnit::Months => self.months,
            CountdownUnit::Days => self.days,
            CountdownUnit::Hours => self.hours,
            CountdownUnit::Minutes => self.minutes,
            CountdownUnit::Seconds => self.seconds,
        }
    }

    /// Copy with one field replaced
    pub fn with(mut self, unit: CountdownUnit, value: u32) -> Self {
        match unit {
            CountdownUnit::Months => self.months = value,
            CountdownUnit::Days => self.days = value,
            CountdownUnit::Hours => self.hours = value,
            CountdownUnit::Minutes => self.minutes = value,
            CountdownUnit::Seconds => self.seconds = value,
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        CountdownUnit::ALL.iter().all(|&u| self.get(u) == 0)
    }

    /// Largest unit with a non-zero entry
    pub fn largest_unit(&self) -> Option<CountdownUnit> {
        CountdownUnit::ALL.into_iter().find(|&u| self.get(u) > 0)
    }

    /// Convert to milliseconds, adding months to `anchor` on the calendar
    ///
    /// `anchor` is local wall-clock time, so a month is measured on the wall
    /// clock: across a daylight-saving change the countdown still lasts the
    /// wall-clock span and ends one offset step away from the anchored local
    /// time.
    pub fn resolve(&self, anchor: NaiveDateTime) -> Result<ResolvedDuration> {
        let months_ms = if self.months > 0 {
            let end = anchor
                .checked_add_months(Months::new(self.months))
                .ok_or_else(|| {
                    ClockError::Validation(format!("{} months is out of range", self.months))
                })?;
            (end - anchor).num_milliseconds().max(0) as u64
        } else {
            0
        };

        let fixed_ms = u64::from(self.days) * DAY_MS
            + u64::from(self.hours) * HOUR_MS
            + u64::from(self.minutes) * MINUTE_MS
            + u64::from(self.seconds) * SECOND_MS;
        let total_ms = months_ms
            .checked_add(fixed_ms)
            .ok_or_else(|| ClockError::Validation("duration is out of range".to_string()))?;

        if total_ms == 0 {
            return Err(ClockError::Validation(
                "countdown duration must be greater than zero".to_string(),
            ));
        }

        Ok(ResolvedDuration {
            components: *self,
            total_ms,
            months_ms,
        })
    }
}

impl fmt::Display for DurationComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}mo {}d {:02}:{:02}:{:02}",
            self.months, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Entered duration pinned to the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDuration {
    pub components: DurationComponents,
    pub total_ms: u64,
    /// Milliseconds contributed by the months field
    pub months_ms: u64,
}

impl ResolvedDuration {
    /// Length of one unit; a month is the anchored average
    pub fn unit_ms(&self, unit: CountdownUnit) -> u64 {
        match unit.fixed_ms() {
            Some(ms) => ms,
            None if self.components.months > 0 => {
                (self.months_ms / u64::from(self.components.months)).max(1)
            }
            None => NOMINAL_MONTH_MS,
        }
    }

    /// Milliseconds entered at `unit` and every smaller unit
    pub fn tail_ms(&self, unit: CountdownUnit) -> u64 {
        CountdownUnit::ALL
            .into_iter()
            .skip_while(|&u| u != unit)
            .map(|u| match u.fixed_ms() {
                Some(ms) => u64::from(self.components.get(u)) * ms,
                None => self.months_ms,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_month_follows_calendar() {
        let one_month = DurationComponents {
            months: 1,
            ..Default::default()
        };
        // February 2025 has 28 days, March 31
        assert_eq!(one_month.resolve(at(2025, 2, 10)).unwrap().total_ms, 28 * DAY_MS);
        assert_eq!(one_month.resolve(at(2025, 3, 10)).unwrap().total_ms, 31 * DAY_MS);
        // Leap year
        assert_eq!(one_month.resolve(at(2024, 2, 10)).unwrap().total_ms, 29 * DAY_MS);
    }

    #[test]
    fn test_month_is_wall_clock_span() {
        let one_month = DurationComponents {
            months: 1,
            ..Default::default()
        };
        // Spans a DST switch in most zones; still whole 24 h days
        let resolved = one_month.resolve(at(2025, 3, 1)).unwrap();
        assert_eq!(resolved.total_ms, 31 * DAY_MS);
        assert_eq!(resolved.total_ms % HOUR_MS, 0);
    }

    #[test]
    fn test_month_end_clamps() {
        let one_month = DurationComponents {
            months: 1,
            ..Default::default()
        };
        // Jan 31 + 1 month lands on Feb 28
        let resolved = one_month.resolve(at(2025, 1, 31)).unwrap();
        assert_eq!(resolved.total_ms, 28 * DAY_MS);
    }

    #[test]
    fn test_fixed_units() {
        let d = DurationComponents {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
            ..Default::default()
        };
        let resolved = d.resolve(at(2025, 6, 1)).unwrap();
        assert_eq!(
            resolved.total_ms,
            DAY_MS + 2 * HOUR_MS + 3 * MINUTE_MS + 4 * SECOND_MS
        );
        assert_eq!(resolved.months_ms, 0);
        assert_eq!(resolved.tail_ms(CountdownUnit::Minutes), 3 * MINUTE_MS + 4 * SECOND_MS);
        assert_eq!(resolved.tail_ms(CountdownUnit::Months), resolved.total_ms);
    }

    #[test]
    fn test_zero_rejected() {
        let err = DurationComponents::default().resolve(at(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, ClockError::Validation(_)));
    }

    #[test]
    fn test_huge_months_rejected() {
        let d = DurationComponents {
            months: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            d.resolve(at(2025, 6, 1)),
            Err(ClockError::Validation(_))
        ));
    }

    #[test]
    fn test_unit_ms_month_average() {
        let d = DurationComponents {
            months: 2,
            ..Default::default()
        };
        // Jan 15 -> Mar 15 2025 is 59 days
        let resolved = d.resolve(at(2025, 1, 15)).unwrap();
        assert_eq!(resolved.months_ms, 59 * DAY_MS);
        assert_eq!(resolved.unit_ms(CountdownUnit::Months), 59 * DAY_MS / 2);
    }

    #[test]
    fn test_largest_unit_and_parse() {
        let d = DurationComponents::default().with(CountdownUnit::Minutes, 4);
        assert_eq!(d.largest_unit(), Some(CountdownUnit::Minutes));
        assert_eq!("Month".parse::<CountdownUnit>().unwrap(), CountdownUnit::Months);
        assert_eq!("seconds".parse::<CountdownUnit>().unwrap(), CountdownUnit::Seconds);
        assert!("weeks".parse::<CountdownUnit>().is_err());
    }
}
