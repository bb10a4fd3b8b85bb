//! Per-frame time sampling
//!
//! Turns an instant (clock mode) or the countdown state (countdown mode) into
//! one reading per ring: how far the ring is filled and what its label says.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::arc::{ArcDefinition, ArcDefinitionRegistry, ArcKey};
use crate::countdown::{CountdownState, CountdownStatus, CountdownUnit};
use crate::settings::{HourFormat, LabelMode};

/// What the face is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    #[default]
    Clock,
    Countdown,
}

impl ClockMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockMode::Clock => "clock",
            ClockMode::Countdown => "countdown",
        }
    }
}

/// One ring's reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitReading {
    pub key: ArcKey,
    pub value: f64,
    /// Value at which the ring is full
    pub span: f64,
    pub label: String,
}

impl UnitReading {
    /// Filled share of the ring, always within 0..=1
    pub fn fraction(&self) -> f64 {
        if self.span <= 0.0 || !self.value.is_finite() {
            return 0.0;
        }
        (self.value / self.span).clamp(0.0, 1.0)
    }
}

/// Readings for one frame, in catalogue order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockSample {
    pub mode: ClockMode,
    readings: Vec<UnitReading>,
}

impl ClockSample {
    pub fn get(&self, key: ArcKey) -> Option<&UnitReading> {
        self.readings.iter().find(|r| r.key == key)
    }

    pub fn readings(&self) -> &[UnitReading] {
        &self.readings
    }

    pub fn keys(&self) -> Vec<ArcKey> {
        self.readings.iter().map(|r| r.key).collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Inputs of one sampling pass
#[derive(Debug, Clone, Copy)]
pub struct SampleContext<'a> {
    /// Local wall-clock time
    pub now: NaiveDateTime,
    pub countdown: Option<&'a CountdownState>,
    pub registry: &'a ArcDefinitionRegistry,
}

/// Days in `month` (1-based) of `year`
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| {
            first
                .checked_add_months(Months::new(1))
                .map(|next| next.signed_duration_since(first).num_days() as u32)
        })
        .unwrap_or(31)
}

/// ISO weeks (52 or 53) in ISO year `year`
pub fn iso_weeks_in_year(year: i32) -> u32 {
    // Dec 28 always falls in the last ISO week of its year
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// Enclosing unit a countdown unit cycles within
fn parent_unit(unit: CountdownUnit) -> Option<CountdownUnit> {
    match unit {
        CountdownUnit::Months => None,
        CountdownUnit::Days => Some(CountdownUnit::Months),
        CountdownUnit::Hours => Some(CountdownUnit::Days),
        CountdownUnit::Minutes => Some(CountdownUnit::Hours),
        CountdownUnit::Seconds => Some(CountdownUnit::Minutes),
    }
}

/// Samples the face for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSampler {
    pub hour_format: HourFormat,
    pub label_mode: LabelMode,
}

impl TimeSampler {
    pub fn new(hour_format: HourFormat, label_mode: LabelMode) -> Self {
        Self {
            hour_format,
            label_mode,
        }
    }

    /// Readings for the visible arcs
    pub fn sample(&self, mode: ClockMode, ctx: &SampleContext<'_>) -> ClockSample {
        let readings = match mode {
            ClockMode::Clock => ctx
                .registry
                .list_arcs()
                .iter()
                .filter(|def| def.visible)
                .map(|def| self.clock_reading(def, ctx.now))
                .collect(),
            ClockMode::Countdown => {
                let mut readings = self.countdown_readings(ctx.countdown);
                readings.retain(|r| ctx.registry.is_visible(r.key));
                readings.sort_by_key(|r| r.key.index());
                readings
            }
        };
        ClockSample { mode, readings }
    }

    // ── Clock mode ───────────────────────────────────────────────────

    fn clock_reading(&self, def: &ArcDefinition, now: NaiveDateTime) -> UnitReading {
        let key = def.key;
        let second = now.second();
        let minute = now.minute();
        let hour = now.hour();
        let day = now.day();
        let month0 = now.month0();
        let month_days = days_in_month(now.year(), now.month());
        // Leap seconds report nanos >= 1e9
        let millis = (now.nanosecond() / 1_000_000).min(999);
        let remainder = self.label_mode == LabelMode::Remainder;

        let minute_frac = f64::from(minute) / 60.0;

        let (value, span, label) = match key {
            ArcKey::Seconds => {
                let label = if remainder {
                    (59 - second).to_string()
                } else {
                    format!("{second:02}")
                };
                (f64::from(second) + f64::from(millis) / 1000.0, def.span(), label)
            }
            ArcKey::Minutes => {
                let label = if remainder {
                    (59 - minute).to_string()
                } else {
                    format!("{minute:02}")
                };
                (f64::from(minute) + f64::from(second) / 60.0, def.span(), label)
            }
            ArcKey::Hours => {
                let turn = self.hour_format.hours_per_turn();
                let h = hour % turn;
                let label = match self.hour_format {
                    _ if remainder => (turn - 1 - h).to_string(),
                    HourFormat::TwentyFourHour => format!("{hour:02}"),
                    HourFormat::TwelveHour => (if h == 0 { 12 } else { h }).to_string(),
                };
                (f64::from(h) + minute_frac, f64::from(turn), label)
            }
            ArcKey::Day => {
                let label = if remainder {
                    (month_days - day).to_string()
                } else {
                    day.to_string()
                };
                let value = f64::from(day - 1) + (f64::from(hour) + minute_frac) / 24.0;
                (value, f64::from(month_days), label)
            }
            ArcKey::Month => {
                let label = if remainder {
                    (11 - month0).to_string()
                } else {
                    format!("{:02}", month0 + 1)
                };
                let value = f64::from(month0) + f64::from(day) / f64::from(month_days);
                (value, def.span(), label)
            }
            ArcKey::DayOfWeek => {
                let dow = now.weekday().number_from_monday();
                let label = if remainder {
                    (7 - dow).to_string()
                } else {
                    dow.to_string()
                };
                (f64::from(dow), def.span(), label)
            }
            ArcKey::WeekOfYear => {
                let iso = now.iso_week();
                let weeks = iso_weeks_in_year(iso.year());
                let label = if remainder {
                    (weeks - iso.week()).to_string()
                } else {
                    iso.week().to_string()
                };
                (f64::from(iso.week()), f64::from(weeks), label)
            }
        };

        let mut reading = UnitReading {
            key,
            value,
            span,
            label,
        };
        if self.label_mode == LabelMode::Percentage {
            reading.label = format!("{}%", (reading.fraction() * 100.0).floor());
        }
        reading
    }

    // ── Countdown mode ───────────────────────────────────────────────

    fn countdown_readings(&self, state: Option<&CountdownState>) -> Vec<UnitReading> {
        let Some(state) = state else {
            return CountdownUnit::ALL
                .into_iter()
                .map(|unit| UnitReading {
                    key: unit.arc_key(),
                    value: 0.0,
                    span: 1.0,
                    label: format_count(unit, 0),
                })
                .collect();
        };

        let largest = state
            .entered()
            .largest_unit()
            .unwrap_or(CountdownUnit::Seconds);
        let finished = state.status() == CountdownStatus::Finished;
        let duration = state.duration();
        let remaining = if finished { 0 } else { state.remaining_ms() };
        let elapsed = state.elapsed_ms();

        CountdownUnit::ALL
            .into_iter()
            .skip_while(|&u| u != largest)
            .map(|unit| {
                let unit_ms = duration.unit_ms(unit).max(1);
                let tail = duration.tail_ms(unit);
                let parent_ms = parent_unit(unit).map(|p| duration.unit_ms(p).max(1));

                let (value, span) = match parent_ms {
                    _ if remaining == 0 => (0.0, ratio(tail.max(unit_ms), unit_ms)),
                    // Still inside what was entered at this unit
                    _ if elapsed < tail => (ratio(tail - elapsed, unit_ms), ratio(tail, unit_ms)),
                    Some(parent) => {
                        let mut cycle = remaining % parent;
                        if cycle == 0 {
                            cycle = parent;
                        }
                        (ratio(cycle, unit_ms), ratio(parent, unit_ms))
                    }
                    None => (ratio(remaining, unit_ms), ratio(tail.max(unit_ms), unit_ms)),
                };

                let count = match parent_ms {
                    Some(parent) if unit != largest => (remaining % parent) / unit_ms,
                    _ => remaining / unit_ms,
                };

                UnitReading {
                    key: unit.arc_key(),
                    value,
                    span,
                    label: format_count(unit, count),
                }
            })
            .collect()
    }
}

fn ratio(ms: u64, unit_ms: u64) -> f64 {
    ms as f64 / unit_ms as f64
}

fn format_count(unit: CountdownUnit, count: u64) -> String {
    match unit {
        CountdownUnit::Hours | CountdownUnit::Minutes | CountdownUnit::Seconds => {
            format!("{count:02}")
        }
        CountdownUnit::Months | CountdownUnit::Days => count.to_string(),
    }
}
