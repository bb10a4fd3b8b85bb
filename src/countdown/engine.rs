//! Countdown state machine.
//!
//! Wall-clock driven and thread-free: the caller hands in `now` (epoch
//! milliseconds) on every toggle and tick.
//!
//! ```text
//! Idle -> Running -> (Paused | Finished)
//! Paused -> Running
//! any -> Idle (reset)
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::duration::{DurationComponents, ResolvedDuration};
use crate::error::{ClockError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Notable transitions reported by `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownEvent {
    /// Ran out and stopped
    Finished,
    /// Ran out and started over (repeat mode)
    Restarted,
}

/// Countdown owned by a `CountdownEngine`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    status: CountdownStatus,
    duration: ResolvedDuration,
    remaining_ms: u64,
    /// Set exactly while running
    last_tick_ms: Option<i64>,
}

impl CountdownState {
    fn new(duration: ResolvedDuration) -> Self {
        Self {
            status: CountdownStatus::Idle,
            remaining_ms: duration.total_ms,
            duration,
            last_tick_ms: None,
        }
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn target_duration_ms(&self) -> u64 {
        self.duration.total_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.duration.total_ms - self.remaining_ms
    }

    pub fn last_tick_ms(&self) -> Option<i64> {
        self.last_tick_ms
    }

    /// Components as entered
    pub fn entered(&self) -> &DurationComponents {
        &self.duration.components
    }

    pub fn duration(&self) -> &ResolvedDuration {
        &self.duration
    }

    /// Subtract time since the last tick; clock steps backward count as zero
    fn apply_elapsed(&mut self, now_ms: i64) {
        if let Some(last) = self.last_tick_ms {
            let elapsed = now_ms.saturating_sub(last).max(0) as u64;
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
        }
    }

    /// Handle running out; returns what happened
    fn expire(&mut self, repeat: bool, now_ms: i64) -> CountdownEvent {
        if repeat {
            self.remaining_ms = self.duration.total_ms;
            if self.status == CountdownStatus::Running {
                self.last_tick_ms = Some(now_ms);
            }
            CountdownEvent::Restarted
        } else {
            self.status = CountdownStatus::Finished;
            self.remaining_ms = 0;
            self.last_tick_ms = None;
            CountdownEvent::Finished
        }
    }
}

/// Countdown timer engine
#[derive(Debug, Clone, Default)]
pub struct CountdownEngine {
    state: Option<CountdownState>,
    repeat: bool,
}

impl CountdownEngine {
    pub fn new(repeat: bool) -> Self {
        Self {
            state: None,
            repeat,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// `None` until a duration has been entered
    pub fn state(&self) -> Option<&CountdownState> {
        self.state.as_ref()
    }

    pub fn status(&self) -> Option<CountdownStatus> {
        self.state.as_ref().map(|s| s.status)
    }

    pub fn remaining_ms(&self) -> Option<u64> {
        self.state.as_ref().map(|s| s.remaining_ms)
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter a new duration; only while idle (or before the first entry)
    ///
    /// `anchor` is the local date/time months are counted from.
    pub fn set_duration(
        &mut self,
        components: DurationComponents,
        anchor: NaiveDateTime,
    ) -> Result<()> {
        if let Some(state) = &self.state {
            if state.status != CountdownStatus::Idle {
                return Err(ClockError::InvalidOperation(format!(
                    "cannot change the duration while {:?}; reset first",
                    state.status
                )));
            }
        }
        let duration = components.resolve(anchor)?;
        log::info!(
            "Countdown set to {} ({} ms)",
            components,
            duration.total_ms
        );
        self.state = Some(CountdownState::new(duration));
        Ok(())
    }

    /// Start, pause or resume
    pub fn toggle(&mut self, now_ms: i64) -> Result<CountdownStatus> {
        let repeat = self.repeat;
        let state = self.state.as_mut().ok_or_else(|| {
            ClockError::InvalidOperation("no countdown duration has been set".to_string())
        })?;

        match state.status {
            CountdownStatus::Idle | CountdownStatus::Paused => {
                state.status = CountdownStatus::Running;
                state.last_tick_ms = Some(now_ms);
                log::info!("Countdown running ({} ms left)", state.remaining_ms);
            }
            CountdownStatus::Running => {
                state.apply_elapsed(now_ms);
                state.status = CountdownStatus::Paused;
                state.last_tick_ms = None;
                // Drained before any tick saw it
                if state.remaining_ms == 0 {
                    state.expire(repeat, now_ms);
                }
                log::info!(
                    "Countdown {:?} ({} ms left)",
                    state.status,
                    state.remaining_ms
                );
            }
            CountdownStatus::Finished => {
                return Err(ClockError::InvalidOperation(
                    "countdown has finished; reset it first".to_string(),
                ));
            }
        }
        Ok(state.status)
    }

    /// Advance a running countdown to `now_ms`
    pub fn tick(&mut self, now_ms: i64) -> Option<CountdownEvent> {
        let repeat = self.repeat;
        let state = self.state.as_mut()?;
        if state.status != CountdownStatus::Running {
            return None;
        }

        state.apply_elapsed(now_ms);
        state.last_tick_ms = Some(now_ms);

        if state.remaining_ms == 0 {
            let event = state.expire(repeat, now_ms);
            log::info!("Countdown {:?}", event);
            return Some(event);
        }
        None
    }

    /// Back to idle with the full duration; idempotent
    pub fn reset(&mut self) {
        if let Some(state) = self.state.as_mut() {
            if state.status != CountdownStatus::Idle {
                log::info!("Countdown reset from {:?}", state.status);
            }
            state.status = CountdownStatus::Idle;
            state.remaining_ms = state.duration.total_ms;
            state.last_tick_ms = None;
        }
    }
}
