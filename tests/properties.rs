//! Property-based tests for the clock face, palette and countdown.
//!
//! - every drawn sweep is `fraction * 360` with the fraction inside 0..=1
//! - inverse arcs cover exactly the rest of the turn
//! - reversing a palette twice is the identity
//! - countdown time only moves forward while running, never while paused
//! - reset is idempotent and restores the target

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use proptest::prelude::*;

use polar_clock::countdown::{CountdownEngine, CountdownStatus, CountdownUnit, DurationComponents};
use polar_clock::face::{ArcDefinitionRegistry, ArcKey, ClockMode, SampleContext, TimeSampler};
use polar_clock::platform::ManualClock;
use polar_clock::renderer::{ArcRenderer, RecordingSurface};
use polar_clock::theme::{PRESETS, resolve_palette};
use polar_clock::{HourFormat, LabelMode, RenderLoop, Settings, UiEvent};

// =============================================================================
// Strategies
// =============================================================================

/// 2000-01-01 .. 2100-01-01
fn arb_instant() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (946_684_800_000i64..4_102_444_800_000, -12i32..=14).prop_map(|(ms, hours)| {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap();
        DateTime::from_timestamp_millis(ms)
            .unwrap()
            .with_timezone(&offset)
    })
}

fn arb_registry() -> impl Strategy<Value = ArcDefinitionRegistry> {
    any::<[bool; 7]>().prop_map(|mask| {
        let mut registry = ArcDefinitionRegistry::new();
        for (key, visible) in ArcKey::ALL.into_iter().zip(mask) {
            registry.set_visible(key, visible);
        }
        registry
    })
}

fn arb_sampler() -> impl Strategy<Value = TimeSampler> {
    (
        prop_oneof![Just(HourFormat::TwelveHour), Just(HourFormat::TwentyFourHour)],
        prop_oneof![
            Just(LabelMode::Standard),
            Just(LabelMode::Percentage),
            Just(LabelMode::Remainder)
        ],
    )
        .prop_map(|(hour_format, label_mode)| TimeSampler::new(hour_format, label_mode))
}

fn arb_duration() -> impl Strategy<Value = DurationComponents> {
    (0u32..=3, 0u32..=40, 0u32..=30, 0u32..=90, 0u32..=90)
        .prop_map(|(months, days, hours, minutes, seconds)| DurationComponents {
            months,
            days,
            hours,
            minutes,
            seconds,
        })
        .prop_filter("non-zero duration", |d| !d.is_zero())
}

fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 31)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

// =============================================================================
// Face
// =============================================================================

proptest! {
    #[test]
    fn clock_sweeps_track_fractions(
        now in arb_instant(),
        registry in arb_registry(),
        sampler in arb_sampler(),
    ) {
        let ctx = SampleContext { now: now.naive_local(), countdown: None, registry: &registry };
        let sample = sampler.sample(ClockMode::Clock, &ctx);
        let palette = resolve_palette("default", false, &registry).unwrap();
        let mut surface = RecordingSurface::new();
        ArcRenderer::default().render(&sample, &palette, &registry, &mut surface);

        prop_assert_eq!(surface.keys(), registry.visible_keys());
        for i in &surface.instructions {
            prop_assert!((0.0..=1.0).contains(&i.fraction), "{:?}", i);
            prop_assert!((i.sweep_degrees - i.fraction as f32 * 360.0).abs() < 1e-3);
        }
    }

    #[test]
    fn inverse_sweeps_cover_the_rest(
        now in arb_instant(),
        registry in arb_registry(),
        zero in -360.0f32..=360.0,
    ) {
        let ctx = SampleContext { now: now.naive_local(), countdown: None, registry: &registry };
        let sample = TimeSampler::default().sample(ClockMode::Clock, &ctx);
        let palette = resolve_palette("default", false, &registry).unwrap();
        let renderer = ArcRenderer { zero_degrees: zero, inverse: true, ..ArcRenderer::default() };
        let mut surface = RecordingSurface::new();
        renderer.render(&sample, &palette, &registry, &mut surface);

        for i in &surface.instructions {
            let filled = i.fraction as f32 * 360.0;
            prop_assert!((i.sweep_degrees + filled - 360.0).abs() < 1e-3, "{:?}", i);
            prop_assert!((i.start_degrees - zero - filled).abs() < 1e-3, "{:?}", i);
            let band = i.band();
            prop_assert!((-180.0..180.0).contains(&band.start_degrees));
        }
    }

    #[test]
    fn countdown_fractions_stay_in_range(
        duration in arb_duration(),
        elapsed_ms in 0i64..200_000_000_000,
    ) {
        let mut engine = CountdownEngine::default();
        engine.set_duration(duration, anchor()).unwrap();
        engine.toggle(0).unwrap();
        engine.tick(elapsed_ms);

        let registry = ArcDefinitionRegistry::new();
        let ctx = SampleContext { now: anchor(), countdown: engine.state(), registry: &registry };
        let sample = TimeSampler::default().sample(ClockMode::Countdown, &ctx);
        for reading in sample.readings() {
            let f = reading.fraction();
            prop_assert!((0.0..=1.0).contains(&f), "{:?}", reading);
        }
        if engine.status() == Some(CountdownStatus::Finished) {
            prop_assert!(sample.readings().iter().all(|r| r.fraction() == 0.0));
        }
    }
}

// =============================================================================
// Palette
// =============================================================================

proptest! {
    #[test]
    fn reversal_is_involutive(preset in 0usize..PRESETS.len(), registry in arb_registry()) {
        let name = PRESETS[preset].name;
        let forward = resolve_palette(name, false, &registry).unwrap();
        let mut reversed = resolve_palette(name, true, &registry).unwrap().colors();
        reversed.reverse();
        prop_assert_eq!(forward.colors(), reversed);
        prop_assert_eq!(forward.len(), registry.visible_keys().len());
    }

    #[test]
    fn preset_lookup_ignores_case(preset in 0usize..PRESETS.len(), upper in any::<bool>()) {
        let name = PRESETS[preset].name;
        let query = if upper { name.to_uppercase() } else { name.to_string() };
        let registry = ArcDefinitionRegistry::new();
        prop_assert_eq!(
            resolve_palette(&query, false, &registry).unwrap(),
            resolve_palette(name, false, &registry).unwrap()
        );
    }
}

// =============================================================================
// Countdown
// =============================================================================

proptest! {
    #[test]
    fn remaining_never_increases_while_running(
        duration in arb_duration(),
        steps in prop::collection::vec(-5_000i64..120_000, 1..40),
    ) {
        let mut engine = CountdownEngine::default();
        engine.set_duration(duration, anchor()).unwrap();
        let target = engine.state().unwrap().target_duration_ms();

        let mut now = 1_000_000i64;
        engine.toggle(now).unwrap();
        let mut last = engine.remaining_ms().unwrap();
        for step in steps {
            now += step;
            engine.tick(now);
            let remaining = engine.remaining_ms().unwrap();
            prop_assert!(remaining <= last);
            prop_assert!(remaining <= target);
            last = remaining;
        }
    }

    #[test]
    fn paused_countdown_is_frozen(
        duration in arb_duration(),
        run_ms in 0i64..10_000,
        steps in prop::collection::vec(0i64..1_000_000, 1..20),
    ) {
        let mut engine = CountdownEngine::default();
        engine.set_duration(duration, anchor()).unwrap();
        engine.toggle(0).unwrap();
        engine.tick(run_ms);
        // Already ran out
        if engine.toggle(run_ms) != Ok(CountdownStatus::Paused) {
            return Ok(());
        }
        let frozen = engine.remaining_ms();
        let mut now = run_ms;
        for step in steps {
            now += step;
            prop_assert_eq!(engine.tick(now), None);
            prop_assert_eq!(engine.remaining_ms(), frozen);
        }
    }

    #[test]
    fn reset_is_idempotent(
        duration in arb_duration(),
        run_ms in 0i64..10_000_000,
        pause in any::<bool>(),
    ) {
        let mut engine = CountdownEngine::default();
        engine.set_duration(duration, anchor()).unwrap();
        engine.toggle(0).unwrap();
        engine.tick(run_ms);
        if pause {
            let _ = engine.toggle(run_ms + 1);
        }

        engine.reset();
        let once = engine.state().cloned();
        engine.reset();
        prop_assert_eq!(engine.state().cloned(), once.clone());

        let state = once.unwrap();
        prop_assert_eq!(state.status(), CountdownStatus::Idle);
        prop_assert_eq!(state.remaining_ms(), state.target_duration_ms());
        prop_assert_eq!(state.last_tick_ms(), None);
    }
}

// =============================================================================
// Render loop
// =============================================================================

proptest! {
    #[test]
    fn rejected_events_leave_draft_alone(value in i64::MIN..0) {
        let start = FixedOffset::east_opt(0).unwrap().from_utc_datetime(&anchor());
        let mut app = RenderLoop::new(&Settings::default(), ManualClock::new(start)).unwrap();
        app.dispatch(UiEvent::SetCountdownComponent(CountdownUnit::Hours, 1))
            .unwrap();
        let before = *app.draft();
        let rejected = app.dispatch(UiEvent::SetCountdownComponent(CountdownUnit::Minutes, value));
        prop_assert!(rejected.is_err());
        prop_assert_eq!(*app.draft(), before);
    }
}
