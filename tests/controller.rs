//! Headless scenario tests for the timer controller.
//!
//! The controller is driven directly through its tick and deferred-alert
//! hooks, with a recording dispatcher double and fixed-value samplers, so
//! no timing or runtime is involved.

use std::sync::Arc;

use parking_lot::Mutex;

use chance_timer::alert::{AlertDispatcher, AlertError};
use chance_timer::sampler::TargetSampler;
use chance_timer::state::{Bounds, CompletionPolicy, Phase, TimerController};

/// Dispatcher double that records every interaction
#[derive(Default)]
struct RecordingDispatcher {
    deny_permission: bool,
    fail_scheduling: bool,
    scheduled: Mutex<Vec<f64>>,
    sounds: Mutex<Vec<String>>,
    cancels: Mutex<usize>,
}

impl RecordingDispatcher {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn denying() -> Arc<Self> {
        Arc::new(Self {
            deny_permission: true,
            ..Self::default()
        })
    }

    fn failing_scheduler() -> Arc<Self> {
        Arc::new(Self {
            fail_scheduling: true,
            ..Self::default()
        })
    }

    fn scheduled(&self) -> Vec<f64> {
        self.scheduled.lock().clone()
    }

    fn sound_count(&self) -> usize {
        self.sounds.lock().len()
    }

    fn cancel_count(&self) -> usize {
        *self.cancels.lock()
    }
}

impl AlertDispatcher for RecordingDispatcher {
    fn request_permission(&self) -> bool {
        !self.deny_permission
    }

    fn schedule_deferred(
        &self,
        after_seconds: f64,
        _title: &str,
        _body: &str,
        _sound_id: &str,
    ) -> Result<(), AlertError> {
        if self.fail_scheduling {
            return Err(AlertError::SchedulingFailed("double says no".to_string()));
        }
        self.scheduled.lock().push(after_seconds);
        Ok(())
    }

    fn cancel_all(&self) {
        *self.cancels.lock() += 1;
    }

    fn play_sound(&self, sound_id: &str) -> Result<(), AlertError> {
        self.sounds.lock().push(sound_id.to_string());
        Ok(())
    }
}

/// Sampler double returning the same target every draw
struct FixedSampler(f64);

impl TargetSampler for FixedSampler {
    fn sample(&mut self, _lower_secs: f64, _upper_secs: f64) -> f64 {
        self.0
    }
}

/// Sampler double returning a scripted sequence of targets
struct SequenceSampler {
    targets: Vec<f64>,
    next: usize,
}

impl SequenceSampler {
    fn new(targets: Vec<f64>) -> Self {
        Self { targets, next: 0 }
    }
}

impl TargetSampler for SequenceSampler {
    fn sample(&mut self, _lower_secs: f64, _upper_secs: f64) -> f64 {
        let target = self.targets[self.next];
        self.next += 1;
        target
    }
}

fn controller(
    policy: CompletionPolicy,
    dispatcher: &Arc<RecordingDispatcher>,
    target: f64,
) -> TimerController {
    TimerController::new(
        Bounds::new(50, 70),
        policy,
        Arc::clone(dispatcher) as Arc<dyn AlertDispatcher>,
        Box::new(FixedSampler(target)),
    )
}

fn tick_n(controller: &TimerController, n: usize) {
    for _ in 0..n {
        controller.on_tick();
    }
}

#[test]
fn finalizes_on_first_tick_strictly_past_target() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.set_hidden(true);
    timer.start().unwrap();
    assert_eq!(dispatcher.scheduled(), vec![65.0]);

    tick_n(&timer, 65);
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.phase, Phase::Active);
    assert_eq!(snapshot.elapsed_seconds, Some(65));
    assert_eq!(dispatcher.sound_count(), 0, "65 == 65.0 is not strictly past");

    timer.on_tick();
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(snapshot.elapsed_seconds, None);
    assert_eq!(dispatcher.sound_count(), 1);
}

#[test]
fn visible_session_runs_past_target_until_hidden() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.start().unwrap();

    tick_n(&timer, 1000);
    assert_eq!(timer.snapshot().phase, Phase::Active);
    assert_eq!(timer.snapshot().elapsed_seconds, Some(1000));
    assert_eq!(dispatcher.sound_count(), 0);

    // Hiding alone does not retroactively finalize
    timer.set_hidden(true);
    assert_eq!(timer.snapshot().phase, Phase::Active);
    assert_eq!(dispatcher.sound_count(), 0);

    // The next tick evaluated while hidden does
    timer.on_tick();
    assert_eq!(timer.snapshot().phase, Phase::Idle);
    assert_eq!(dispatcher.sound_count(), 1);
}

#[test]
fn stop_on_complete_ignores_visibility() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::StopOnComplete, &dispatcher, 10.0);
    timer.start().unwrap();

    tick_n(&timer, 10);
    assert_eq!(timer.snapshot().phase, Phase::Active);

    timer.on_tick();
    assert_eq!(timer.snapshot().phase, Phase::Idle);
    assert_eq!(dispatcher.sound_count(), 1);
}

#[test]
fn start_then_stop_cancels_all_pending_alerts() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.start().unwrap();
    timer.stop();

    assert_eq!(dispatcher.scheduled().len(), 1);
    assert!(dispatcher.cancel_count() >= 1);
    assert_eq!(dispatcher.sound_count(), 0);

    // A deferred alert that somehow delivers after cancellation is ignored
    timer.on_deferred_alert_fired();
    assert_eq!(dispatcher.sound_count(), 0);
    assert_eq!(timer.snapshot().phase, Phase::Idle);
}

#[test]
fn stop_is_idempotent() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.start().unwrap();
    timer.stop();
    timer.stop();

    assert_eq!(dispatcher.cancel_count(), 1, "second stop must be a no-op");
    assert_eq!(timer.snapshot().phase, Phase::Idle);
}

#[test]
fn start_while_active_is_a_noop() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.start().unwrap();
    tick_n(&timer, 5);
    timer.start().unwrap();

    assert_eq!(dispatcher.scheduled().len(), 1, "no duplicate alert");
    assert_eq!(timer.snapshot().elapsed_seconds, Some(5), "no session reset");
}

#[test]
fn permission_denied_reverts_to_idle() {
    let dispatcher = RecordingDispatcher::denying();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);

    let result = timer.start();
    assert!(matches!(result, Err(AlertError::PermissionDenied)));
    assert_eq!(timer.snapshot().phase, Phase::Idle);
    assert_eq!(dispatcher.scheduled().len(), 0);
}

#[test]
fn scheduling_failure_keeps_session_on_ticks() {
    let dispatcher = RecordingDispatcher::failing_scheduler();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 3.0);
    timer.set_hidden(true);

    timer.start().unwrap();
    assert_eq!(timer.snapshot().phase, Phase::Active);

    tick_n(&timer, 4);
    assert_eq!(timer.snapshot().phase, Phase::Idle);
    assert_eq!(dispatcher.sound_count(), 1, "tick-based completion still alerts");
}

#[test]
fn bound_setters_are_noops_while_active() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.start().unwrap();

    assert!(!timer.set_lower_bound(10));
    assert!(!timer.set_upper_bound(160));
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.lower_minutes, 50);
    assert_eq!(snapshot.upper_minutes, 70);

    timer.stop();
    assert!(timer.set_lower_bound(10));
    assert!(timer.set_upper_bound(160));
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.lower_minutes, 10);
    assert_eq!(snapshot.upper_minutes, 160);
}

#[test]
fn simultaneous_deferred_fire_and_tick_finalize_once() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.set_hidden(true);
    timer.start().unwrap();
    tick_n(&timer, 65);

    // Deferred fire lands first, the finalizing tick right behind it
    timer.on_deferred_alert_fired();
    timer.on_tick();

    assert_eq!(dispatcher.sound_count(), 1, "exactly one finalize");
    assert_eq!(timer.snapshot().phase, Phase::Idle);
}

#[test]
fn simultaneous_tick_and_deferred_fire_finalize_once() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.set_hidden(true);
    timer.start().unwrap();
    tick_n(&timer, 66);

    // Opposite arrival order: the tick finalized, the late fire is a no-op
    timer.on_deferred_alert_fired();

    assert_eq!(dispatcher.sound_count(), 1, "exactly one finalize");
    assert_eq!(timer.snapshot().phase, Phase::Idle);
}

#[test]
fn deferred_fire_finalizes_even_while_visible() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 65.0);
    timer.start().unwrap();
    tick_n(&timer, 64);

    // OS delivery does not consult the visibility gate
    timer.on_deferred_alert_fired();
    assert_eq!(timer.snapshot().phase, Phase::Idle);
    assert_eq!(dispatcher.sound_count(), 1);
}

#[test]
fn rearm_policy_restarts_session_on_deferred_fire() {
    let dispatcher = RecordingDispatcher::new();
    let timer = TimerController::new(
        Bounds::new(50, 70),
        CompletionPolicy::RearmOnAlert,
        Arc::clone(&dispatcher) as Arc<dyn AlertDispatcher>,
        Box::new(SequenceSampler::new(vec![65.0, 30.0])),
    );
    timer.start().unwrap();
    tick_n(&timer, 10);

    timer.on_deferred_alert_fired();
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.phase, Phase::Active, "re-armed instead of stopping");
    assert_eq!(snapshot.elapsed_seconds, Some(0), "fresh session");
    assert_eq!(dispatcher.sound_count(), 1);
    assert_eq!(dispatcher.scheduled(), vec![65.0, 30.0], "new deferred alert armed");

    // The re-armed session still completes through the gated tick path
    timer.set_hidden(true);
    tick_n(&timer, 31);
    assert_eq!(timer.snapshot().phase, Phase::Idle);
    assert_eq!(dispatcher.sound_count(), 2);
}

#[test]
fn elapsed_counter_tracks_ticks() {
    let dispatcher = RecordingDispatcher::new();
    let timer = controller(CompletionPolicy::GateOnHidden, &dispatcher, 600.0);
    timer.start().unwrap();
    assert_eq!(timer.snapshot().elapsed_seconds, Some(0));

    tick_n(&timer, 42);
    assert_eq!(timer.snapshot().elapsed_seconds, Some(42));
}
