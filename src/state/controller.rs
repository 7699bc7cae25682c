//! Timer controller state machine

use std::sync::Arc;

use clap::ValueEnum;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::alert::{AlertDispatcher, AlertError, ALERT_BODY, ALERT_SOUND, ALERT_TITLE};
use crate::sampler::TargetSampler;

use super::{Bounds, ControllerSnapshot, Phase, Session};

/// How a running session is allowed to end.
///
/// The gate exists because the alert is meant to surprise a user who is not
/// looking: under the gated policies a session keeps counting past its
/// target until a tick lands while the readout is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionPolicy {
    /// A tick past the target finalizes regardless of visibility
    StopOnComplete,
    /// A tick past the target finalizes only while the readout is hidden
    GateOnHidden,
    /// Like gate-on-hidden, but a deferred alert re-arms a fresh session
    /// instead of stopping, so the alert repeats until the user stops it
    RearmOnAlert,
}

/// Everything the stimuli mutate, serialized behind one lock
struct Inner {
    bounds: Bounds,
    hidden: bool,
    session: Option<Session>,
    sampler: Box<dyn TargetSampler>,
}

/// Owns the current session and decides when the alert fires.
///
/// All three stimuli (ticks, the deferred-alert-fired hook, and user
/// commands) serialize through the inner lock, so the tick path and the
/// deferred path can arrive in either order: whichever observes the live
/// session first does the finalize/re-arm work and the other is a no-op.
/// Every mutation publishes a [`ControllerSnapshot`] over a watch channel
/// for the tick task and the HTTP layer to observe.
pub struct TimerController {
    policy: CompletionPolicy,
    dispatcher: Arc<dyn AlertDispatcher>,
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<ControllerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<ControllerSnapshot>,
}

impl TimerController {
    /// Create an idle controller with the given collaborators
    pub fn new(
        bounds: Bounds,
        policy: CompletionPolicy,
        dispatcher: Arc<dyn AlertDispatcher>,
        sampler: Box<dyn TargetSampler>,
    ) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(ControllerSnapshot::idle(bounds, false));
        Self {
            policy,
            dispatcher,
            inner: Mutex::new(Inner {
                bounds,
                hidden: false,
                session: None,
                sampler,
            }),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// The configured completion policy
    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    /// Current observable state
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Begin a session: sample a target and arm the deferred alert.
    ///
    /// No-op while a session is already active. Returns
    /// [`AlertError::PermissionDenied`] (and stays idle) if the dispatcher
    /// refuses authorization; a deferred-alert scheduling failure is only
    /// logged and the session continues on tick-based completion.
    pub fn start(&self) -> Result<(), AlertError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.session.is_some() {
            debug!("Start requested while a session is active, ignoring");
            return Ok(());
        }

        if !self.dispatcher.request_permission() {
            warn!("Alert permission denied, session not started");
            return Err(AlertError::PermissionDenied);
        }

        let (lower, upper) = inner.bounds.range_seconds();
        let target = inner.sampler.sample(lower, upper);
        inner.session = Some(Session::new(target));
        info!(
            "Session started: target {:.1}s drawn from {}..{} min",
            target,
            inner.bounds.lower_minutes(),
            inner.bounds.upper_minutes()
        );

        if let Err(e) =
            self.dispatcher
                .schedule_deferred(target, ALERT_TITLE, ALERT_BODY, ALERT_SOUND)
        {
            warn!(
                "Failed to schedule deferred alert, continuing on ticks only: {}",
                e
            );
        }

        self.publish(inner, Phase::Active);
        Ok(())
    }

    /// End the session without alerting. Idempotent.
    pub fn stop(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.session.is_none() {
            debug!("Stop requested with no active session, ignoring");
            return;
        }

        inner.session = None;
        self.dispatcher.cancel_all();
        info!("Session stopped");
        self.publish(inner, Phase::Idle);
    }

    /// Advance elapsed time by one second and finalize if the session has
    /// passed its target with the completion gate open.
    pub fn on_tick(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let Some(session) = inner.session.as_mut() else {
            debug!("Tick with no active session, ignoring");
            return;
        };
        session.elapsed_seconds += 1;
        let elapsed = session.elapsed_seconds;
        let past_target = session.past_target();

        let gate_open = match self.policy {
            CompletionPolicy::StopOnComplete => true,
            CompletionPolicy::GateOnHidden | CompletionPolicy::RearmOnAlert => inner.hidden,
        };

        if past_target && gate_open {
            self.finalize(inner, "tick");
        } else {
            if past_target {
                debug!(
                    "Elapsed {}s is past target but the readout is visible, session continues",
                    elapsed
                );
            }
            self.publish(inner, Phase::Active);
        }
    }

    /// Hook for the dispatcher reporting that a deferred alert delivered.
    ///
    /// May race with the tick path; if the session was already finalized
    /// this is a no-op. Under [`CompletionPolicy::RearmOnAlert`] the alert
    /// sounds and a fresh session starts immediately.
    pub fn on_deferred_alert_fired(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.session.is_none() {
            debug!("Deferred alert fired with no active session, ignoring");
            return;
        }

        match self.policy {
            CompletionPolicy::RearmOnAlert => self.rearm(inner),
            CompletionPolicy::StopOnComplete | CompletionPolicy::GateOnHidden => {
                self.finalize(inner, "deferred alert")
            }
        }
    }

    /// Record whether the user has hidden the readout.
    ///
    /// Only sets the flag: a session already past its target does not
    /// retroactively finalize, the next tick evaluates the gate.
    pub fn set_hidden(&self, hidden: bool) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.hidden == hidden {
            return;
        }
        inner.hidden = hidden;
        info!("Readout {}", if hidden { "hidden" } else { "revealed" });

        let phase = if inner.session.is_some() {
            Phase::Active
        } else {
            Phase::Idle
        };
        self.publish(inner, phase);
    }

    /// Set the lower bound, clamping per the bounds invariant.
    ///
    /// Silent no-op while a session is active; returns whether the change
    /// was applied.
    pub fn set_lower_bound(&self, minutes: u64) -> bool {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.session.is_some() {
            debug!("Lower bound change ignored while a session is active");
            return false;
        }
        inner.bounds.set_lower(minutes);
        info!(
            "Bounds set to {}..{} min",
            inner.bounds.lower_minutes(),
            inner.bounds.upper_minutes()
        );
        self.publish(inner, Phase::Idle);
        true
    }

    /// Set the upper bound, clamping per the bounds invariant.
    ///
    /// Silent no-op while a session is active; returns whether the change
    /// was applied.
    pub fn set_upper_bound(&self, minutes: u64) -> bool {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.session.is_some() {
            debug!("Upper bound change ignored while a session is active");
            return false;
        }
        inner.bounds.set_upper(minutes);
        info!(
            "Bounds set to {}..{} min",
            inner.bounds.lower_minutes(),
            inner.bounds.upper_minutes()
        );
        self.publish(inner, Phase::Idle);
        true
    }

    /// End the session and deliver the audible alert
    fn finalize(&self, inner: &mut Inner, via: &str) {
        inner.session = None;
        self.publish(inner, Phase::Alerting);

        self.dispatcher.cancel_all();
        if let Err(e) = self.dispatcher.play_sound(ALERT_SOUND) {
            warn!("Alert sound failed: {}", e);
        }
        info!("Session finalized via {}", via);

        self.publish(inner, Phase::Idle);
    }

    /// Sound the alert and start a fresh session in its place
    fn rearm(&self, inner: &mut Inner) {
        self.publish(inner, Phase::Alerting);
        if let Err(e) = self.dispatcher.play_sound(ALERT_SOUND) {
            warn!("Alert sound failed: {}", e);
        }

        let (lower, upper) = inner.bounds.range_seconds();
        let target = inner.sampler.sample(lower, upper);
        inner.session = Some(Session::new(target));
        info!("Deferred alert fired, re-armed with target {:.1}s", target);

        if let Err(e) =
            self.dispatcher
                .schedule_deferred(target, ALERT_TITLE, ALERT_BODY, ALERT_SOUND)
        {
            warn!(
                "Failed to schedule deferred alert, continuing on ticks only: {}",
                e
            );
        }

        self.publish(inner, Phase::Active);
    }

    fn publish(&self, inner: &Inner, phase: Phase) {
        let snapshot = ControllerSnapshot {
            phase,
            elapsed_seconds: inner.session.as_ref().map(|s| s.elapsed_seconds),
            hidden: inner.hidden,
            lower_minutes: inner.bounds.lower_minutes(),
            upper_minutes: inner.bounds.upper_minutes(),
        };
        if self.snapshot_tx.send(snapshot).is_err() {
            warn!("Failed to publish controller snapshot");
        }
    }
}
