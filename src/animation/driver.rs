//! Spin state machine

use super::clock::{Clock, FrameId, FrameScheduler};
use super::{AnimationConfig, SpinError};
use crate::config::WheelSettings;
use crate::selection::{
    normalize_angle, pick_weighted_with, resolve_target, rotation_delta, segment_at_rotation,
    target_rotation_with,
};
use crate::validation::{self, ValidationError};
use crate::wheel::{PointerConfig, Segment, SegmentTarget};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Phase of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
}

/// Outcome of one completed spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    /// Segment under the pointer when the wheel stopped
    pub segment: Segment,
    /// Index of that segment
    pub index: usize,
    /// Final rotation normalized to `[0, 360)`
    pub angle: f64,
    /// Elapsed animation time in milliseconds
    pub duration_ms: f64,
    /// Completion time
    pub timestamp: DateTime<Utc>,
    /// Id of the spin, matching [`SpinTicket::spin_id`]
    pub spin_id: Uuid,
}

/// Observable state of the wheel
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelState {
    /// Accumulated rotation in degrees, not normalized
    pub rotation: f64,
    pub phase: SpinPhase,
    pub last_result: Option<SpinResult>,
    /// Linear animation progress in `[0, 1]`
    pub progress: f64,
}

impl WheelState {
    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }
}

/// Events delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WheelEvent {
    /// A spin has started towards `target_index`
    SpinStarted {
        spin_id: Uuid,
        target_index: usize,
        target_rotation: f64,
    },
    /// A spin has completed
    SpinCompleted(SpinResult),
}

/// Why a spin request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadySpinning,
    Disabled,
    /// The segment list failed validation
    InvalidConfiguration,
}

/// Result of a spin request
#[derive(Debug)]
pub enum SpinOutcome {
    /// A spin is in flight
    Started(SpinTicket),
    /// Nothing happened
    Ignored(IgnoreReason),
}

impl SpinOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, SpinOutcome::Started(_))
    }

    /// The ticket of a started spin
    pub fn ticket(self) -> Option<SpinTicket> {
        match self {
            SpinOutcome::Started(ticket) => Some(ticket),
            SpinOutcome::Ignored(_) => None,
        }
    }
}

/// Handle on a spin in flight
///
/// Receives the [`SpinResult`] exactly once. If the driver is reset or dropped
/// first, the ticket observes the spin as cancelled.
#[derive(Debug)]
pub struct SpinTicket {
    spin_id: Uuid,
    target_index: usize,
    receiver: oneshot::Receiver<SpinResult>,
}

impl SpinTicket {
    pub fn spin_id(&self) -> Uuid {
        self.spin_id
    }

    /// Index the driver aimed at when the spin started
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Polls for the result without blocking
    ///
    /// Returns `Ok(None)` while the spin is still running and
    /// [`SpinError::Cancelled`] once the spin was cancelled. The result can be
    /// taken only once; later calls report the spin as cancelled.
    pub fn try_result(&mut self) -> Result<Option<SpinResult>, SpinError> {
        match self.receiver.try_recv() {
            Ok(result) => Ok(Some(result)),
            Err(oneshot::error::TryRecvError::Empty) => Ok(None),
            Err(oneshot::error::TryRecvError::Closed) => Err(SpinError::Cancelled),
        }
    }

    /// Waits for the spin to complete.
    pub async fn wait(self) -> Result<SpinResult, SpinError> {
        self.receiver.await.map_err(|_| SpinError::Cancelled)
    }

    pub fn into_receiver(self) -> oneshot::Receiver<SpinResult> {
        self.receiver
    }
}

/// Result of delivering a frame to the driver
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Not the frame the driver is waiting for
    Ignored,
    /// Rotation moved; another frame has been requested
    Advanced { progress: f64 },
    /// The spin finished
    Completed(SpinResult),
}

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(Uuid);

type Listener = Box<dyn FnMut(&WheelEvent) + Send>;

struct ActiveSpin {
    spin_id: Uuid,
    target_index: usize,
    start_rotation: f64,
    end_rotation: f64,
    started_at: Option<f64>,
    pending_frame: Option<FrameId>,
    completion: oneshot::Sender<SpinResult>,
}

/// Drives spins of one wheel
///
/// The driver owns a sanitized copy of the segments, validated once at
/// construction. A wheel whose segments fail validation ignores every spin
/// request; [`SpinDriver::validation_errors`] lists the problems.
///
/// Frames must be delivered with [`SpinDriver::on_frame`]. Duration is measured
/// on the clock, not in frames, so a host that delivers frames late only gets
/// coarser steps.
pub struct SpinDriver<C: Clock, F: FrameScheduler> {
    segments: Vec<Segment>,
    validation_errors: Vec<ValidationError>,
    animation: AnimationConfig,
    pointer: PointerConfig,
    disabled: bool,
    predefined_result: Option<SegmentTarget>,
    state: WheelState,
    active: Option<ActiveSpin>,
    clock: C,
    frames: F,
    rng: Box<dyn RngCore + Send>,
    listeners: Vec<(Subscription, Listener)>,
}

impl<C: Clock, F: FrameScheduler> SpinDriver<C, F> {
    /// Creates an idle driver at rotation 0.
    pub fn new(settings: &WheelSettings, clock: C, frames: F) -> Self {
        let report = validation::validate(&settings.segments);
        if !report.is_valid() {
            warn!(
                errors = ?report.messages(),
                "Wheel configuration is invalid, spins will be ignored"
            );
        }

        Self {
            segments: report.segments,
            validation_errors: report.errors,
            animation: settings.animation,
            pointer: settings.pointer.clone(),
            disabled: settings.disabled,
            predefined_result: settings.predefined_result.clone(),
            state: WheelState::default(),
            active: None,
            clock,
            frames,
            rng: Box::new(StdRng::from_entropy()),
            listeners: Vec::new(),
        }
    }

    /// Replaces the random source used for selection and jitter.
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Starts a spin
    ///
    /// Ignored while a spin is in flight, while the wheel is disabled, and when
    /// the segments failed validation. The target is the predefined result if
    /// one is set, otherwise a weighted draw.
    ///
    /// # Errors
    ///
    /// Fails without starting when the predefined result cannot be resolved or
    /// no segment is eligible.
    pub fn spin(&mut self) -> Result<SpinOutcome, SpinError> {
        if self.state.is_spinning() {
            debug!("Spin requested while spinning, ignoring");
            return Ok(SpinOutcome::Ignored(IgnoreReason::AlreadySpinning));
        }
        if self.disabled {
            debug!("Spin requested while disabled, ignoring");
            return Ok(SpinOutcome::Ignored(IgnoreReason::Disabled));
        }
        if !self.validation_errors.is_empty() {
            warn!(
                errors = self.validation_errors.len(),
                "Spin requested with invalid segments, ignoring"
            );
            return Ok(SpinOutcome::Ignored(IgnoreReason::InvalidConfiguration));
        }

        let target_index = match &self.predefined_result {
            Some(target) => resolve_target(&self.segments, target)?,
            None => pick_weighted_with(&self.segments, &mut *self.rng)?.index,
        };

        let relative = target_rotation_with(
            &self.segments,
            &SegmentTarget::Index(target_index),
            self.animation.spins,
            self.pointer.position,
            &mut *self.rng,
        )?;

        let start_rotation = self.state.rotation;
        let end_rotation = start_rotation + rotation_delta(start_rotation, relative);
        let spin_id = Uuid::new_v4();
        let (completion, receiver) = oneshot::channel();
        let pending_frame = self.frames.request_frame();

        self.active = Some(ActiveSpin {
            spin_id,
            target_index,
            start_rotation,
            end_rotation,
            started_at: None,
            pending_frame: Some(pending_frame),
            completion,
        });
        self.state.phase = SpinPhase::Spinning;
        self.state.progress = 0.0;

        debug!(
            %spin_id,
            target_index,
            start_rotation,
            end_rotation,
            "Spin started"
        );

        self.emit(&WheelEvent::SpinStarted {
            spin_id,
            target_index,
            target_rotation: end_rotation,
        });

        Ok(SpinOutcome::Started(SpinTicket {
            spin_id,
            target_index,
            receiver,
        }))
    }

    /// Advances the animation for a delivered frame
    ///
    /// Frames other than the one last requested are ignored. The first frame of
    /// a spin fixes its start time.
    pub fn on_frame(&mut self, frame: FrameId) -> FrameOutcome {
        let Some(active) = self.active.as_mut() else {
            trace!(frame = frame.raw(), "Frame delivered while idle");
            return FrameOutcome::Ignored;
        };
        if active.pending_frame != Some(frame) {
            trace!(frame = frame.raw(), "Stale frame ignored");
            return FrameOutcome::Ignored;
        }
        active.pending_frame = None;

        let now = self.clock.now_ms();
        let started_at = *active.started_at.get_or_insert(now);
        let elapsed = (now - started_at).max(0.0);
        let duration = self.animation.duration_ms as f64;
        let progress = if duration > 0.0 {
            (elapsed / duration).min(1.0)
        } else {
            1.0
        };

        let eased = self.animation.easing.apply(progress);
        self.state.rotation =
            active.start_rotation + (active.end_rotation - active.start_rotation) * eased;
        self.state.progress = progress;

        trace!(progress, rotation = self.state.rotation, "Frame");

        if progress < 1.0 {
            active.pending_frame = Some(self.frames.request_frame());
            return FrameOutcome::Advanced { progress };
        }

        match self.finish(elapsed) {
            Some(result) => FrameOutcome::Completed(result),
            None => FrameOutcome::Ignored,
        }
    }

    fn finish(&mut self, elapsed: f64) -> Option<SpinResult> {
        let active = self.active.take()?;
        self.state.rotation = active.end_rotation;
        self.state.phase = SpinPhase::Idle;
        self.state.progress = 1.0;

        let landed = match segment_at_rotation(
            &self.segments,
            self.state.rotation,
            self.pointer.position,
        ) {
            Ok(landed) => landed,
            Err(err) => {
                warn!(error = %err, "Spin finished without a segment under the pointer");
                return None;
            }
        };

        if landed.index != active.target_index {
            warn!(
                selected = active.target_index,
                landed = landed.index,
                rotation = self.state.rotation,
                "Landed segment differs from the selected one"
            );
        }

        let result = SpinResult {
            segment: landed.segment.clone(),
            index: landed.index,
            angle: normalize_angle(self.state.rotation),
            duration_ms: elapsed,
            timestamp: Utc::now(),
            spin_id: active.spin_id,
        };

        info!(
            spin_id = %result.spin_id,
            index = result.index,
            segment = %result.segment.text,
            angle = result.angle,
            "Spin completed"
        );

        self.state.last_result = Some(result.clone());

        if active.completion.send(result.clone()).is_err() {
            debug!(spin_id = %result.spin_id, "Spin ticket was dropped before completion");
        }

        self.emit(&WheelEvent::SpinCompleted(result.clone()));
        Some(result)
    }

    /// Returns to the initial idle state at rotation 0
    ///
    /// Cancels a spin in flight; its ticket observes the cancellation. Safe to
    /// call in any state.
    pub fn reset(&mut self) {
        self.cancel_active();
        self.state = WheelState::default();
        debug!("Wheel reset");
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            if let Some(frame) = active.pending_frame {
                self.frames.cancel_frame(frame);
            }
            debug!(spin_id = %active.spin_id, "Spin cancelled");
        }
    }

    /// Enables or disables spinning; a spin in flight runs to completion.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Forces the outcome of later spins, or restores weighted selection.
    pub fn set_predefined_result(&mut self, target: Option<SegmentTarget>) {
        self.predefined_result = target;
    }

    /// Registers a listener for [`WheelEvent`]s.
    pub fn subscribe<L>(&mut self, listener: L) -> Subscription
    where
        L: FnMut(&WheelEvent) + Send + 'static,
    {
        let subscription = Subscription(Uuid::new_v4());
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: &WheelEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn state(&self) -> &WheelState {
        &self.state
    }

    pub fn rotation(&self) -> f64 {
        self.state.rotation
    }

    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    pub fn last_result(&self) -> Option<&SpinResult> {
        self.state.last_result.as_ref()
    }

    /// Sanitized segments the wheel spins over
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors.is_empty()
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    pub fn pointer(&self) -> &PointerConfig {
        &self.pointer
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn predefined_result(&self) -> Option<&SegmentTarget> {
        self.predefined_result.as_ref()
    }
}

impl<C: Clock, F: FrameScheduler> Drop for SpinDriver<C, F> {
    fn drop(&mut self) {
        self.cancel_active();
        self.listeners.clear();
    }
}

impl<C: Clock, F: FrameScheduler> std::fmt::Debug for SpinDriver<C, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinDriver")
            .field("segments", &self.segments.len())
            .field("animation", &self.animation)
            .field("pointer", &self.pointer.position)
            .field("disabled", &self.disabled)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
