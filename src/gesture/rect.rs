// src/gesture/rect.rs

//! The rectangle-picker gesture: two clicks span a region, a short
//! debounce lets any in-flight redraw settle, then the region is sampled
//! once and its per-channel statistics published.
//!
//! Nothing is published before commit, so cancellation only has to undo
//! the visuals.

use crate::binding::PropertyRegistry;
use crate::config::{BehaviorConfig, OverlayConfig};
use crate::gesture::{begin_visuals, end_visuals, overlay, GestureStatus};
use crate::host::{
    CursorIcon, HostEvent, OverlayCommand, OverlayHandle, PixelRect, PointerButton, ViewportHost,
};
use crate::sampler;
use crate::session::SessionState;
use crate::stats::Statistics;
use log::{debug, warn};
use std::time::{Duration, Instant};

const STATUS_TEXT: &str = "Click to set first corner of rectangle, \
     right click to set opposite corner, Escape key to cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RectState {
    /// No corner latched yet.
    Idle,
    /// First corner latched, pointer not moved since.
    Armed,
    /// First corner latched, rubber band follows the pointer. No sampling
    /// happens in this state.
    LivePreview,
    /// Second corner latched; waiting out the debounce before sampling.
    Debouncing,
}

/// Modal state for one rectangle-pick interaction.
pub struct RectGesture {
    state: RectState,
    first: Option<(i32, i32)>,
    second: Option<(i32, i32)>,
    /// Live pointer position driving the rubber-band preview.
    pointer: Option<(i32, i32)>,
    debounce: Duration,
    debounce_started: Option<Instant>,
    overlay: Option<OverlayHandle>,
    overlay_config: OverlayConfig,
}

impl RectGesture {
    /// Starts the gesture: crosshair cursor, status text, overlay.
    pub fn start(
        host: &mut dyn ViewportHost,
        behavior: &BehaviorConfig,
        overlay_config: OverlayConfig,
    ) -> Self {
        debug!("Rectangle gesture started");
        let overlay = begin_visuals(host, CursorIcon::Crosshair, STATUS_TEXT);
        RectGesture {
            state: RectState::Idle,
            first: None,
            second: None,
            pointer: None,
            debounce: Duration::from_millis(behavior.debounce_ms),
            debounce_started: None,
            overlay,
            overlay_config,
        }
    }

    /// Processes one host event and reports whether the gesture goes on.
    ///
    /// While debouncing, every event (the host's `Tick` pulse included)
    /// polls the captured timestamp; the gesture never sleeps.
    pub fn handle_event(
        &mut self,
        host: &mut dyn ViewportHost,
        session: &mut SessionState,
        registry: &mut PropertyRegistry,
        event: &HostEvent,
    ) -> GestureStatus {
        if let HostEvent::Key { symbol, .. } = event {
            if symbol.is_cancel() {
                return self.cancel(host);
            }
        }

        if self.state == RectState::Debouncing {
            let started = self
                .debounce_started
                .unwrap_or_else(Instant::now);
            if started.elapsed() >= self.debounce {
                return self.commit(host, session, registry);
            }
            return GestureStatus::Running;
        }

        match event {
            HostEvent::ButtonPress {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                // Re-clicking moves the anchor.
                self.first = Some((*x, *y));
                self.pointer = Some((*x, *y));
                self.state = RectState::Armed;
                host.request_redraw();
                GestureStatus::Running
            }
            HostEvent::PointerMove { x, y } => {
                self.pointer = Some((*x, *y));
                if self.state == RectState::Armed {
                    self.state = RectState::LivePreview;
                }
                host.request_redraw();
                GestureStatus::Running
            }
            HostEvent::ButtonPress {
                button: PointerButton::Secondary,
                x,
                y,
            } => {
                if self.first.is_none() {
                    // No rectangle was ever spanned.
                    return self.cancel(host);
                }
                self.second = Some((*x, *y));
                self.pointer = Some((*x, *y));
                self.debounce_started = Some(Instant::now());
                self.state = RectState::Debouncing;
                debug!(
                    "Rectangle corners latched, sampling in {} ms",
                    self.debounce.as_millis()
                );
                GestureStatus::Running
            }
            _ => GestureStatus::Running,
        }
    }

    /// Overlay geometry for the current frame: the rubber-band outline.
    pub fn overlay_commands(&self) -> Vec<OverlayCommand> {
        let anchor = match self.first {
            Some(corner) => corner,
            None => return Vec::new(),
        };
        let opposite = self.second.or(self.pointer).unwrap_or(anchor);
        overlay::rubber_band_commands(&self.overlay_config, anchor, opposite)
    }

    pub fn overlay_active(&self) -> bool {
        self.overlay.is_some()
    }

    fn commit(
        &mut self,
        host: &mut dyn ViewportHost,
        session: &mut SessionState,
        registry: &mut PropertyRegistry,
    ) -> GestureStatus {
        // Both corners are latched before Debouncing can be entered.
        let (first, second) = match (self.first, self.second) {
            (Some(first), Some(second)) => (first, second),
            _ => return self.cancel(host),
        };

        let x0 = first.0.min(second.0);
        let y0 = first.1.min(second.1);
        let width = first.0.abs_diff(second.0) + 1;
        let height = first.1.abs_diff(second.1) + 1;

        let buffer = match sampler::sample_rect(host, PixelRect::new(x0, y0, width, height)) {
            Ok(buffer) => buffer,
            Err(err) => {
                warn!("Rectangle sample failed, nothing published: {}", err);
                return self.cancel(host);
            }
        };
        match Statistics::of_region(&buffer) {
            Ok(aggregate) => session.publish(&aggregate, registry),
            Err(err) => {
                warn!("Rectangle aggregation failed, nothing published: {}", err);
                return self.cancel(host);
            }
        }

        end_visuals(host, &mut self.overlay);
        debug!(
            "Rectangle gesture committed over {}x{} pixels",
            width, height
        );
        GestureStatus::Finished
    }

    fn cancel(&mut self, host: &mut dyn ViewportHost) -> GestureStatus {
        end_visuals(host, &mut self.overlay);
        debug!("Rectangle gesture cancelled");
        GestureStatus::Cancelled
    }
}
