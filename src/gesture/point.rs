// src/gesture/point.rs

//! The point-picker gesture: hover sampling of a small tile around the
//! pointer, committed on primary button release.
//!
//! Statistics are published live on every pointer move, so cancellation
//! must restore the values captured at gesture start, all four together.

use crate::binding::PropertyRegistry;
use crate::color::Rgb;
use crate::config::OverlayConfig;
use crate::gesture::{begin_visuals, end_visuals, overlay, GestureStatus};
use crate::host::{CursorIcon, HostEvent, OverlayCommand, OverlayHandle, PointerButton, ViewportHost};
use crate::sampler;
use crate::session::{SessionState, StatisticsStore};
use crate::stats::Statistics;
use log::{debug, warn};

const STATUS_TEXT: &str = "Click to pick colors, right click or Escape key to cancel";

/// Modal state for one point-pick interaction.
pub struct PointGesture {
    /// Edge length of the sampled tile, in pixels.
    size: u32,
    /// Statistic values at gesture start, restored verbatim on cancel.
    previous: StatisticsStore,
    /// Last seen pointer position.
    pointer: Option<(i32, i32)>,
    /// Color of the single pixel under the pointer, shown in the swatch.
    current_color: Rgb,
    overlay: Option<OverlayHandle>,
    overlay_config: OverlayConfig,
}

impl PointGesture {
    /// Starts the gesture: snapshots the statistic store, switches the
    /// cursor to the eyedropper, and registers the overlay.
    pub fn start(
        host: &mut dyn ViewportHost,
        session: &SessionState,
        size: u32,
        overlay_config: OverlayConfig,
    ) -> Self {
        debug!("Point gesture started with {}x{} tile", size, size);
        let overlay = begin_visuals(host, CursorIcon::Eyedropper, STATUS_TEXT);
        PointGesture {
            size: size.max(1),
            previous: session.snapshot(),
            pointer: None,
            current_color: Rgb::BLACK,
            overlay,
            overlay_config,
        }
    }

    /// Processes one host event and reports whether the gesture goes on.
    pub fn handle_event(
        &mut self,
        host: &mut dyn ViewportHost,
        session: &mut SessionState,
        registry: &mut PropertyRegistry,
        event: &HostEvent,
    ) -> GestureStatus {
        match event {
            HostEvent::PointerMove { x, y } => {
                self.resample(host, session, registry, *x, *y);
                host.request_redraw();
                GestureStatus::Running
            }
            HostEvent::ButtonPress {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                // Still sampling; the release commits.
                self.resample(host, session, registry, *x, *y);
                GestureStatus::Running
            }
            HostEvent::ButtonRelease {
                button: PointerButton::Primary,
                ..
            } => {
                // The last sampled values stand.
                end_visuals(host, &mut self.overlay);
                GestureStatus::Finished
            }
            HostEvent::ButtonPress {
                button: PointerButton::Secondary,
                ..
            } => self.cancel(host, session, registry),
            HostEvent::Key { symbol, .. } if symbol.is_cancel() => {
                self.cancel(host, session, registry)
            }
            _ => GestureStatus::Running,
        }
    }

    /// Overlay geometry for the current frame: the live color swatch.
    pub fn overlay_commands(&self) -> Vec<OverlayCommand> {
        match self.pointer {
            Some((x, y)) => {
                overlay::swatch_commands(&self.overlay_config, x, y, self.size, self.current_color)
            }
            None => Vec::new(),
        }
    }

    pub fn overlay_active(&self) -> bool {
        self.overlay.is_some()
    }

    fn resample(
        &mut self,
        host: &mut dyn ViewportHost,
        session: &mut SessionState,
        registry: &mut PropertyRegistry,
        x: i32,
        y: i32,
    ) {
        self.pointer = Some((x, y));

        let buffer = match sampler::sample_square(host, x, y, self.size) {
            Ok(buffer) => buffer,
            Err(err) => {
                warn!("Point sample skipped, framebuffer unavailable: {}", err);
                return;
            }
        };
        // The aggregator only fails on empty buffers, which the sampler
        // guards against.
        match Statistics::of_point_sample(&buffer) {
            Ok(aggregate) => session.publish(&aggregate, registry),
            Err(err) => warn!("Point sample aggregation failed: {}", err),
        }

        match sampler::sample_point(host, x, y) {
            Ok(color) => self.current_color = color,
            Err(err) => warn!("Swatch color read failed: {}", err),
        }
    }

    fn cancel(
        &mut self,
        host: &mut dyn ViewportHost,
        session: &mut SessionState,
        registry: &mut PropertyRegistry,
    ) -> GestureStatus {
        session.restore(self.previous, registry);
        end_visuals(host, &mut self.overlay);
        debug!("Point gesture cancelled, previous statistics restored");
        GestureStatus::Cancelled
    }
}
