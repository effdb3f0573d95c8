// src/gesture/mod.rs

//! Modal gesture state machines for the two interactive pickers.
//!
//! Each gesture is an explicit finite-state machine driven by `HostEvent`s
//! fed from the host's event loop. A gesture owns its visual side effects
//! (cursor shape, status text, overlay registration) and must undo them on
//! every exit path, commit and cancel alike.

pub mod overlay;
pub mod point;
pub mod rect;


pub use point::PointGesture;
pub use rect::RectGesture;

use crate::host::{CursorIcon, OverlayHandle, ViewportHost};
use log::warn;
use once_cell::sync::OnceCell;

/// What a gesture reports back after processing one event.
///
/// `Running` keeps the modal interaction alive; the other two end it. On
/// `Cancelled` the gesture has already undone any state it published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureStatus {
    Running,
    Finished,
    Cancelled,
}

// Latch so a host without overlay support produces a single process-wide
// warning instead of one per gesture.
static OVERLAY_UNAVAILABLE_WARNING: OnceCell<()> = OnceCell::new();

/// Sets the gesture cursor and status text, and registers the overlay.
///
/// Returns `None` when overlay drawing is unavailable; the gesture then
/// runs without visuals but is otherwise fully functional.
pub(crate) fn begin_visuals(
    host: &mut dyn ViewportHost,
    cursor: CursorIcon,
    status: &str,
) -> Option<OverlayHandle> {
    host.set_cursor(cursor);
    host.set_status_text(Some(status));
    match host.acquire_overlay() {
        Ok(handle) => Some(handle),
        Err(err) => {
            OVERLAY_UNAVAILABLE_WARNING.get_or_init(|| {
                warn!(
                    "Failed to initialize gesture overlay, draw will not work as expected: {}",
                    err
                );
            });
            None
        }
    }
}

/// Releases the overlay (if acquired) and restores cursor and status line.
///
/// Called on every exit path; releasing twice is prevented by taking the
/// handle out of the option.
pub(crate) fn end_visuals(host: &mut dyn ViewportHost, overlay: &mut Option<OverlayHandle>) {
    if let Some(handle) = overlay.take() {
        host.release_overlay(handle);
    }
    host.set_cursor(CursorIcon::Default);
    host.set_status_text(None);
    host.request_redraw();
}
