// src/host/mod.rs

//! Defines the `ViewportHost` trait the embedding application implements,
//! and the common types exchanged across that seam: `HostEvent`,
//! `PixelRect`, `OverlayCommand`, and `CursorIcon`.
//!
//! The picker core never talks to a window system or a GPU directly. Pixel
//! readback, overlay drawing, cursor changes, and the status line are all
//! opaque host capabilities behind this trait, which keeps the gesture and
//! statistics logic testable against an in-memory implementation.

use crate::color::Rgb;
pub use crate::keys::{KeySymbol, Modifiers};
use anyhow::Result;

pub mod headless;
#[cfg(test)]
pub mod mock;

/// An axis-aligned pixel rectangle, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Horizontal origin in pixels.
    pub x: i32,
    /// Vertical origin in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered by the rectangle.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive top edge.
    pub fn top(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Whether `other` lies entirely within this rectangle.
    pub fn contains(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.top() <= self.top()
    }
}

/// Represents pointer buttons as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// The commit/select button (usually left).
    Primary,
    /// The alternate button (usually right).
    Secondary,
    Middle,
    Other(u8),
}

/// Pointer cursor shapes the picker asks the host to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorIcon {
    /// The host's normal pointer; restored when a gesture ends.
    Default,
    /// Shown while a point-pick gesture is running.
    Eyedropper,
    /// Shown while a rectangle-pick gesture is running.
    Crosshair,
}

/// Represents events originating from the host (platform-specific UI/input).
///
/// These events are fed to `PickerRuntime::dispatch_event`, which routes
/// them to the active modal gesture. Coordinates are framebuffer pixels in
/// the same space as [`ViewportHost::viewport`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The pointer moved.
    PointerMove { x: i32, y: i32 },
    /// A pointer button was pressed.
    ButtonPress {
        button: PointerButton,
        x: i32,
        y: i32,
    },
    /// A pointer button was released.
    ButtonRelease {
        button: PointerButton,
        x: i32,
        y: i32,
    },
    /// A keyboard key was pressed.
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
    },
    /// The host's redraw/idle pulse.
    ///
    /// Carries no payload; the rectangle gesture uses it (like any other
    /// event) to poll its debounce deadline, since the picker never sleeps.
    Tick,
}

/// Simple 2D primitives the picker draws as a transient overlay.
///
/// Coordinates are pixels in viewport space; colors are straight RGBA with
/// components in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    /// Fills a rectangular area with a solid color.
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: [f32; 4],
    },
    /// Draws a one-pixel rectangle outline.
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: [f32; 4],
    },
}

/// Opaque token for a live overlay registration.
///
/// Returned by [`ViewportHost::acquire_overlay`] and handed back to
/// [`ViewportHost::release_overlay`] when a gesture ends. Gestures must
/// release on every exit path, commit and cancel alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHandle(pub u64);

/// Defines the interface the embedding application provides to the picker.
///
/// A host is responsible for:
/// 1. Reading float RGB pixels back from the currently active render target.
/// 2. Registering and unregistering a transient 2D overlay, and drawing the
///    primitives the picker submits while one is registered.
/// 3. Pointer cursor shape and the status/header line.
/// 4. Scheduling redraws of the area the picker is interacting with.
///
/// All methods are called synchronously on the host's UI thread; the picker
/// performs no background work.
pub trait ViewportHost {
    /// Current bounds of the active render target, in pixels.
    fn viewport(&self) -> PixelRect;

    /// Reads a rectangle of pixels from the active render target.
    ///
    /// Returns `rect.area()` samples in row-major order. The rectangle is
    /// guaranteed by the caller to lie within [`ViewportHost::viewport`].
    /// Hosts that read RGBA internally must drop the alpha channel.
    ///
    /// # Errors
    /// Fails when the read primitive is unavailable, e.g. no render context
    /// is bound. Callers degrade to a no-op and log a warning; they never
    /// propagate this as a crash.
    fn read_pixels(&mut self, rect: PixelRect) -> Result<Vec<Rgb>>;

    /// Registers the picker's transient overlay with the host.
    ///
    /// # Errors
    /// Fails when overlay drawing cannot be initialized (e.g. shader
    /// compilation failed). The picker then runs the gesture without
    /// visuals.
    fn acquire_overlay(&mut self) -> Result<OverlayHandle>;

    /// Unregisters a previously acquired overlay. Must be idempotent.
    fn release_overlay(&mut self, handle: OverlayHandle);

    /// Draws overlay primitives for the current frame.
    ///
    /// Only called between a successful [`ViewportHost::acquire_overlay`]
    /// and the matching release.
    fn draw_overlay(&mut self, commands: &[OverlayCommand]);

    /// Sets the pointer cursor shape.
    fn set_cursor(&mut self, cursor: CursorIcon);

    /// Sets or clears the status/header help text.
    fn set_status_text(&mut self, text: Option<&str>);

    /// Asks the host to redraw the interacting area soon.
    fn request_redraw(&mut self);
}
