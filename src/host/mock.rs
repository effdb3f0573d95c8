// src/host/mock.rs

use crate::color::Rgb;
use crate::host::{CursorIcon, OverlayCommand, OverlayHandle, PixelRect, ViewportHost};
use anyhow::Result;

/// A scripted host for unit tests.
///
/// Every picker-visible interaction is recorded so tests can assert on
/// cursor changes, status text, overlay acquire/release pairing, and the
/// primitives drawn. Failure injection covers the two degraded paths:
/// overlay initialization and pixel readback.
pub struct MockHost {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
    pub fail_overlay_acquire: bool,
    pub fail_pixel_reads: bool,
    pub cursor_history: Vec<CursorIcon>,
    pub status_history: Vec<Option<String>>,
    pub acquired_overlays: u64,
    pub released_overlays: u64,
    pub drawn_commands: Vec<OverlayCommand>,
    pub read_requests: Vec<PixelRect>,
    next_handle: u64,
}

impl MockHost {
    pub fn new(width: u32, height: u32) -> Self {
        MockHost {
            width,
            height,
            pixels: vec![Rgb::BLACK; (width * height) as usize],
            fail_overlay_acquire: false,
            fail_pixel_reads: false,
            cursor_history: Vec::new(),
            status_history: Vec::new(),
            acquired_overlays: 0,
            released_overlays: 0,
            drawn_commands: Vec::new(),
            read_requests: Vec::new(),
            next_handle: 1,
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
        }
    }

    /// Whether every acquired overlay has been released again.
    pub fn overlays_balanced(&self) -> bool {
        self.acquired_overlays == self.released_overlays
    }

    /// The most recent cursor shape set by the picker.
    pub fn current_cursor(&self) -> Option<CursorIcon> {
        self.cursor_history.last().copied()
    }
}

impl ViewportHost for MockHost {
    fn viewport(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    fn read_pixels(&mut self, rect: PixelRect) -> Result<Vec<Rgb>> {
        self.read_requests.push(rect);
        if self.fail_pixel_reads {
            anyhow::bail!("Mock host: pixel readback unavailable");
        }
        if !self.viewport().contains(&rect) {
            anyhow::bail!("Mock host: read {:?} outside framebuffer", rect);
        }
        let mut out = Vec::with_capacity(rect.area() as usize);
        for y in rect.y..rect.top() {
            for x in rect.x..rect.right() {
                out.push(self.pixels[(y as u32 * self.width + x as u32) as usize]);
            }
        }
        Ok(out)
    }

    fn acquire_overlay(&mut self) -> Result<OverlayHandle> {
        if self.fail_overlay_acquire {
            anyhow::bail!("Mock host: overlay initialization failed");
        }
        self.acquired_overlays += 1;
        let handle = OverlayHandle(self.next_handle);
        self.next_handle += 1;
        Ok(handle)
    }

    fn release_overlay(&mut self, _handle: OverlayHandle) {
        self.released_overlays += 1;
    }

    fn draw_overlay(&mut self, commands: &[OverlayCommand]) {
        self.drawn_commands.extend_from_slice(commands);
    }

    fn set_cursor(&mut self, cursor: CursorIcon) {
        self.cursor_history.push(cursor);
    }

    fn set_status_text(&mut self, text: Option<&str>) {
        self.status_history.push(text.map(str::to_owned));
    }

    fn request_redraw(&mut self) {}
}
