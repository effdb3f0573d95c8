// src/host/headless.rs

//! An in-memory `ViewportHost` with a synthetic framebuffer.
//!
//! Used by the demo binary and by integration tests: pixel readback works
//! against a plain `Vec<Rgb>`, while the visual capabilities (overlay,
//! cursor, status line) are accepted and remembered but draw nothing.

use crate::color::Rgb;
use crate::host::{CursorIcon, OverlayCommand, OverlayHandle, PixelRect, ViewportHost};
use anyhow::Result;
use log::trace;

/// A windowless host backed by an in-memory framebuffer.
pub struct HeadlessHost {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
    next_handle: u64,
    cursor: CursorIcon,
    redraw_requests: u64,
}

impl HeadlessHost {
    /// Creates a headless host with a framebuffer of the given size, filled
    /// with black.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        HeadlessHost {
            width,
            height,
            pixels: vec![Rgb::BLACK; (width * height) as usize],
            next_handle: 1,
            cursor: CursorIcon::Default,
            redraw_requests: 0,
        }
    }

    /// Fills the whole framebuffer with one color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Fills a region of the framebuffer with one color.
    ///
    /// The region is clipped to the framebuffer; pixels outside are ignored.
    pub fn fill_region(&mut self, region: PixelRect, color: Rgb) {
        for y in region.y.max(0)..region.top().min(self.height as i32) {
            for x in region.x.max(0)..region.right().min(self.width as i32) {
                self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
            }
        }
    }

    /// Writes one pixel. Coordinates outside the framebuffer are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
        }
    }

    /// Number of redraws the picker has requested so far.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    /// The cursor shape most recently set by the picker.
    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }
}

impl ViewportHost for HeadlessHost {
    fn viewport(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    fn read_pixels(&mut self, rect: PixelRect) -> Result<Vec<Rgb>> {
        if !self.viewport().contains(&rect) {
            anyhow::bail!(
                "Pixel read {:?} outside framebuffer {}x{}",
                rect,
                self.width,
                self.height
            );
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
        let handle = OverlayHandle(self.next_handle);
        self.next_handle += 1;
        Ok(handle)
    }

    fn release_overlay(&mut self, handle: OverlayHandle) {
        trace!("Headless host released overlay {:?}", handle);
    }

    fn draw_overlay(&mut self, _commands: &[OverlayCommand]) {}

    fn set_cursor(&mut self, cursor: CursorIcon) {
        self.cursor = cursor;
    }

    fn set_status_text(&mut self, _text: Option<&str>) {}

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }
}
