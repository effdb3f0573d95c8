// src/sampler.rs

//! Reads rectangular pixel regions from the host render target into sample
//! buffers, clamping requests to the viewport.
//!
//! Clamping shifts the rectangle's origin instead of shrinking it, so the
//! caller always receives exactly the sample count it asked for. Degenerate
//! regions are rejected here so an empty buffer can never reach the
//! statistics aggregator.

use crate::color::Rgb;
use crate::host::{PixelRect, ViewportHost};
use crate::stats::SampleBuffer;
use anyhow::{Context, Result};

/// Clamps `rect` so it lies entirely within `bounds`, preserving its size.
///
/// # Errors
/// Fails when `rect` has zero area or is larger than `bounds` in either
/// dimension, since then no shift can make it fit.
pub fn clamp_to_bounds(rect: PixelRect, bounds: PixelRect) -> Result<PixelRect> {
    if rect.width == 0 || rect.height == 0 {
        anyhow::bail!("Degenerate sample region: {}x{}", rect.width, rect.height);
    }
    if rect.width > bounds.width || rect.height > bounds.height {
        anyhow::bail!(
            "Sample region {}x{} exceeds viewport {}x{}",
            rect.width,
            rect.height,
            bounds.width,
            bounds.height
        );
    }
    let x = rect.x.clamp(bounds.x, bounds.right() - rect.width as i32);
    let y = rect.y.clamp(bounds.y, bounds.top() - rect.height as i32);
    Ok(PixelRect::new(x, y, rect.width, rect.height))
}

/// Reads `rect` from the host, clamped to the current viewport.
///
/// The returned buffer holds exactly `rect.width * rect.height` samples in
/// row-major order.
pub fn sample_rect(host: &mut dyn ViewportHost, rect: PixelRect) -> Result<SampleBuffer> {
    let clamped = clamp_to_bounds(rect, host.viewport())?;
    let pixels = host
        .read_pixels(clamped)
        .context("Framebuffer read failed")?;
    SampleBuffer::new(clamped.width, clamped.height, pixels)
}

/// Reads a `size` x `size` tile centered on the pointer position.
///
/// The tile origin is `center - size / 2` in both axes, then clamped like
/// any other rectangle.
pub fn sample_square(
    host: &mut dyn ViewportHost,
    center_x: i32,
    center_y: i32,
    size: u32,
) -> Result<SampleBuffer> {
    let distance = (size / 2) as i32;
    sample_rect(
        host,
        PixelRect::new(center_x - distance, center_y - distance, size, size),
    )
}

/// Reads the single pixel under the pointer.
pub fn sample_point(host: &mut dyn ViewportHost, x: i32, y: i32) -> Result<Rgb> {
    let buffer = sample_rect(host, PixelRect::new(x, y, 1, 1))?;
    Ok(buffer.pixels()[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockHost;

    #[test]
    fn test_clamp_keeps_interior_rect_unchanged() {
        let bounds = PixelRect::new(0, 0, 100, 100);
        let rect = PixelRect::new(10, 20, 5, 5);
        assert_eq!(clamp_to_bounds(rect, bounds).unwrap(), rect);
    }

    #[test]
    fn test_clamp_shifts_origin_without_shrinking() {
        let bounds = PixelRect::new(0, 0, 100, 100);

        let low = clamp_to_bounds(PixelRect::new(-3, -7, 5, 5), bounds).unwrap();
        assert_eq!(low, PixelRect::new(0, 0, 5, 5));

        let high = clamp_to_bounds(PixelRect::new(98, 99, 5, 5), bounds).unwrap();
        assert_eq!(high, PixelRect::new(95, 95, 5, 5));
    }

    #[test]
    fn test_clamp_respects_nonzero_viewport_origin() {
        let bounds = PixelRect::new(40, 40, 20, 20);
        let rect = clamp_to_bounds(PixelRect::new(0, 100, 8, 8), bounds).unwrap();
        assert_eq!(rect, PixelRect::new(40, 52, 8, 8));
    }

    #[test]
    fn test_clamp_rejects_degenerate_and_oversized_regions() {
        let bounds = PixelRect::new(0, 0, 10, 10);
        assert!(clamp_to_bounds(PixelRect::new(0, 0, 0, 5), bounds).is_err());
        assert!(clamp_to_bounds(PixelRect::new(0, 0, 11, 5), bounds).is_err());
    }

    #[test]
    fn test_sample_rect_outside_bounds_keeps_requested_size() {
        let mut host = MockHost::new(32, 32);
        let buffer = sample_rect(&mut host, PixelRect::new(30, 30, 6, 4)).unwrap();
        assert_eq!(buffer.width(), 6);
        assert_eq!(buffer.height(), 4);
        assert_eq!(buffer.len(), 24);
        assert_eq!(host.read_requests[0], PixelRect::new(26, 28, 6, 4));
    }

    #[test]
    fn test_sample_square_is_centered() {
        let mut host = MockHost::new(32, 32);
        sample_square(&mut host, 16, 16, 5).unwrap();
        assert_eq!(host.read_requests[0], PixelRect::new(14, 14, 5, 5));
    }

    #[test]
    fn test_sample_point_reads_the_exact_pixel() {
        let mut host = MockHost::new(8, 8);
        host.set_pixel(3, 4, Rgb::new(0.2, 0.4, 0.6));
        assert_eq!(
            sample_point(&mut host, 3, 4).unwrap(),
            Rgb::new(0.2, 0.4, 0.6)
        );
    }

    #[test]
    fn test_unavailable_read_surfaces_as_error() {
        let mut host = MockHost::new(8, 8);
        host.fail_pixel_reads = true;
        assert!(sample_rect(&mut host, PixelRect::new(0, 0, 2, 2)).is_err());
    }
}
