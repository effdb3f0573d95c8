// src/stats.rs

//! Defines the sample buffer collected from the framebuffer and the
//! per-channel statistics computed over it.
//!
//! Two aggregation variants exist because the two interactive tools define
//! their extremes differently: the point picker reports the whole sample
//! whose channel sum is largest/smallest, while the rectangle picker
//! reports channel-wise extremes. Mean and median are shared.

use crate::color::Rgb;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Transient buffer of color samples read from one framebuffer rectangle.
///
/// Samples are row-major; `pixels.len()` always equals `width * height`.
/// A buffer exists only for the duration of a single statistics
/// computation.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl SampleBuffer {
    /// Wraps samples read from a `width` x `height` rectangle.
    ///
    /// # Errors
    /// Fails when the sample count does not match the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            anyhow::bail!(
                "Sample buffer length {} does not match {}x{} rectangle",
                pixels.len(),
                width,
                height
            );
        }
        Ok(SampleBuffer {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}

/// Identifies one of the four published statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticKind {
    Max,
    Mean,
    Median,
    Min,
}

impl StatisticKind {
    /// Stable name used by the command layer and the binding source field.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticKind::Max => "max",
            StatisticKind::Mean => "mean",
            StatisticKind::Median => "median",
            StatisticKind::Min => "min",
        }
    }

    /// Parses a stable name back into a kind.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "max" => Some(StatisticKind::Max),
            "mean" => Some(StatisticKind::Mean),
            "median" => Some(StatisticKind::Median),
            "min" => Some(StatisticKind::Min),
            _ => None,
        }
    }
}

/// The aggregate of one sample buffer: per-channel mean and median plus the
/// tool-dependent extremes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: Rgb,
    pub median: Rgb,
    pub max: Rgb,
    pub min: Rgb,
}

impl Statistics {
    /// Aggregates with the point-picker extreme rule.
    ///
    /// `max` and `min` are entire input samples: the argmax/argmin over each
    /// sample's channel sum. The returned triples are therefore always
    /// actual pixels from the buffer, never synthetic per-channel
    /// composites. Ties resolve to the first matching sample.
    ///
    /// # Errors
    /// Fails on an empty buffer; aggregates over zero samples are undefined.
    pub fn of_point_sample(buffer: &SampleBuffer) -> Result<Self> {
        let pixels = Self::non_empty(buffer)?;

        let mut max = pixels[0];
        let mut min = pixels[0];
        for &sample in &pixels[1..] {
            if sample.channel_sum() > max.channel_sum() {
                max = sample;
            }
            if sample.channel_sum() < min.channel_sum() {
                min = sample;
            }
        }

        Ok(Statistics {
            mean: channel_mean(pixels),
            median: channel_median(pixels),
            max,
            min,
        })
    }

    /// Aggregates with the rectangle-picker extreme rule.
    ///
    /// `max` and `min` are computed per channel independently, so each
    /// channel of the result equals the true channel-wise extreme across
    /// the buffer (and the triple as a whole need not be any single input
    /// sample).
    ///
    /// # Errors
    /// Fails on an empty buffer.
    pub fn of_region(buffer: &SampleBuffer) -> Result<Self> {
        let pixels = Self::non_empty(buffer)?;

        let mut max = pixels[0];
        let mut min = pixels[0];
        for &sample in &pixels[1..] {
            max = Rgb::new(max.r.max(sample.r), max.g.max(sample.g), max.b.max(sample.b));
            min = Rgb::new(min.r.min(sample.r), min.g.min(sample.g), min.b.min(sample.b));
        }

        Ok(Statistics {
            mean: channel_mean(pixels),
            median: channel_median(pixels),
            max,
            min,
        })
    }

    pub fn get(&self, kind: StatisticKind) -> Rgb {
        match kind {
            StatisticKind::Max => self.max,
            StatisticKind::Mean => self.mean,
            StatisticKind::Median => self.median,
            StatisticKind::Min => self.min,
        }
    }

    fn non_empty(buffer: &SampleBuffer) -> Result<&[Rgb]> {
        if buffer.is_empty() {
            anyhow::bail!("Cannot aggregate statistics over an empty sample buffer");
        }
        Ok(buffer.pixels())
    }
}

/// Arithmetic mean per channel.
fn channel_mean(pixels: &[Rgb]) -> Rgb {
    let mut sum = [0.0f64; 3];
    for sample in pixels {
        for (channel, acc) in sum.iter_mut().enumerate() {
            *acc += sample.channel(channel) as f64;
        }
    }
    let n = pixels.len() as f64;
    Rgb::new(
        (sum[0] / n) as f32,
        (sum[1] / n) as f32,
        (sum[2] / n) as f32,
    )
}

/// Standard numeric median per channel: middle element for odd counts, the
/// average of the two middle elements for even counts.
fn channel_median(pixels: &[Rgb]) -> Rgb {
    let mut out = [0.0f32; 3];
    let mut values: Vec<f32> = Vec::with_capacity(pixels.len());
    for (channel, slot) in out.iter_mut().enumerate() {
        values.clear();
        values.extend(pixels.iter().map(|p| p.channel(channel)));
        values.sort_by(|a, b| a.total_cmp(b));
        let mid = values.len() / 2;
        *slot = if values.len() % 2 == 1 {
            values[mid]
        } else {
            (values[mid - 1] + values[mid]) / 2.0
        };
    }
    Rgb::new(out[0], out[1], out[2])
}
