// src/config.rs

//! Defines the configuration structures for the viewport picker.
//!
//! This module provides a set of structs that can be deserialized from a
//! configuration file (typically JSON handed over by the embedding host) to
//! customize the picker's behavior and overlay appearance.
//!
//! Default values are provided for every option, so a missing or partial
//! configuration is always usable.

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Represents the complete configuration for the picker plugin.
///
/// This struct is the root of the configuration and groups settings into
/// logical categories.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)] // Apply default values for the entire struct if a field is missing.
pub struct PickerConfig {
    /// Sampling and gesture behavior settings.
    pub behavior: BehaviorConfig,
    /// Overlay appearance settings.
    pub overlay: OverlayConfig,
}

impl PickerConfig {
    /// Parses a configuration from a JSON string.
    ///
    /// Missing fields fall back to their defaults, so `"{}"` yields the
    /// default configuration.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("Failed to parse picker configuration")
    }
}

/// Defines settings related to sampling behavior and gesture timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Tile edge length for the small preset picker (a 3 means 3x3 pixels).
    pub small_tile_size: u32,
    /// Tile edge length for the large preset picker.
    pub large_tile_size: u32,
    /// Initial value of the session's user-adjustable tile size.
    pub default_custom_size: u32,
    /// Delay in milliseconds between latching the second rectangle corner
    /// and reading the framebuffer, so an in-flight redraw can settle.
    pub debounce_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            small_tile_size: 3,
            large_tile_size: 5,
            default_custom_size: 10,
            debounce_ms: 200,
        }
    }
}

/// Defines the appearance of the transient gesture overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Edge length of the live color swatch drawn next to the pointer, in pixels.
    pub swatch_size_px: f32,
    /// Extra offset between the pointer and the swatch, added to the tile size.
    pub swatch_margin_px: f32,
    /// Outline color of the live color swatch (RGBA).
    pub swatch_edge_color: [f32; 4],
    /// Color of the rubber-band rectangle outline (RGBA).
    pub rubber_band_color: [f32; 4],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            swatch_size_px: 50.0,
            swatch_margin_px: 5.0,
            swatch_edge_color: [1.0, 0.0, 0.0, 1.0],
            rubber_band_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}
