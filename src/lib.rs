// src/lib.rs

//! Core of a viewport color-sampling plugin.
//!
//! The crate implements the host-independent part of an interactive pixel
//! picker: modal point and rectangle gestures, per-channel statistics over
//! the sampled pixels, and an update binding that mirrors one statistic
//! into an external numeric property. The embedding application provides
//! the render target and the 2D overlay through the [`host::ViewportHost`]
//! trait and feeds input as [`host::HostEvent`]s; everything here runs
//! synchronously on the host's UI thread.

// Declare modules
pub mod binding;
pub mod color;
pub mod commands;
pub mod config;
pub mod gesture;
pub mod host;
pub mod keys;
pub mod runtime;
pub mod sampler;
pub mod session;
pub mod stats;

pub use crate::color::Rgb;
pub use crate::commands::{CommandArgs, CommandOutcome};
pub use crate::config::PickerConfig;
pub use crate::gesture::GestureStatus;
pub use crate::host::{HostEvent, PointerButton, ViewportHost};
pub use crate::runtime::PickerRuntime;
pub use crate::stats::{SampleBuffer, StatisticKind, Statistics};
