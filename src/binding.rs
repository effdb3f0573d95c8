// src/binding.rs

//! Property registry and the copy-to-target update binding.
//!
//! The binding lets the user mirror one statistic into an arbitrary numeric
//! host property. Targets are addressed by a typed, validated path into an
//! explicit registry; the picker never evaluates host expressions. The
//! accepted path grammar is intentionally strict: dotted identifier
//! segments, each optionally followed by one `[index]`, and nothing else.

use crate::color::Rgb;
use crate::stats::StatisticKind;
use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Paths the binding may never target: the statistic store itself.
pub const RESERVED_STATISTIC_PATHS: [&str; 4] = [
    "picker.max",
    "picker.mean",
    "picker.median",
    "picker.min",
];

/// Severity of a user-facing validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-facing message produced while validating a binding request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub severity: Severity,
    pub message: String,
}

impl ValidationReport {
    pub fn info(message: impl Into<String>) -> Self {
        ValidationReport {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        ValidationReport {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ValidationReport {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// A validated reference to a registry property.
///
/// Construction is only possible through [`PropertyPath::parse`], so any
/// `PropertyPath` value is known to be well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyPath(String);

impl PropertyPath {
    /// Parses and validates a raw path string.
    ///
    /// Accepted form: two or more `.`-separated segments, each matching
    /// `[A-Za-z_][A-Za-z0-9_]*` with an optional trailing `[digits]` index.
    /// Anything else, including separators, whitespace, or control
    /// characters, is rejected.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("Data path is empty".to_string());
        }
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() < 2 {
            return Err(format!("Data path '{}' has no property segment", raw));
        }
        for segment in &segments {
            if !segment_is_valid(segment) {
                return Err(format!(
                    "Data path '{}' contains an invalid segment '{}'",
                    raw, segment
                ));
            }
        }
        Ok(PropertyPath(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this path names one of the statistic store slots.
    pub fn is_reserved_statistic(&self) -> bool {
        RESERVED_STATISTIC_PATHS.contains(&self.0.as_str())
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks one dotted segment: identifier plus at most one `[digits]` suffix.
fn segment_is_valid(segment: &str) -> bool {
    let (ident, index) = match segment.find('[') {
        Some(pos) => (&segment[..pos], Some(&segment[pos..])),
        None => (segment, None),
    };

    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }

    match index {
        None => true,
        Some(idx) => {
            idx.len() > 2
                && idx.starts_with('[')
                && idx.ends_with(']')
                && idx[1..idx.len() - 1].chars().all(|c| c.is_ascii_digit())
        }
    }
}

/// Describes one bindable host property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Number of float components, 3 or 4. Components beyond the first
    /// three are never written by the binding.
    pub len: usize,
    /// Whether the host flags the property as gamma-encoded color data.
    pub gamma_encoded: bool,
}

struct PropertyEntry {
    descriptor: PropertyDescriptor,
    values: Vec<f32>,
}

/// Registry of the numeric array properties the host exposes for binding.
///
/// This models the fixed capability set the binding validates against:
/// every entry is a float array of length 3 or 4.
#[derive(Default)]
pub struct PropertyRegistry {
    entries: HashMap<PropertyPath, PropertyEntry>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property under a validated path.
    ///
    /// # Errors
    /// Fails when the path is malformed or the descriptor length is not 3
    /// or 4.
    pub fn register(&mut self, raw_path: &str, descriptor: PropertyDescriptor) -> Result<()> {
        let path = PropertyPath::parse(raw_path).map_err(anyhow::Error::msg)?;
        if !(3..=4).contains(&descriptor.len) {
            anyhow::bail!(
                "Property '{}' must have 3 or 4 components, got {}",
                raw_path,
                descriptor.len
            );
        }
        let values = vec![0.0; descriptor.len];
        self.entries.insert(
            path,
            PropertyEntry {
                descriptor,
                values,
            },
        );
        Ok(())
    }

    pub fn descriptor(&self, path: &PropertyPath) -> Option<&PropertyDescriptor> {
        self.entries.get(path).map(|entry| &entry.descriptor)
    }

    pub fn values(&self, path: &PropertyPath) -> Option<&[f32]> {
        self.entries.get(path).map(|entry| entry.values.as_slice())
    }

    /// Overwrites the first three components of a property, leaving any
    /// fourth component untouched.
    pub fn write_color(&mut self, path: &PropertyPath, color: Rgb) {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.values[0] = color.r;
            entry.values[1] = color.g;
            entry.values[2] = color.b;
        }
    }
}

/// An active mirroring rule: whenever `source` changes, its channels are
/// copied into the first three components of `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBinding {
    pub source: StatisticKind,
    pub target: PropertyPath,
}

/// Result of validating a binding request.
pub struct BindingValidation {
    /// The validated target, present only when the binding may activate.
    pub target: Option<PropertyPath>,
    pub report: ValidationReport,
}

/// Validates a user-supplied target path against the registry.
///
/// Mirrors the tiered reporting the panel surfaces to the user: a hard
/// error aborts the binding, a gamma warning still activates it, and a
/// clean target produces an informational confirmation.
pub fn validate_binding_target(
    registry: &PropertyRegistry,
    raw_path: &str,
) -> BindingValidation {
    let path = match PropertyPath::parse(raw_path) {
        Ok(path) => path,
        Err(reason) => {
            return BindingValidation {
                target: None,
                report: ValidationReport::error(reason),
            };
        }
    };

    if path.is_reserved_statistic() {
        return BindingValidation {
            target: None,
            report: ValidationReport::error("Cannot update itself, aborting"),
        };
    }

    let descriptor = match registry.descriptor(&path) {
        Some(descriptor) => descriptor,
        None => {
            return BindingValidation {
                target: None,
                report: ValidationReport::error(format!(
                    "Data path '{}' does not resolve to a property",
                    path
                )),
            };
        }
    };

    // Registration enforces 3..=4, so this guards registry misuse only.
    if !(3..=4).contains(&descriptor.len) {
        return BindingValidation {
            target: None,
            report: ValidationReport::error("Property unable to store RGB channels"),
        };
    }

    debug!("Binding target '{}' validated (len {})", path, descriptor.len);

    let report = if !descriptor.gamma_encoded {
        ValidationReport::warning(
            "Target property is not gamma corrected, result may be unexpected",
        )
    } else {
        ValidationReport::info(format!("Statistics will now update {}", path))
    };

    BindingValidation {
        target: Some(path),
        report,
    }
}
