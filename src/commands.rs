// src/commands.rs

//! The command registry: named entry points external UI wires to buttons
//! and menu items.
//!
//! Commands are plain functions keyed by name in a [`CommandRegistry`]; an
//! external dispatcher invokes them with a [`CommandArgs`] bundle. Gesture
//! commands put the runtime into a modal state, the rest complete
//! immediately.

use crate::binding::{validate_binding_target, UpdateBinding, ValidationReport};
use crate::host::ViewportHost;
use crate::runtime::PickerRuntime;
use crate::stats::StatisticKind;
use anyhow::{Context, Result};
use std::collections::HashMap;

/// Arguments a command invocation carries. Unused fields stay `None`.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    /// Tile edge length for the square samplers and the size setter.
    pub size: Option<u32>,
    /// Statistic name (`"max"`, `"mean"`, `"median"`, `"min"`) for the bind
    /// command.
    pub source: Option<String>,
    /// Target property path for the bind command.
    pub target: Option<String>,
}

impl CommandArgs {
    pub fn with_size(size: u32) -> Self {
        CommandArgs {
            size: Some(size),
            ..CommandArgs::default()
        }
    }

    pub fn bind(source: &str, target: &str) -> Self {
        CommandArgs {
            source: Some(source.to_string()),
            target: Some(target.to_string()),
            ..CommandArgs::default()
        }
    }
}

/// What a successfully dispatched command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A modal gesture is now running; keep feeding host events to
    /// [`PickerRuntime::dispatch_event`].
    GestureStarted,
    /// The command completed immediately with nothing to report.
    Done,
    /// The command completed with a user-facing message.
    Report(ValidationReport),
}

/// Signature of a command handler.
pub type CommandFn =
    fn(&mut PickerRuntime, &mut dyn ViewportHost, &CommandArgs) -> Result<CommandOutcome>;

/// Name-keyed table of command handlers.
pub struct CommandRegistry {
    handlers: HashMap<&'static str, CommandFn>,
}

impl CommandRegistry {
    /// The registry with every built-in picker command registered. Hosts
    /// embedding extra tooling can [`register`](Self::register) more.
    pub fn with_builtin_commands() -> Self {
        let mut registry = CommandRegistry {
            handlers: HashMap::new(),
        };
        registry.register("picker.sample_square", sample_square);
        registry.register("picker.sample_custom", sample_custom);
        registry.register("picker.sample_rect", sample_rect);
        registry.register("picker.bind", bind);
        registry.register("picker.clear_binding", clear_binding);
        registry.register("picker.set_custom_size", set_custom_size);
        registry.register("picker.reset", reset);
        registry
    }

    pub fn register(&mut self, name: &'static str, handler: CommandFn) {
        self.handlers.insert(name, handler);
    }

    pub fn get(&self, name: &str) -> Option<CommandFn> {
        self.handlers.get(name).copied()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        CommandRegistry::with_builtin_commands()
    }
}

/// Starts a point pick with the tile size given in the arguments.
fn sample_square(
    runtime: &mut PickerRuntime,
    host: &mut dyn ViewportHost,
    args: &CommandArgs,
) -> Result<CommandOutcome> {
    let size = args
        .size
        .context("picker.sample_square requires a size argument")?;
    runtime.start_point_gesture(host, size)?;
    Ok(CommandOutcome::GestureStarted)
}

/// Starts a point pick with the session's user-adjustable tile size.
fn sample_custom(
    runtime: &mut PickerRuntime,
    host: &mut dyn ViewportHost,
    _args: &CommandArgs,
) -> Result<CommandOutcome> {
    let size = runtime.session().custom_size();
    runtime.start_point_gesture(host, size)?;
    Ok(CommandOutcome::GestureStarted)
}

/// Starts the two-click rectangle pick.
fn sample_rect(
    runtime: &mut PickerRuntime,
    host: &mut dyn ViewportHost,
    _args: &CommandArgs,
) -> Result<CommandOutcome> {
    runtime.start_rect_gesture(host)?;
    Ok(CommandOutcome::GestureStarted)
}

/// Validates the requested target and installs the update binding.
///
/// A hard validation error leaves the current binding untouched; a gamma
/// warning still activates the new one, matching the tiered reporting the
/// panel shows the user.
fn bind(
    runtime: &mut PickerRuntime,
    _host: &mut dyn ViewportHost,
    args: &CommandArgs,
) -> Result<CommandOutcome> {
    let source = args
        .source
        .as_deref()
        .context("picker.bind requires a source statistic")?;
    let target = args
        .target
        .as_deref()
        .context("picker.bind requires a target path")?;

    let source = match StatisticKind::parse(source) {
        Some(kind) => kind,
        None => {
            return Ok(CommandOutcome::Report(ValidationReport::error(format!(
                "Unknown statistic '{}'",
                source
            ))));
        }
    };

    let validation = validate_binding_target(runtime.properties(), target);
    if let Some(target) = validation.target {
        runtime.session_mut().set_binding(UpdateBinding { source, target });
    }
    Ok(CommandOutcome::Report(validation.report))
}

fn clear_binding(
    runtime: &mut PickerRuntime,
    _host: &mut dyn ViewportHost,
    _args: &CommandArgs,
) -> Result<CommandOutcome> {
    runtime.session_mut().clear_binding();
    Ok(CommandOutcome::Report(ValidationReport::info(
        "Removed statistics update target",
    )))
}

/// Writes the session's custom tile size, clamped to the minimum.
fn set_custom_size(
    runtime: &mut PickerRuntime,
    _host: &mut dyn ViewportHost,
    args: &CommandArgs,
) -> Result<CommandOutcome> {
    let size = args
        .size
        .context("picker.set_custom_size requires a size argument")?;
    runtime.session_mut().set_custom_size(size);
    Ok(CommandOutcome::Done)
}

fn reset(
    runtime: &mut PickerRuntime,
    _host: &mut dyn ViewportHost,
    _args: &CommandArgs,
) -> Result<CommandOutcome> {
    runtime.reset_session()?;
    Ok(CommandOutcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_knows_every_picker_command() {
        let registry = CommandRegistry::with_builtin_commands();
        for name in [
            "picker.sample_square",
            "picker.sample_custom",
            "picker.sample_rect",
            "picker.bind",
            "picker.clear_binding",
            "picker.set_custom_size",
            "picker.reset",
        ] {
            assert!(registry.get(name).is_some(), "missing command {}", name);
        }
        assert!(registry.get("picker.unknown").is_none());
    }

    #[test]
    fn test_args_helpers_fill_only_their_fields() {
        let sized = CommandArgs::with_size(7);
        assert_eq!(sized.size, Some(7));
        assert!(sized.source.is_none() && sized.target.is_none());

        let bound = CommandArgs::bind("mean", "material.base_color");
        assert_eq!(bound.source.as_deref(), Some("mean"));
        assert_eq!(bound.target.as_deref(), Some("material.base_color"));
        assert!(bound.size.is_none());
    }
}
