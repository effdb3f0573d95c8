// src/runtime.rs

//! Coordinates the picker session, the command registry, and the single
//! active modal gesture.
//!
//! This is the piece the embedding application talks to: commands are run
//! by name, host input events are routed to whichever gesture is live, and
//! overlay geometry is exposed for the host's redraw. The host serializes
//! modal interaction, so at most one gesture exists at a time and starting
//! another while one runs is an error surfaced to the caller.

use crate::binding::PropertyRegistry;
use crate::commands::{CommandArgs, CommandOutcome, CommandRegistry};
use crate::config::PickerConfig;
use crate::gesture::{GestureStatus, PointGesture, RectGesture};
use crate::host::{HostEvent, OverlayCommand, ViewportHost};
use crate::session::SessionState;
use anyhow::{Context, Result};
use log::debug;

enum ActiveGesture {
    Point(PointGesture),
    Rect(RectGesture),
}

/// One picker instance wired into a host session.
pub struct PickerRuntime {
    config: PickerConfig,
    session: SessionState,
    properties: PropertyRegistry,
    commands: CommandRegistry,
    active: Option<ActiveGesture>,
}

impl PickerRuntime {
    pub fn new(config: PickerConfig) -> Self {
        let session = SessionState::new(config.behavior.default_custom_size);
        PickerRuntime {
            config,
            session,
            properties: PropertyRegistry::new(),
            commands: CommandRegistry::with_builtin_commands(),
            active: None,
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    /// Access to the bindable host properties, e.g. to register them at
    /// plugin load.
    pub fn properties_mut(&mut self) -> &mut PropertyRegistry {
        &mut self.properties
    }

    /// Whether a modal gesture is currently consuming host events.
    pub fn gesture_active(&self) -> bool {
        self.active.is_some()
    }

    /// Looks up and runs a command by name.
    ///
    /// # Errors
    /// Fails on an unknown command name, on missing arguments, or when a
    /// gesture command is issued while another gesture is live.
    pub fn run_command(
        &mut self,
        host: &mut dyn ViewportHost,
        name: &str,
        args: &CommandArgs,
    ) -> Result<CommandOutcome> {
        let handler = self
            .commands
            .get(name)
            .with_context(|| format!("Unknown command '{}'", name))?;
        debug!("Running command '{}'", name);
        handler(self, host, args)
    }

    /// Routes one host event to the active gesture, if any.
    ///
    /// Returns `None` when no gesture is live. On `Finished` or `Cancelled`
    /// the gesture is dropped; on `Running` the current overlay geometry is
    /// submitted to the host.
    pub fn dispatch_event(
        &mut self,
        host: &mut dyn ViewportHost,
        event: &HostEvent,
    ) -> Option<GestureStatus> {
        let status = match self.active.as_mut()? {
            ActiveGesture::Point(gesture) => {
                gesture.handle_event(host, &mut self.session, &mut self.properties, event)
            }
            ActiveGesture::Rect(gesture) => {
                gesture.handle_event(host, &mut self.session, &mut self.properties, event)
            }
        };

        match status {
            GestureStatus::Running => {
                let commands = self.overlay_commands();
                if !commands.is_empty() {
                    host.draw_overlay(&commands);
                }
            }
            GestureStatus::Finished | GestureStatus::Cancelled => {
                self.active = None;
            }
        }
        Some(status)
    }

    /// Overlay geometry for the current frame, empty when no gesture is
    /// live or its overlay registration failed.
    pub fn overlay_commands(&self) -> Vec<OverlayCommand> {
        match &self.active {
            Some(ActiveGesture::Point(gesture)) if gesture.overlay_active() => {
                gesture.overlay_commands()
            }
            Some(ActiveGesture::Rect(gesture)) if gesture.overlay_active() => {
                gesture.overlay_commands()
            }
            _ => Vec::new(),
        }
    }

    /// Starts a point-pick gesture with the given tile size.
    pub fn start_point_gesture(&mut self, host: &mut dyn ViewportHost, size: u32) -> Result<()> {
        self.ensure_idle()?;
        let gesture = PointGesture::start(host, &self.session, size, self.config.overlay.clone());
        self.active = Some(ActiveGesture::Point(gesture));
        Ok(())
    }

    /// Starts a rectangle-pick gesture.
    pub fn start_rect_gesture(&mut self, host: &mut dyn ViewportHost) -> Result<()> {
        self.ensure_idle()?;
        let gesture = RectGesture::start(host, &self.config.behavior, self.config.overlay.clone());
        self.active = Some(ActiveGesture::Rect(gesture));
        Ok(())
    }

    /// Resets the session to its load defaults.
    ///
    /// # Errors
    /// Fails while a gesture is live; a modal interaction owns the session
    /// until it ends.
    pub fn reset_session(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.session.reset(self.config.behavior.default_custom_size);
        debug!("Session reset to defaults");
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.active.is_some() {
            anyhow::bail!("A picker gesture is already running");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::PropertyDescriptor;
    use crate::color::Rgb;
    use crate::host::mock::MockHost;
    use crate::host::PointerButton;

    fn fixture() -> (PickerRuntime, MockHost) {
        let mut config = PickerConfig::default();
        config.behavior.debounce_ms = 0;
        let mut host = MockHost::new(64, 64);
        host.fill(Rgb::new(0.25, 0.5, 0.75));
        (PickerRuntime::new(config), host)
    }

    fn moved(x: i32, y: i32) -> HostEvent {
        HostEvent::PointerMove { x, y }
    }

    fn press(button: PointerButton, x: i32, y: i32) -> HostEvent {
        HostEvent::ButtonPress { button, x, y }
    }

    fn release(button: PointerButton, x: i32, y: i32) -> HostEvent {
        HostEvent::ButtonRelease { button, x, y }
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let (mut runtime, mut host) = fixture();
        assert!(runtime
            .run_command(&mut host, "picker.unknown", &CommandArgs::default())
            .is_err());
    }

    #[test]
    fn test_point_pick_command_runs_to_completion() {
        let (mut runtime, mut host) = fixture();
        let outcome = runtime
            .run_command(&mut host, "picker.sample_square", &CommandArgs::with_size(3))
            .unwrap();
        assert_eq!(outcome, CommandOutcome::GestureStarted);
        assert!(runtime.gesture_active());

        assert_eq!(
            runtime.dispatch_event(&mut host, &moved(32, 32)),
            Some(GestureStatus::Running)
        );
        assert_eq!(
            runtime.dispatch_event(&mut host, &release(PointerButton::Primary, 32, 32)),
            Some(GestureStatus::Finished)
        );
        assert!(!runtime.gesture_active());
        assert_eq!(runtime.dispatch_event(&mut host, &moved(0, 0)), None);
        assert_eq!(
            runtime.session().statistics().mean,
            Rgb::new(0.25, 0.5, 0.75)
        );
    }

    #[test]
    fn test_second_gesture_while_one_is_live_is_rejected() {
        let (mut runtime, mut host) = fixture();
        runtime
            .run_command(&mut host, "picker.sample_rect", &CommandArgs::default())
            .unwrap();
        assert!(runtime
            .run_command(&mut host, "picker.sample_square", &CommandArgs::with_size(3))
            .is_err());
        // The live gesture is untouched by the failed start.
        assert!(runtime.gesture_active());
    }

    #[test]
    fn test_custom_size_command_feeds_the_custom_picker() {
        let (mut runtime, mut host) = fixture();
        runtime
            .run_command(&mut host, "picker.set_custom_size", &CommandArgs::with_size(7))
            .unwrap();
        runtime
            .run_command(&mut host, "picker.sample_custom", &CommandArgs::default())
            .unwrap();
        runtime.dispatch_event(&mut host, &moved(32, 32));

        // First read is the 7x7 tile, second the 1x1 swatch probe.
        assert_eq!(host.read_requests[0].width, 7);
        assert_eq!(host.read_requests[0].height, 7);
    }

    #[test]
    fn test_bind_command_mirrors_the_next_publish() {
        let (mut runtime, mut host) = fixture();
        runtime
            .properties_mut()
            .register(
                "material.base_color",
                PropertyDescriptor {
                    len: 4,
                    gamma_encoded: true,
                },
            )
            .unwrap();

        let outcome = runtime
            .run_command(
                &mut host,
                "picker.bind",
                &CommandArgs::bind("mean", "material.base_color"),
            )
            .unwrap();
        match outcome {
            CommandOutcome::Report(report) => {
                assert_eq!(report.severity, crate::binding::Severity::Info)
            }
            other => panic!("expected report, got {:?}", other),
        }

        runtime
            .run_command(&mut host, "picker.sample_square", &CommandArgs::with_size(3))
            .unwrap();
        runtime.dispatch_event(&mut host, &moved(32, 32));
        runtime.dispatch_event(&mut host, &release(PointerButton::Primary, 32, 32));

        let path = crate::binding::PropertyPath::parse("material.base_color").unwrap();
        assert_eq!(
            runtime.properties().values(&path).unwrap()[..3],
            [0.25, 0.5, 0.75]
        );
    }

    #[test]
    fn test_bind_command_rejects_statistics_store_target() {
        let (mut runtime, mut host) = fixture();
        let outcome = runtime
            .run_command(&mut host, "picker.bind", &CommandArgs::bind("max", "picker.max"))
            .unwrap();
        match outcome {
            CommandOutcome::Report(report) => {
                assert_eq!(report.severity, crate::binding::Severity::Error)
            }
            other => panic!("expected report, got {:?}", other),
        }
        assert!(runtime.session().binding().is_none());
    }

    #[test]
    fn test_rect_flow_through_runtime_publishes_and_draws_overlay() {
        let (mut runtime, mut host) = fixture();
        host.fill(Rgb::new(0.5, 0.5, 0.5));
        runtime
            .run_command(&mut host, "picker.sample_rect", &CommandArgs::default())
            .unwrap();

        runtime.dispatch_event(&mut host, &press(PointerButton::Primary, 4, 4));
        runtime.dispatch_event(&mut host, &moved(10, 12));
        assert!(!host.drawn_commands.is_empty());

        runtime.dispatch_event(&mut host, &press(PointerButton::Secondary, 10, 12));
        let status = runtime.dispatch_event(&mut host, &HostEvent::Tick);
        assert_eq!(status, Some(GestureStatus::Finished));
        assert_eq!(runtime.session().statistics().mean, Rgb::new(0.5, 0.5, 0.5));
        assert!(host.overlays_balanced());
    }

    #[test]
    fn test_reset_command_restores_defaults_but_not_mid_gesture() {
        let (mut runtime, mut host) = fixture();
        runtime
            .run_command(&mut host, "picker.set_custom_size", &CommandArgs::with_size(42))
            .unwrap();

        runtime
            .run_command(&mut host, "picker.sample_rect", &CommandArgs::default())
            .unwrap();
        assert!(runtime
            .run_command(&mut host, "picker.reset", &CommandArgs::default())
            .is_err());
        runtime.dispatch_event(
            &mut host,
            &HostEvent::Key {
                symbol: crate::keys::KeySymbol::Escape,
                modifiers: crate::keys::Modifiers::empty(),
            },
        );

        runtime
            .run_command(&mut host, "picker.reset", &CommandArgs::default())
            .unwrap();
        assert_eq!(runtime.session().custom_size(), 10);
    }
}
