// src/main.rs

//! Demo binary: drives the full picker against a headless host with a
//! synthetic framebuffer, the way an embedding application would wire it
//! into its event loop.

use anyhow::{Context, Result};
use log::{info, warn};
use std::time::Duration;

use viewport_picker::binding::{PropertyDescriptor, PropertyPath, Severity};
use viewport_picker::commands::{CommandArgs, CommandOutcome};
use viewport_picker::config::PickerConfig;
use viewport_picker::host::headless::HeadlessHost;
use viewport_picker::host::{HostEvent, PointerButton};
use viewport_picker::runtime::PickerRuntime;
use viewport_picker::{GestureStatus, Rgb};

const FRAMEBUFFER_SIZE: u32 = 256;
const DEMO_TARGET: &str = "material.base_color";

fn main() -> Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting viewport picker demo...");

    let mut host = HeadlessHost::new(FRAMEBUFFER_SIZE, FRAMEBUFFER_SIZE);
    paint_gradient(&mut host);

    let mut picker = PickerRuntime::new(PickerConfig::default());
    picker
        .properties_mut()
        .register(
            DEMO_TARGET,
            PropertyDescriptor {
                len: 4,
                gamma_encoded: true,
            },
        )
        .context("Failed to register the demo binding target")?;

    // --- Point pick: hover across the gradient, commit on release ---
    run_command(
        &mut picker,
        &mut host,
        "picker.sample_square",
        &CommandArgs::with_size(5),
    )?;
    for step in 0..8 {
        let position = 32 + step * 24;
        drive(&mut picker, &mut host, &HostEvent::PointerMove {
            x: position,
            y: position,
        })?;
    }
    drive(
        &mut picker,
        &mut host,
        &HostEvent::ButtonRelease {
            button: PointerButton::Primary,
            x: 200,
            y: 200,
        },
    )?;
    info!(
        "Point pick committed: {}",
        serde_json::to_string(picker.session().statistics())?
    );

    // --- Bind the mean statistic to the demo property ---
    run_command(
        &mut picker,
        &mut host,
        "picker.bind",
        &CommandArgs::bind("mean", DEMO_TARGET),
    )?;

    // --- Rectangle pick: two clicks, then poll out the debounce ---
    run_command(&mut picker, &mut host, "picker.sample_rect", &CommandArgs::default())?;
    drive(
        &mut picker,
        &mut host,
        &HostEvent::ButtonPress {
            button: PointerButton::Primary,
            x: 40,
            y: 40,
        },
    )?;
    drive(&mut picker, &mut host, &HostEvent::PointerMove { x: 120, y: 90 })?;
    drive(
        &mut picker,
        &mut host,
        &HostEvent::ButtonPress {
            button: PointerButton::Secondary,
            x: 120,
            y: 90,
        },
    )?;
    loop {
        match picker.dispatch_event(&mut host, &HostEvent::Tick) {
            Some(GestureStatus::Running) => {
                // The host's idle pulse; the picker itself never sleeps.
                std::thread::sleep(Duration::from_millis(10));
            }
            Some(GestureStatus::Finished) => break,
            Some(GestureStatus::Cancelled) => anyhow::bail!("Rectangle pick was cancelled"),
            None => anyhow::bail!("Rectangle gesture ended without committing"),
        }
    }
    info!(
        "Rectangle pick committed: {}",
        serde_json::to_string(picker.session().statistics())?
    );

    let path = PropertyPath::parse(DEMO_TARGET)
        .map_err(anyhow::Error::msg)
        .context("Demo target path no longer parses")?;
    if let Some(values) = picker.properties().values(&path) {
        info!("Bound property {} now holds {:?}", DEMO_TARGET, values);
    }

    info!("Demo finished.");
    Ok(())
}

/// Diagonal color gradient so different regions aggregate differently.
fn paint_gradient(host: &mut HeadlessHost) {
    let span = (FRAMEBUFFER_SIZE - 1) as f32;
    for y in 0..FRAMEBUFFER_SIZE {
        for x in 0..FRAMEBUFFER_SIZE {
            host.set_pixel(
                x as i32,
                y as i32,
                Rgb::new(x as f32 / span, y as f32 / span, 0.25),
            );
        }
    }
}

fn run_command(
    picker: &mut PickerRuntime,
    host: &mut HeadlessHost,
    name: &str,
    args: &CommandArgs,
) -> Result<()> {
    let outcome = picker
        .run_command(host, name, args)
        .with_context(|| format!("Command '{}' failed", name))?;
    match outcome {
        CommandOutcome::GestureStarted => info!("{}: gesture started", name),
        CommandOutcome::Done => info!("{}: done", name),
        CommandOutcome::Report(report) => match report.severity {
            Severity::Error | Severity::Warning => warn!("{}: {}", name, report.message),
            Severity::Info => info!("{}: {}", name, report.message),
        },
    }
    Ok(())
}

fn drive(picker: &mut PickerRuntime, host: &mut HeadlessHost, event: &HostEvent) -> Result<()> {
    if picker.dispatch_event(host, event).is_none() {
        anyhow::bail!("No gesture is running");
    }
    Ok(())
}
