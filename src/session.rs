// src/session.rs

//! Session-wide picker state: the four published statistics, the
//! user-adjustable tile size, and the optional update binding.
//!
//! There is exactly one `SessionState` per plugin session. Gestures mutate
//! it in place; the host serializes modal interaction, so no locking is
//! involved. Statistics are always written wholesale, never one value at a
//! time, which is what makes cancel-restore atomic.

use crate::binding::{PropertyRegistry, UpdateBinding};
use crate::color::Rgb;
use crate::stats::{StatisticKind, Statistics};
use log::debug;
use serde::{Deserialize, Serialize};

/// Minimum accepted tile size; a 1x1 "tile" is just the point sample and a
/// 0 would produce an empty region.
pub const MIN_CUSTOM_SIZE: u32 = 2;

/// The four current statistic values, readable by host UI at any time.
///
/// Also serves as the pre-gesture snapshot type: the point picker copies
/// the whole store on gesture start and restores it verbatim on cancel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsStore {
    pub max: Rgb,
    pub min: Rgb,
    pub median: Rgb,
    pub mean: Rgb,
}

impl Default for StatisticsStore {
    fn default() -> Self {
        // Load-time defaults, matching what a fresh panel displays.
        StatisticsStore {
            max: Rgb::WHITE,
            min: Rgb::BLACK,
            median: Rgb::splat(0.5),
            mean: Rgb::splat(0.5),
        }
    }
}

impl StatisticsStore {
    pub fn get(&self, kind: StatisticKind) -> Rgb {
        match kind {
            StatisticKind::Max => self.max,
            StatisticKind::Mean => self.mean,
            StatisticKind::Median => self.median,
            StatisticKind::Min => self.min,
        }
    }
}

/// Mutable state for one plugin session.
pub struct SessionState {
    statistics: StatisticsStore,
    custom_size: u32,
    binding: Option<UpdateBinding>,
}

impl SessionState {
    pub fn new(default_custom_size: u32) -> Self {
        SessionState {
            statistics: StatisticsStore::default(),
            custom_size: default_custom_size.max(MIN_CUSTOM_SIZE),
            binding: None,
        }
    }

    /// Resets statistics, tile size, and binding to their load defaults.
    pub fn reset(&mut self, default_custom_size: u32) {
        self.statistics = StatisticsStore::default();
        self.custom_size = default_custom_size.max(MIN_CUSTOM_SIZE);
        self.binding = None;
    }

    pub fn statistics(&self) -> &StatisticsStore {
        &self.statistics
    }

    pub fn custom_size(&self) -> u32 {
        self.custom_size
    }

    /// Sets the user-adjustable tile size, clamped to the minimum.
    pub fn set_custom_size(&mut self, size: u32) {
        self.custom_size = size.max(MIN_CUSTOM_SIZE);
    }

    pub fn binding(&self) -> Option<&UpdateBinding> {
        self.binding.as_ref()
    }

    pub fn set_binding(&mut self, binding: UpdateBinding) {
        debug!(
            "Update binding installed: {} -> {}",
            binding.source.as_str(),
            binding.target
        );
        self.binding = Some(binding);
    }

    pub fn clear_binding(&mut self) {
        self.binding = None;
    }

    /// Captures the statistic store for a later atomic restore.
    pub fn snapshot(&self) -> StatisticsStore {
        self.statistics
    }

    /// Publishes a fresh aggregate, overwriting all four statistics, and
    /// re-broadcasts the bound statistic into its target.
    pub fn publish(&mut self, aggregate: &Statistics, registry: &mut PropertyRegistry) {
        self.statistics = StatisticsStore {
            max: aggregate.max,
            min: aggregate.min,
            median: aggregate.median,
            mean: aggregate.mean,
        };
        self.broadcast(registry);
    }

    /// Restores a pre-gesture snapshot, all four values together.
    ///
    /// The binding target is updated from the restored value as well, so a
    /// cancelled gesture leaves no trace in the mirrored property either.
    pub fn restore(&mut self, snapshot: StatisticsStore, registry: &mut PropertyRegistry) {
        self.statistics = snapshot;
        self.broadcast(registry);
    }

    fn broadcast(&self, registry: &mut PropertyRegistry) {
        if let Some(binding) = &self.binding {
            registry.write_color(&binding.target, self.statistics.get(binding.source));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{
        validate_binding_target, PropertyDescriptor, PropertyPath, PropertyRegistry,
    };
    use crate::stats::SampleBuffer;
    use crate::stats::Statistics;

    fn aggregate_of(pixels: Vec<Rgb>) -> Statistics {
        let buf = SampleBuffer::new(pixels.len() as u32, 1, pixels).unwrap();
        Statistics::of_region(&buf).unwrap()
    }

    fn registry_with_target() -> (PropertyRegistry, PropertyPath) {
        let mut registry = PropertyRegistry::new();
        registry
            .register(
                "material.base_color",
                PropertyDescriptor {
                    len: 4,
                    gamma_encoded: true,
                },
            )
            .unwrap();
        let path = PropertyPath::parse("material.base_color").unwrap();
        (registry, path)
    }

    #[test]
    fn test_defaults_match_panel_initial_values() {
        let session = SessionState::new(10);
        assert_eq!(session.statistics().max, Rgb::WHITE);
        assert_eq!(session.statistics().min, Rgb::BLACK);
        assert_eq!(session.statistics().mean, Rgb::splat(0.5));
        assert_eq!(session.statistics().median, Rgb::splat(0.5));
        assert_eq!(session.custom_size(), 10);
    }

    #[test]
    fn test_custom_size_clamps_to_minimum() {
        let mut session = SessionState::new(10);
        session.set_custom_size(1);
        assert_eq!(session.custom_size(), MIN_CUSTOM_SIZE);
        session.set_custom_size(64);
        assert_eq!(session.custom_size(), 64);
    }

    #[test]
    fn test_publish_overwrites_all_four_statistics() {
        let mut session = SessionState::new(10);
        let mut registry = PropertyRegistry::new();
        let aggregate = aggregate_of(vec![Rgb::splat(0.25), Rgb::splat(0.75)]);
        session.publish(&aggregate, &mut registry);
        assert_eq!(session.statistics().mean, Rgb::splat(0.5));
        assert_eq!(session.statistics().max, Rgb::splat(0.75));
        assert_eq!(session.statistics().min, Rgb::splat(0.25));
    }

    #[test]
    fn test_snapshot_restore_is_atomic_and_exact() {
        let mut session = SessionState::new(10);
        let mut registry = PropertyRegistry::new();
        session.publish(
            &aggregate_of(vec![Rgb::new(0.1, 0.2, 0.3)]),
            &mut registry,
        );
        let snapshot = session.snapshot();

        session.publish(&aggregate_of(vec![Rgb::splat(0.9)]), &mut registry);
        assert_ne!(*session.statistics(), snapshot);

        session.restore(snapshot, &mut registry);
        assert_eq!(*session.statistics(), snapshot);
    }

    #[test]
    fn test_publish_mirrors_bound_statistic_into_target() {
        let mut session = SessionState::new(10);
        let (mut registry, path) = registry_with_target();
        let validation = validate_binding_target(&registry, "material.base_color");
        session.set_binding(UpdateBinding {
            source: StatisticKind::Median,
            target: validation.target.unwrap(),
        });

        session.publish(&aggregate_of(vec![Rgb::new(0.2, 0.4, 0.6)]), &mut registry);
        assert_eq!(registry.values(&path).unwrap()[..3], [0.2, 0.4, 0.6]);
    }

    #[test]
    fn test_restore_rebroadcasts_into_target() {
        let mut session = SessionState::new(10);
        let (mut registry, path) = registry_with_target();
        let validation = validate_binding_target(&registry, "material.base_color");
        session.set_binding(UpdateBinding {
            source: StatisticKind::Mean,
            target: validation.target.unwrap(),
        });

        let snapshot = session.snapshot();
        session.publish(&aggregate_of(vec![Rgb::splat(0.9)]), &mut registry);
        session.restore(snapshot, &mut registry);
        assert_eq!(registry.values(&path).unwrap()[..3], [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_cleared_binding_stops_mirroring() {
        let mut session = SessionState::new(10);
        let (mut registry, path) = registry_with_target();
        let validation = validate_binding_target(&registry, "material.base_color");
        session.set_binding(UpdateBinding {
            source: StatisticKind::Max,
            target: validation.target.unwrap(),
        });
        session.clear_binding();

        session.publish(&aggregate_of(vec![Rgb::splat(0.9)]), &mut registry);
        assert_eq!(registry.values(&path).unwrap()[..3], [0.0, 0.0, 0.0]);
    }
}
