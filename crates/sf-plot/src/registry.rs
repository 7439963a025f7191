//! Plotter lookup by trajectory dimensionality.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{PlotError, PlotResult};
use crate::plotter::TrajectoryPlotter;
use crate::variants::{PhasePlanePlotter, PhaseVolumePlotter, TimeSeriesPlotter};

/// Builds a fresh plotter for each render call.
pub type PlotterFactory = Arc<dyn Fn() -> Box<dyn TrajectoryPlotter> + Send + Sync>;

/// Maps a state dimension to the plotter that handles it.
///
/// Each instance owns its table; registering on one registry never affects
/// another.
#[derive(Clone)]
pub struct PlotterRegistry {
    factories: BTreeMap<usize, PlotterFactory>,
}

impl PlotterRegistry {
    /// Registry with the built-in 1-D, 2-D and 3-D plotters.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_variant::<TimeSeriesPlotter>(1);
        registry.register_variant::<PhasePlanePlotter>(2);
        registry.register_variant::<PhaseVolumePlotter>(3);
        registry
    }

    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register `factory` for `dimension`, replacing any existing entry.
    pub fn register<F>(&mut self, dimension: usize, factory: F)
    where
        F: Fn() -> Box<dyn TrajectoryPlotter> + Send + Sync + 'static,
    {
        self.factories.insert(dimension, Arc::new(factory));
    }

    /// Register a default-constructible plotter type for `dimension`.
    pub fn register_variant<P>(&mut self, dimension: usize)
    where
        P: TrajectoryPlotter + Default + 'static,
    {
        self.register(dimension, || Box::new(P::default()));
    }

    /// A new plotter instance for `dimension`.
    pub fn resolve(&self, dimension: usize) -> PlotResult<Box<dyn TrajectoryPlotter>> {
        match self.factories.get(&dimension) {
            Some(factory) => Ok(factory()),
            None => Err(PlotError::PlotterNotFound {
                requested: dimension,
                available: self.dimensions(),
            }),
        }
    }

    /// Registered dimensions in ascending order.
    pub fn dimensions(&self) -> Vec<usize> {
        self.factories.keys().copied().collect()
    }

    pub fn contains(&self, dimension: usize) -> bool {
        self.factories.contains_key(&dimension)
    }
}

impl Default for PlotterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlotterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotterRegistry")
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_cover_one_to_three() {
        let registry = PlotterRegistry::new();
        assert_eq!(registry.dimensions(), vec![1, 2, 3]);
        assert_eq!(registry.resolve(1).unwrap().name(), "time-series");
        assert_eq!(registry.resolve(2).unwrap().name(), "phase-plane");
        assert_eq!(registry.resolve(3).unwrap().name(), "phase-volume");
    }

    #[test]
    fn missing_dimension_lists_available() {
        let err = PlotterRegistry::new().resolve(0).err().unwrap();
        match err {
            PlotError::PlotterNotFound {
                requested,
                available,
            } => {
                assert_eq!(requested, 0);
                assert_eq!(available, vec![1, 2, 3]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn register_replaces_existing_entry() {
        let mut registry = PlotterRegistry::new();
        registry.register_variant::<PhasePlanePlotter>(1);
        assert_eq!(registry.resolve(1).unwrap().name(), "phase-plane");
        assert_eq!(registry.dimensions(), vec![1, 2, 3]);
    }

    #[test]
    fn registries_are_independent() {
        let mut a = PlotterRegistry::new();
        let b = a.clone();
        a.register_variant::<PhaseVolumePlotter>(7);
        assert!(a.contains(7));
        assert!(!b.contains(7));
        assert!(PlotterRegistry::empty().dimensions().is_empty());
    }
}
