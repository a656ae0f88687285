use rand::{Rng, RngCore};

/// Source of uniform draws on `[0, 1)` consumed by the engine.
///
/// Every random decision the engine makes goes through this trait, so a
/// seeded generator reproduces a run exactly.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;

    /// Draw from `U(-0.5, 0.5)`.
    fn next_centered(&mut self) -> f64 {
        self.next_unit() - 0.5
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let scaled = (self.next_unit() * len as f64) as usize;
        scaled.min(len - 1)
    }
}

impl<R: RngCore> UniformSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Yields the same unit draw forever. `ConstantSource::flat()` produces zero
/// deviations everywhere and never fires a signal mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSource {
    unit: f64,
}

impl ConstantSource {
    /// # Panics
    ///
    /// Panics if `unit` is not a finite value in `[0, 1)`.
    pub fn new(unit: f64) -> Self {
        assert!(
            unit.is_finite() && (0.0..1.0).contains(&unit),
            "unit draw must be within [0, 1)"
        );

        Self { unit }
    }

    pub fn flat() -> Self {
        Self::new(0.5)
    }
}

impl UniformSource for ConstantSource {
    fn next_unit(&mut self) -> f64 {
        self.unit
    }
}

/// Replays a fixed script of unit draws, cycling when exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// # Panics
    ///
    /// Panics if `draws` is empty or any draw lies outside `[0, 1)`.
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "script must contain at least one draw");
        assert!(
            draws
                .iter()
                .all(|draw| draw.is_finite() && (0.0..1.0).contains(draw)),
            "unit draws must be within [0, 1)"
        );

        Self { draws, cursor: 0 }
    }
}

impl UniformSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let draw = self.draws[self.cursor];
        self.cursor = (self.cursor + 1) % self.draws.len();
        draw
    }
}
