//! Calibration of fracture placement against a target spacing
//! distribution.
//!
//! Purpose
//! - Maintain the real/dream/tmp histograms of scanline separation
//!   distances, score configurations by the chi-square objective, and
//!   search placement space by simulated annealing followed by MCMC.
//!
//! Why this design
//! - The runner borrows the fracture and scanline state and owns the
//!   histograms, counters, and trace. No process-wide state, so
//!   independent runs can coexist in one process.
//! - Moves are rigid translations of one fracture. A snapshot of the moved
//!   corners and every hit list is taken before the move, so rejection
//!   restores the exact pre-move state without a full resample.
//!
//! Code cross-refs: `scanline::full_sample`,
//! `scanline::incremental_sample`, `geom::Domain`, `random::UniformSource`.

mod histogram;
mod runner;

pub use histogram::{chi_square, Histogram, HistogramClass};
pub use runner::{Calibrator, PhaseStats};

use std::fmt;

/// Configurable target vocabulary for the spacing distribution. Only the
/// negative exponential is implemented; configuring any other kind is a
/// fatal error surfaced before iteration starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetDistribution {
    NegativeExponential { lambda: f64 },
    LogNormal { mu: f64, sigma: f64 },
    PowerLaw { exponent: f64 },
}

impl fmt::Display for TargetDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeExponential { lambda } => {
                write!(f, "negative-exponential(lambda={lambda})")
            }
            Self::LogNormal { mu, sigma } => write!(f, "log-normal(mu={mu}, sigma={sigma})"),
            Self::PowerLaw { exponent } => write!(f, "power-law(exponent={exponent})"),
        }
    }
}

/// Calibration failures. All of these are fatal for the enclosing run.
#[derive(Debug)]
pub enum CalibrateError {
    InvalidParams(String),
    UnsupportedDistribution(TargetDistribution),
}

impl CalibrateError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams(reason.into())
    }
}

impl fmt::Display for CalibrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams(reason) => write!(f, "invalid calibration params: {reason}"),
            Self::UnsupportedDistribution(target) => {
                write!(f, "unsupported target distribution: {target}")
            }
        }
    }
}

impl std::error::Error for CalibrateError {}

/// Histogram layout, iteration budgets, and the annealing schedule.
#[derive(Clone, Copy, Debug)]
pub struct CalibrateParams {
    /// Histogram support, lower edge.
    pub min_distance: f64,
    /// Histogram support, upper edge.
    pub max_distance: f64,
    /// Number of equal-width histogram classes.
    pub classes: usize,
    /// Annealing start temperature.
    pub start_temperature: f64,
    /// Multiplicative cooling factor applied after each outer step.
    pub cooling: f64,
    /// Outer annealing steps (one temperature level each).
    pub temp_steps: usize,
    /// Inner annealing iterations per temperature level.
    pub steps_per_temp: usize,
    /// MCMC iterations after annealing.
    pub mcmc_iterations: usize,
    /// Target spacing distribution.
    pub target: TargetDistribution,
}

impl CalibrateParams {
    pub fn validate(&self) -> Result<(), CalibrateError> {
        if !(self.min_distance.is_finite() && self.max_distance.is_finite()) {
            return Err(CalibrateError::invalid("distance bounds must be finite"));
        }
        if self.min_distance < 0.0 {
            return Err(CalibrateError::invalid("min_distance must be >= 0"));
        }
        if self.max_distance <= self.min_distance {
            return Err(CalibrateError::invalid(
                "max_distance must exceed min_distance",
            ));
        }
        if self.classes == 0 {
            return Err(CalibrateError::invalid("need at least one histogram class"));
        }
        if !(self.start_temperature > 0.0) {
            return Err(CalibrateError::invalid("start_temperature must be > 0"));
        }
        if !(self.cooling > 0.0 && self.cooling < 1.0) {
            return Err(CalibrateError::invalid("cooling factor must lie in (0, 1)"));
        }
        if let TargetDistribution::NegativeExponential { lambda } = self.target {
            if !(lambda > 0.0) {
                return Err(CalibrateError::invalid("lambda must be > 0"));
            }
        }
        Ok(())
    }
}
