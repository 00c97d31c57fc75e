//! Simulated annealing and MCMC search over fracture placements.
//!
//! Reproducibility contract: each iteration draws, in order, the fracture
//! index, the new center (x, y, z), and then at most one acceptance coin.
//! Annealing consumes the coin only when the candidate does not improve
//! the objective; MCMC consumes it every iteration.

use std::mem;

use super::histogram::{chi_square, Histogram};
use super::{CalibrateError, CalibrateParams};
use crate::geom::{Domain, Fracture, Tol};
use crate::random::UniformSource;
use crate::scanline::{full_sample, incremental_sample, Hit, Scanline};
use crate::Point3;

/// Accept/reject bookkeeping for one optimization phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseStats {
    pub iterations: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// Pre-move state, restored verbatim on rejection.
struct MoveSnapshot {
    index: usize,
    corners: [Point3; 4],
    hits: Vec<Vec<Hit>>,
}

/// Calibration runner: borrows the mutable fracture and scanline state,
/// owns the histograms, objective, temperature, and trace.
pub struct Calibrator<'a, S: UniformSource> {
    fractures: &'a mut [Fracture],
    scanlines: &'a mut [Scanline],
    domain: &'a Domain,
    params: CalibrateParams,
    tol: Tol,
    src: &'a mut S,
    real: Histogram,
    dream: Histogram,
    tmp: Histogram,
    objective: f64,
    temperature: f64,
    trace: Vec<f64>,
}

impl<'a, S: UniformSource> Calibrator<'a, S> {
    /// Validate the params, run the baseline full sample, fill the target
    /// histogram, and score the starting configuration.
    pub fn new(
        fractures: &'a mut [Fracture],
        scanlines: &'a mut [Scanline],
        domain: &'a Domain,
        params: CalibrateParams,
        tol: Tol,
        src: &'a mut S,
    ) -> Result<Self, CalibrateError> {
        params.validate()?;
        if fractures.is_empty() {
            return Err(CalibrateError::invalid("no fractures to calibrate"));
        }
        if scanlines.is_empty() {
            return Err(CalibrateError::invalid("no scanlines to sample"));
        }
        let mut real = Histogram::with_bins(params.min_distance, params.max_distance, params.classes);
        let mut dream = real.clone();
        let tmp = real.clone();
        let distances = full_sample(scanlines, fractures, &tol);
        real.rebin(&distances);
        dream.fill_dream(params.target)?;
        let objective = chi_square(&real, &dream);
        Ok(Self {
            fractures,
            scanlines,
            domain,
            params,
            tol,
            src,
            real,
            dream,
            tmp,
            objective,
            temperature: params.start_temperature,
            trace: vec![objective],
        })
    }

    /// Annealing phase: `temp_steps` temperature levels of
    /// `steps_per_temp` moves each. Resets the temperature first.
    pub fn anneal(&mut self) -> PhaseStats {
        self.temperature = self.params.start_temperature;
        let mut stats = PhaseStats::default();
        for _ in 0..self.params.temp_steps {
            for _ in 0..self.params.steps_per_temp {
                self.step_annealing(&mut stats);
            }
            self.temperature *= self.params.cooling;
        }
        stats
    }

    /// MCMC phase: `mcmc_iterations` moves under the two-sided Metropolis
    /// rule on the raw objective.
    pub fn mcmc(&mut self) -> PhaseStats {
        let mut stats = PhaseStats::default();
        for _ in 0..self.params.mcmc_iterations {
            self.step_mcmc(&mut stats);
        }
        stats
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn real_histogram(&self) -> &Histogram {
        &self.real
    }

    pub fn dream_histogram(&self) -> &Histogram {
        &self.dream
    }

    /// Objective value after every move, starting with the baseline.
    pub fn trace(&self) -> &[f64] {
        &self.trace
    }

    /// Improving moves are taken outright; otherwise one coin decides with
    /// probability `exp((obj_old - obj_new) / T)`.
    fn step_annealing(&mut self, stats: &mut PhaseStats) {
        let (snapshot, obj_new) = self.propose();
        let accept = if obj_new < self.objective {
            true
        } else {
            let p = ((self.objective - obj_new) / self.temperature).exp();
            self.src.next_uniform() < p
        };
        self.resolve(snapshot, obj_new, accept, stats);
    }

    /// Always draws the coin: accept with probability
    /// `e^{-obj_new} / (e^{-obj_old} + e^{-obj_new})`.
    fn step_mcmc(&mut self, stats: &mut PhaseStats) {
        let (snapshot, obj_new) = self.propose();
        let w_new = (-obj_new).exp();
        let w_old = (-self.objective).exp();
        let p = w_new / (w_old + w_new);
        let accept = self.src.next_uniform() < p;
        self.resolve(snapshot, obj_new, accept, stats);
    }

    /// Draw a fracture and a new center, apply the move, resample
    /// incrementally, and score the candidate.
    fn propose(&mut self) -> (MoveSnapshot, f64) {
        let n = self.fractures.len();
        let mut k = (self.src.next_uniform() * n as f64) as usize;
        if k >= n {
            k = n - 1;
        }
        let snapshot = MoveSnapshot {
            index: k,
            corners: self.fractures[k].corners,
            hits: self.scanlines.iter().map(|line| line.hits.clone()).collect(),
        };
        let center = self.domain.sample_point(self.src);
        self.fractures[k].translate_to_center(center);
        let id = self.fractures[k].id;
        let distances = incremental_sample(self.scanlines, self.fractures, id, &self.tol);
        self.tmp.rebin(&distances);
        let obj_new = chi_square(&self.tmp, &self.dream);
        (snapshot, obj_new)
    }

    /// Commit or roll back a proposed move and extend the trace.
    fn resolve(&mut self, snapshot: MoveSnapshot, obj_new: f64, accept: bool, stats: &mut PhaseStats) {
        stats.iterations += 1;
        if accept {
            mem::swap(&mut self.real, &mut self.tmp);
            self.objective = obj_new;
            stats.accepted += 1;
        } else {
            self.fractures[snapshot.index].corners = snapshot.corners;
            for (line, hits) in self.scanlines.iter_mut().zip(snapshot.hits) {
                line.hits = hits;
            }
            stats.rejected += 1;
        }
        self.trace.push(self.objective);
    }
}
