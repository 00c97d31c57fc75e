//! Fixed-width distance histograms and the chi-square objective.

use super::{CalibrateError, TargetDistribution};

/// One bin of the distance distribution.
#[derive(Clone, Copy, Debug)]
pub struct HistogramClass {
    pub lower: f64,
    pub upper: f64,
    pub abs_frequency: u64,
    pub perc_frequency: f64,
}

/// Contiguous equal-width bins over `[min, max]`.
///
/// The same type serves three roles in calibration: the accepted (real)
/// distribution, the target (dream) distribution where only the percentage
/// column is meaningful, and the per-move scratch copy.
#[derive(Clone, Debug)]
pub struct Histogram {
    classes: Vec<HistogramClass>,
    min: f64,
    max: f64,
    width: f64,
    total: u64,
}

impl Histogram {
    /// Lay out `classes` empty bins over `[min, max]`.
    pub fn with_bins(min: f64, max: f64, classes: usize) -> Self {
        debug_assert!(classes > 0 && max > min);
        let width = (max - min) / classes as f64;
        let classes = (0..classes)
            .map(|k| HistogramClass {
                lower: min + k as f64 * width,
                upper: min + (k + 1) as f64 * width,
                abs_frequency: 0,
                perc_frequency: 0.0,
            })
            .collect();
        Self {
            classes,
            min,
            max,
            width,
            total: 0,
        }
    }

    pub fn classes(&self) -> &[HistogramClass] {
        &self.classes
    }

    /// In-range sample count after the last [`Histogram::rebin`].
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Zero all bins, count the in-range samples, and refresh the
    /// percentage column. Bins are `[lower, upper)` except the last, which
    /// also takes `x == max`; out-of-range samples are ignored.
    pub fn rebin(&mut self, samples: &[f64]) {
        for class in &mut self.classes {
            class.abs_frequency = 0;
        }
        self.total = 0;
        for &x in samples {
            if !(x >= self.min && x <= self.max) {
                continue;
            }
            let mut k = ((x - self.min) / self.width) as usize;
            if k >= self.classes.len() {
                k = self.classes.len() - 1;
            }
            self.classes[k].abs_frequency += 1;
            self.total += 1;
        }
        let n = self.total as f64;
        for class in &mut self.classes {
            class.perc_frequency = if self.total == 0 {
                0.0
            } else {
                class.abs_frequency as f64 / n
            };
        }
    }

    /// Populate the percentage column from the target CDF, normalized over
    /// the histogram support.
    ///
    /// Only the negative-exponential target has a closed form here; any
    /// other configured kind is rejected. A bin that receives no mass is
    /// rejected too, since the chi-square divisor needs every expected
    /// count positive.
    pub fn fill_dream(&mut self, target: TargetDistribution) -> Result<(), CalibrateError> {
        let lambda = match target {
            TargetDistribution::NegativeExponential { lambda } => lambda,
            other => return Err(CalibrateError::UnsupportedDistribution(other)),
        };
        let cdf = |x: f64| 1.0 - (-lambda * x).exp();
        let span = cdf(self.max) - cdf(self.min);
        if !(span > 0.0) {
            return Err(CalibrateError::InvalidParams(
                "target distribution has no mass over the histogram range".into(),
            ));
        }
        for class in &mut self.classes {
            let mass = (cdf(class.upper) - cdf(class.lower)) / span;
            if !(mass > 0.0) {
                return Err(CalibrateError::InvalidParams(format!(
                    "target mass underflows in bin [{:.6}, {:.6}]",
                    class.lower, class.upper
                )));
            }
            class.perc_frequency = mass;
        }
        Ok(())
    }
}

/// Chi-square distance between the real and dream percentage columns,
/// scaled by the real sample count:
/// `sum_k (real%_k n - dream%_k n)^2 / (dream%_k n)`.
///
/// Zero iff the percentage columns match bin for bin. Bins with no
/// expected mass contribute nothing; `fill_dream` guarantees there are
/// none in a valid run.
pub fn chi_square(real: &Histogram, dream: &Histogram) -> f64 {
    debug_assert_eq!(real.classes.len(), dream.classes.len());
    let n = real.total as f64;
    let mut sum = 0.0;
    for (r, d) in real.classes.iter().zip(&dream.classes) {
        let expected = d.perc_frequency * n;
        if expected <= 0.0 {
            continue;
        }
        let diff = r.perc_frequency * n - expected;
        sum += diff * diff / expected;
    }
    sum
}
