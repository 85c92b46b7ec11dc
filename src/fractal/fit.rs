//! Log-log fit of box counts
//!
//! FD is the slope of ln(N) against ln(1/s), fit by ordinary least squares.

use super::box_count::ScaleSample;

/// Added to counts before taking the logarithm
pub const COUNT_EPSILON: f64 = 1e-8;

/// Added to the total sum of squares in R²
pub const R2_EPSILON: f64 = 1e-12;

/// Ordinary least-squares line `y = slope * x + intercept`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// 1 - SS_res / (SS_tot + R2_EPSILON)
    pub r2: f64,
}

/// Fractal dimension estimate of one region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitResult {
    /// Box-counting dimension, `None` when undefined
    pub fd: Option<f64>,
    /// Coefficient of determination of the log-log fit, `None` when undefined
    pub r2: Option<f64>,
    /// Number of samples the fit was given
    pub n_scales_used: usize,
}

/// Simple linear regression of `y` on `x`
///
/// Returns `None` with fewer than two points, mismatched lengths, or when
/// all `x` are identical (the slope is undefined).
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LineFit> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    if x.iter().all(|&v| v == x[0]) {
        return None;
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }
    if sxx <= 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let residual = yi - (slope * xi + intercept);
        ss_res += residual * residual;
        let dy = yi - mean_y;
        ss_tot += dy * dy;
    }
    let r2 = 1.0 - ss_res / (ss_tot + R2_EPSILON);

    Some(LineFit { slope, intercept, r2 })
}

/// Estimate the box-counting dimension from (scale, count) samples
///
/// Regresses `ln(count + 1e-8)` on `ln(1 / scale)`. Fewer than two samples,
/// or samples that all share one scale, give an undefined fit; this is not
/// an error.
pub fn fit_fractal_dimension(samples: &[ScaleSample]) -> FitResult {
    let n_scales_used = samples.len();
    let undefined = FitResult { fd: None, r2: None, n_scales_used };

    if n_scales_used < 2 {
        return undefined;
    }

    let x: Vec<f64> = samples.iter().map(|s| (1.0 / s.scale as f64).ln()).collect();
    let y: Vec<f64> = samples.iter().map(|s| (s.count as f64 + COUNT_EPSILON).ln()).collect();

    match linear_fit(&x, &y) {
        Some(line) => FitResult {
            fd: Some(line.slope),
            r2: Some(line.r2),
            n_scales_used,
        },
        None => undefined,
    }
}
