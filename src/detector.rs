use crate::trajectory::TrajectoryBuffer;
use anyhow::{Result, bail};
use ndarray::{Array1, Array2};
use std::str::FromStr;

/// Decides whether the trailing samples of a trajectory form a completed shot arc.
///
/// Detectors only inspect the buffer; the caller clears it after acting on a
/// positive detection.
pub trait ShotDetector {
    /// Number of trailing samples the detector needs before it can fire
    fn window(&self) -> usize;

    /// Returns true when the most recent samples complete an ascend-then-descend arc
    fn detect(&self, buffer: &TrajectoryBuffer) -> bool;
}

/// Three-point inflection rule: the middle sample is higher (smaller y) than
/// both of its neighbours.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcDetector;

impl ShotDetector for ArcDetector {
    fn window(&self) -> usize {
        3
    }

    fn detect(&self, buffer: &TrajectoryBuffer) -> bool {
        let recent = buffer.last(self.window());
        if recent.len() < 3 {
            return false;
        }
        let ascending = recent[1].y < recent[0].y;
        let descending = recent[2].y > recent[1].y;
        ascending && descending
    }
}

/// Least-squares parabola fit over a longer trailing window.
///
/// Fires only when the fitted curve opens toward the floor, its apex falls
/// strictly inside the window, the window spans at least `min_amplitude`
/// vertically and the newest sample is still falling.
#[derive(Debug, Clone, Copy)]
pub struct CurveFitDetector {
    pub window: usize,
    pub min_amplitude: f64,
}

impl Default for CurveFitDetector {
    fn default() -> Self {
        Self {
            window: 5,
            min_amplitude: 30.0,
        }
    }
}

impl CurveFitDetector {
    pub fn new(window: usize, min_amplitude: f64) -> Self {
        // a parabola needs at least three points
        Self {
            window: window.max(3),
            min_amplitude,
        }
    }
}

impl ShotDetector for CurveFitDetector {
    fn window(&self) -> usize {
        self.window
    }

    fn detect(&self, buffer: &TrajectoryBuffer) -> bool {
        let recent = buffer.last(self.window);
        if recent.len() < 3 {
            return false;
        }
        let n = recent.len();
        let ys = Array1::from_iter(recent.iter().map(|s| s.y));

        let Some([a, b, _c]) = fit_parabola(&ys) else {
            return false;
        };
        if a <= 0.0 {
            return false;
        }

        let apex = -b / (2.0 * a);
        if apex <= 0.0 || apex >= (n - 1) as f64 {
            return false;
        }

        let highest = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let lowest = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let falling = ys[n - 1] > ys[n - 2];

        falling && lowest - highest >= self.min_amplitude
    }
}

/// Fits `y = a*u^2 + b*u + c` over sample indices `u = 0..n` and returns `[a, b, c]`.
/// `None` when the normal equations are singular.
fn fit_parabola(ys: &Array1<f64>) -> Option<[f64; 3]> {
    let design = Array2::from_shape_fn((ys.len(), 3), |(i, j)| {
        let u = i as f64;
        match j {
            0 => u * u,
            1 => u,
            _ => 1.0,
        }
    });
    let normal = design.t().dot(&design);
    let rhs = design.t().dot(ys);

    let det = det3(&normal);
    if det.abs() < 1e-9 {
        return None;
    }

    // Cramer's rule over the 3x3 normal equations
    let mut coefficients = [0.0; 3];
    for (col, coefficient) in coefficients.iter_mut().enumerate() {
        let mut replaced = normal.clone();
        replaced.column_mut(col).assign(&rhs);
        *coefficient = det3(&replaced) / det;
    }
    Some(coefficients)
}

fn det3(m: &Array2<f64>) -> f64 {
    m[[0, 0]] * (m[[1, 1]] * m[[2, 2]] - m[[1, 2]] * m[[2, 1]])
        - m[[0, 1]] * (m[[1, 0]] * m[[2, 2]] - m[[1, 2]] * m[[2, 0]])
        + m[[0, 2]] * (m[[1, 0]] * m[[2, 1]] - m[[1, 1]] * m[[2, 0]])
}

/// Which detection strategy a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorKind {
    #[default]
    Arc,
    CurveFit,
}

impl DetectorKind {
    /// Builds a boxed detector with default tuning
    pub fn build(&self) -> Box<dyn ShotDetector + Send> {
        match self {
            DetectorKind::Arc => Box::new(ArcDetector),
            DetectorKind::CurveFit => Box::new(CurveFitDetector::default()),
        }
    }
}

impl FromStr for DetectorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "arc" => Ok(DetectorKind::Arc),
            "curve-fit" | "curve_fit" | "curvefit" => Ok(DetectorKind::CurveFit),
            other => bail!("unknown detector '{}', expected 'arc' or 'curve-fit'", other),
        }
    }
}
