use crate::cli::Args;
use crate::detector::DetectorKind;
use crate::error::AnalysisError;
use crate::frame_source::BackendMode;
use crate::observation::Point;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Court constants in frame coordinates used by shot classification
#[derive(Debug, Clone, PartialEq)]
pub struct CourtGeometry {
    /// Reference point standing in for the rim
    pub hoop: Point,
    /// Trajectories ending closer than this to the hoop count as makes
    pub make_radius: f64,
    /// Shots whose apex rises less than this above the release point are layups
    pub layup_max_rise: f64,
    /// Releases left of this x are wing shots
    pub left_wing_x: f64,
    /// Releases right of this x are wing shots
    pub right_wing_x: f64,
    /// Open x range of the top of the key
    pub top_of_key_x: (f64, f64),
    /// Top-of-key releases sit below this y (frame y grows downwards)
    pub top_of_key_min_y: f64,
    /// Open x range of the free throw line
    pub free_throw_x: (f64, f64),
    pub free_throw_min_y: f64,
    /// Releases above this y are in the paint
    pub paint_max_y: f64,
}

impl Default for CourtGeometry {
    fn default() -> Self {
        Self {
            hoop: Point::new(400.0, 170.0),
            make_radius: 50.0,
            layup_max_rise: 50.0,
            left_wing_x: 200.0,
            right_wing_x: 600.0,
            top_of_key_x: (300.0, 500.0),
            top_of_key_min_y: 400.0,
            free_throw_x: (350.0, 450.0),
            free_throw_min_y: 300.0,
            paint_max_y: 250.0,
        }
    }
}

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub sample_rate_hz: f64,
    pub backend_mode: BackendMode,
    pub detector: DetectorKind,
    pub court: CourtGeometry,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1.0,
            backend_mode: BackendMode::Accelerated,
            detector: DetectorKind::Arc,
            court: CourtGeometry::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_sample_rate(mut self, sample_rate_hz: f64) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    pub fn with_backend_mode(mut self, backend_mode: BackendMode) -> Self {
        self.backend_mode = backend_mode;
        self
    }

    pub fn with_detector(mut self, detector: DetectorKind) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_court(mut self, court: CourtGeometry) -> Self {
        self.court = court;
        self
    }

    /// Checks the settings an analysis run cannot recover from
    pub fn validate(&self) -> std::result::Result<(), AnalysisError> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "sample rate must be a positive number of samples per second, got {}",
                self.sample_rate_hz
            )));
        }
        if !self.court.make_radius.is_finite() || self.court.make_radius <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "make radius must be positive, got {}",
                self.court.make_radius
            )));
        }
        if self.court.left_wing_x >= self.court.right_wing_x {
            return Err(AnalysisError::InvalidConfig(format!(
                "left wing boundary ({}) must be left of the right wing boundary ({})",
                self.court.left_wing_x, self.court.right_wing_x
            )));
        }
        for (name, (low, high)) in [
            ("top of key", self.court.top_of_key_x),
            ("free throw line", self.court.free_throw_x),
        ] {
            if low >= high {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{} x range is empty: ({}, {})",
                    name, low, high
                )));
            }
        }
        Ok(())
    }

    /// Number of frames requested for a video of the given duration
    pub fn total_samples(&self, duration_secs: f64) -> u64 {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return 0;
        }
        (duration_secs * self.sample_rate_hz).floor() as u64
    }
}

/// Independent seeds for the simulated frame source and the session's
/// confidence and quote draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSeeds {
    pub source: u64,
    pub session: u64,
}

impl RunSeeds {
    /// Splits one run seed into two streams
    pub fn derive(seed: u64) -> Self {
        let mut master = StdRng::seed_from_u64(seed);
        Self {
            source: master.next_u64(),
            session: master.next_u64(),
        }
    }
}

/// Builds an analyzer configuration from command line arguments
pub fn build_config(args: &Args) -> Result<AnalyzerConfig> {
    let config = AnalyzerConfig::default()
        .with_sample_rate(args.sample_rate)
        .with_backend_mode(args.device.parse()?)
        .with_detector(args.detector.parse()?);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            observations: None,
            duration: 10.0,
            seed: Some(1),
            sample_rate: 1.0,
            device: "gpu".to_string(),
            detector: "arc".to_string(),
            recent: 5,
            output_filepath: String::new(),
            headless: true,
            simulate_gpu_failure: false,
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&args()).unwrap();
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn test_build_config_parses_device_and_detector() {
        let mut args = args();
        args.device = "cpu".to_string();
        args.detector = "curve-fit".to_string();
        let config = build_config(&args).unwrap();
        assert_eq!(config.backend_mode, BackendMode::Cpu);
        assert_eq!(config.detector, DetectorKind::CurveFit);
    }

    #[test]
    fn test_build_config_rejects_bad_values() {
        let mut bad_rate = args();
        bad_rate.sample_rate = 0.0;
        assert!(build_config(&bad_rate).is_err());

        let mut bad_device = args();
        bad_device.device = "tpu".to_string();
        assert!(build_config(&bad_device).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_zone_range() {
        let mut court = CourtGeometry::default();
        court.free_throw_x = (450.0, 350.0);
        let err = AnalyzerConfig::default().with_court(court).validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_run_seeds_are_reproducible_and_distinct() {
        let seeds = RunSeeds::derive(42);
        assert_eq!(seeds, RunSeeds::derive(42));
        assert_ne!(seeds.source, seeds.session);
        assert_ne!(seeds, RunSeeds::derive(43));
    }

    #[test]
    fn test_total_samples() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.total_samples(10.9), 10);
        assert_eq!(config.total_samples(0.0), 0);
        assert_eq!(config.total_samples(-3.0), 0);
        assert_eq!(config.total_samples(f64::NAN), 0);
        assert_eq!(config.clone().with_sample_rate(2.0).total_samples(10.9), 21);
    }
}
