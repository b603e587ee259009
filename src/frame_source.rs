use crate::observation::{FrameObservation, Point, PoseObservation};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Recorded frames further than this from a requested timestamp count as a failed seek
pub const SEEK_TOLERANCE_SECS: f64 = 0.5;

/// How the detection backend is brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendMode {
    /// Hardware-accelerated inference
    #[default]
    Accelerated,
    /// Degraded CPU-only inference
    Cpu,
}

impl FromStr for BackendMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gpu" | "cuda" | "webgpu" | "accelerated" => Ok(BackendMode::Accelerated),
            "cpu" => Ok(BackendMode::Cpu),
            other => bail!("unknown device '{}', expected 'gpu' or 'cpu'", other),
        }
    }
}

/// Supplies one observation per requested video timestamp.
///
/// Implementations wrap whatever produces ball, hoop and pose estimates; the
/// analysis pipeline never decodes video itself.
#[async_trait]
pub trait FrameSource: Send {
    /// Brings the detection backend up in the given mode
    async fn initialize(&mut self, mode: BackendMode) -> Result<()>;

    /// Length of the underlying video in seconds
    fn duration_secs(&self) -> f64;

    /// Seeks to `timestamp` and returns what the backend saw there
    async fn observe(&mut self, timestamp: f64) -> Result<FrameObservation>;
}

/// Randomized stand-in for real detection models
pub struct SimulatedFrameSource {
    duration: f64,
    rng: StdRng,
    accelerator_available: bool,
    mode: Option<BackendMode>,
}

impl SimulatedFrameSource {
    pub fn new(duration: f64, seed: u64) -> Self {
        Self {
            duration,
            rng: StdRng::seed_from_u64(seed),
            accelerator_available: true,
            mode: None,
        }
    }

    /// Makes accelerated initialization fail so the CPU fallback is exercised
    pub fn with_accelerator(mut self, available: bool) -> Self {
        self.accelerator_available = available;
        self
    }

    pub fn mode(&self) -> Option<BackendMode> {
        self.mode
    }

    fn simulate_frame(&mut self) -> FrameObservation {
        let rng = &mut self.rng;
        let ball = rng
            .gen_bool(0.7)
            .then(|| Point::new(rng.gen_range(100.0..900.0), rng.gen_range(200.0..600.0)));
        let hoop = rng
            .gen_bool(0.3)
            .then(|| Point::new(rng.gen_range(400.0..500.0), rng.gen_range(150.0..200.0)));
        let pose = PoseObservation {
            elbow_angle_deg: rng.gen_range(85.0..105.0),
            knee_angle_deg: rng.gen_range(140.0..170.0),
            balance: rng.gen_range(0.7..1.0),
            follow_through: rng.gen_range(0.6..1.0),
        };
        FrameObservation { ball, hoop, pose }
    }
}

#[async_trait]
impl FrameSource for SimulatedFrameSource {
    async fn initialize(&mut self, mode: BackendMode) -> Result<()> {
        if mode == BackendMode::Accelerated && !self.accelerator_available {
            bail!("no accelerator available for the simulated detector");
        }
        debug!("Simulated detector initialized ({:?})", mode);
        self.mode = Some(mode);
        Ok(())
    }

    fn duration_secs(&self) -> f64 {
        self.duration
    }

    async fn observe(&mut self, timestamp: f64) -> Result<FrameObservation> {
        if self.mode.is_none() {
            bail!("detector used before initialization");
        }
        if timestamp < 0.0 || timestamp > self.duration {
            bail!("timestamp {:.2}s is outside the video ({:.2}s)", timestamp, self.duration);
        }
        // seeking yields to the runtime like a real decoder would
        tokio::task::yield_now().await;
        Ok(self.simulate_frame())
    }
}

/// One frame of a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp: f64,
    #[serde(flatten)]
    pub observation: FrameObservation,
}

/// Observations captured from an earlier detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Video length; defaults to one second past the last frame
    #[serde(default)]
    pub duration: Option<f64>,
    pub frames: Vec<RecordedFrame>,
}

/// Replays recorded observations, answering each seek with the nearest recorded frame.
///
/// A seek that lands on the frame served by the previous seek (sampling faster
/// than the recording) reports no ball or hoop, so a recorded position never
/// enters a trajectory twice.
pub struct RecordedFrameSource {
    recording: Recording,
    last_served: Option<usize>,
}

impl RecordedFrameSource {
    pub fn new(recording: Recording) -> Self {
        Self {
            recording,
            last_served: None,
        }
    }

    /// Loads a JSON recording from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read observations: {}", path.display()))?;
        let recording: Recording = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse observations: {}", path.display()))?;
        Ok(Self::new(recording))
    }

    fn nearest_frame(&self, timestamp: f64) -> Option<(usize, &RecordedFrame)> {
        self.recording
            .frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| (frame.timestamp - timestamp).abs() <= SEEK_TOLERANCE_SECS)
            .min_by(|(_, a), (_, b)| {
                let da = (a.timestamp - timestamp).abs();
                let db = (b.timestamp - timestamp).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

#[async_trait]
impl FrameSource for RecordedFrameSource {
    async fn initialize(&mut self, mode: BackendMode) -> Result<()> {
        debug!(
            "Replaying {} recorded frames ({:?} requested, no model needed)",
            self.recording.frames.len(),
            mode
        );
        Ok(())
    }

    fn duration_secs(&self) -> f64 {
        self.recording.duration.unwrap_or_else(|| {
            self.recording
                .frames
                .iter()
                .map(|frame| frame.timestamp)
                .fold(None, |latest: Option<f64>, t| Some(latest.map_or(t, |l| l.max(t))))
                .map_or(0.0, |last| last + 1.0)
        })
    }

    async fn observe(&mut self, timestamp: f64) -> Result<FrameObservation> {
        let Some((index, frame)) = self.nearest_frame(timestamp) else {
            bail!("no recorded frame within {}s of {:.2}s", SEEK_TOLERANCE_SECS, timestamp);
        };
        let observation = if self.last_served == Some(index) {
            debug!("Frame at {:.2}s already served, reporting no detections", frame.timestamp);
            FrameObservation {
                ball: None,
                hoop: None,
                pose: frame.observation.pose,
            }
        } else {
            frame.observation.clone()
        };
        self.last_served = Some(index);
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording() -> Recording {
        let json = r#"{
            "frames": [
                { "timestamp": 0.0, "ball": { "x": 400.0, "y": 450.0 } },
                { "timestamp": 1.0, "ball": null, "pose": { "elbow_angle_deg": 110.0, "knee_angle_deg": 150.0, "balance": 0.8, "follow_through": 0.9 } },
                { "timestamp": 2.1, "ball": { "x": 400.0, "y": 250.0 }, "hoop": { "x": 410.0, "y": 170.0 } }
            ]
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_backend_mode_parsing() {
        assert_eq!("GPU".parse::<BackendMode>().unwrap(), BackendMode::Accelerated);
        assert_eq!("cpu".parse::<BackendMode>().unwrap(), BackendMode::Cpu);
        assert!("tpu".parse::<BackendMode>().is_err());
    }

    #[tokio::test]
    async fn test_recorded_source_returns_nearest_frame() {
        let mut source = RecordedFrameSource::new(recording());
        source.initialize(BackendMode::Accelerated).await.unwrap();

        let first = source.observe(0.0).await.unwrap();
        assert_eq!(first.ball, Some(Point::new(400.0, 450.0)));

        let second = source.observe(1.0).await.unwrap();
        assert!(!second.ball_detected());
        assert_eq!(second.pose.elbow_angle_deg, 110.0);

        let third = source.observe(2.0).await.unwrap();
        assert!(third.hoop_detected());
    }

    #[tokio::test]
    async fn test_recorded_source_does_not_repeat_a_frame() {
        let mut source = RecordedFrameSource::new(recording());
        assert!(source.observe(0.0).await.unwrap().ball_detected());

        // 0.5s is as close to frame 0.0 as to frame 1.0; the tie goes to the earlier frame
        let repeated = source.observe(0.5).await.unwrap();
        assert!(!repeated.ball_detected());
        assert!(!repeated.hoop_detected());

        assert_eq!(source.observe(1.0).await.unwrap().pose.elbow_angle_deg, 110.0);
        let third = source.observe(2.0).await.unwrap();
        assert!(third.ball_detected());
        assert!(!source.observe(2.4).await.unwrap().ball_detected());
    }

    #[tokio::test]
    async fn test_recorded_source_seek_failure() {
        let mut source = RecordedFrameSource::new(recording());
        assert!(source.observe(5.0).await.is_err());
    }

    #[test]
    fn test_recorded_duration_defaults_past_last_frame() {
        let source = RecordedFrameSource::new(recording());
        assert!((source.duration_secs() - 3.1).abs() < 1e-9);

        let mut with_duration = recording();
        with_duration.duration = Some(12.0);
        assert_eq!(RecordedFrameSource::new(with_duration).duration_secs(), 12.0);

        let empty = Recording { duration: None, frames: Vec::new() };
        assert_eq!(RecordedFrameSource::new(empty).duration_secs(), 0.0);
    }

    #[tokio::test]
    async fn test_simulated_source_requires_initialization() {
        let mut source = SimulatedFrameSource::new(10.0, 1);
        assert!(source.observe(0.0).await.is_err());
        source.initialize(BackendMode::Cpu).await.unwrap();
        assert!(source.observe(0.0).await.is_ok());
        assert!(source.observe(11.0).await.is_err());
    }

    #[tokio::test]
    async fn test_simulated_source_without_accelerator() {
        let mut source = SimulatedFrameSource::new(10.0, 1).with_accelerator(false);
        assert!(source.initialize(BackendMode::Accelerated).await.is_err());
        assert!(source.initialize(BackendMode::Cpu).await.is_ok());
        assert_eq!(source.mode(), Some(BackendMode::Cpu));
    }

    #[tokio::test]
    async fn test_simulated_observations_stay_in_range() {
        let mut source = SimulatedFrameSource::new(100.0, 9);
        source.initialize(BackendMode::Accelerated).await.unwrap();
        for t in 0..100 {
            let frame = source.observe(t as f64).await.unwrap();
            if let Some(ball) = frame.ball {
                assert!((100.0..900.0).contains(&ball.x));
                assert!((200.0..600.0).contains(&ball.y));
            }
            assert!((0.7..1.0).contains(&frame.pose.balance));
            assert!((85.0..105.0).contains(&frame.pose.elbow_angle_deg));
        }
    }
}
