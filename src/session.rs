use crate::classifier::ShotClassifier;
use crate::config::AnalyzerConfig;
use crate::detector::ShotDetector;
use crate::error::AnalysisError;
use crate::feedback::FeedbackGenerator;
use crate::frame_source::{BackendMode, FrameSource};
use crate::observation::{FrameObservation, PoseObservation, PositionSample};
use crate::progress::ProgressSink;
use crate::shot::ShotRecord;
use crate::stats::GameStats;
use crate::trajectory::TrajectoryBuffer;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// Shots and stats produced by one completed analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub shots: Vec<ShotRecord>,
    pub stats: GameStats,
}

impl AnalysisOutcome {
    /// The last `n` shots, oldest first
    pub fn recent_shots(&self, n: usize) -> &[ShotRecord] {
        let start = self.shots.len().saturating_sub(n);
        &self.shots[start..]
    }
}

/// Per-run analysis state: trajectory buffer, shot list and stats.
///
/// Frames must be fed in timestamp order; trajectory continuity depends on it.
pub struct AnalysisSession<R: Rng> {
    detector: Box<dyn ShotDetector + Send>,
    classifier: ShotClassifier,
    feedback: FeedbackGenerator,
    buffer: TrajectoryBuffer,
    shot_start_pose: Option<PoseObservation>,
    shots: Vec<ShotRecord>,
    stats: GameStats,
    rng: R,
}

impl<R: Rng> AnalysisSession<R> {
    pub fn new(config: &AnalyzerConfig, rng: R) -> Self {
        Self::with_detector(config, config.detector.build(), rng)
    }

    pub fn with_detector(
        config: &AnalyzerConfig,
        detector: Box<dyn ShotDetector + Send>,
        rng: R,
    ) -> Self {
        Self {
            detector,
            classifier: ShotClassifier::new(config.court.clone()),
            feedback: FeedbackGenerator::new(),
            buffer: TrajectoryBuffer::new(),
            shot_start_pose: None,
            shots: Vec::new(),
            stats: GameStats::new(),
            rng,
        }
    }

    /// Feeds one frame into the session and returns the shot it completed, if any
    pub fn process_frame(
        &mut self,
        frame_number: u64,
        timestamp: f64,
        frame: &FrameObservation,
    ) -> Option<&ShotRecord> {
        let ball = frame.ball?;

        if self.buffer.is_empty() {
            self.shot_start_pose = Some(frame.pose);
        }
        self.buffer.append(PositionSample::new(ball.x, ball.y, timestamp));

        if !self.detector.detect(&self.buffer) {
            return None;
        }

        let record = self.classify_trajectory(frame_number, frame);
        self.buffer.clear();
        self.shot_start_pose = None;

        let record = record?;
        self.stats.add_shot(&record);
        self.shots.push(record);
        self.shots.last()
    }

    fn classify_trajectory(
        &mut self,
        frame_number: u64,
        frame: &FrameObservation,
    ) -> Option<ShotRecord> {
        let trajectory = self.buffer.samples();
        let Some(classification) = self.classifier.classify(trajectory, &mut self.rng) else {
            debug!(
                "Frame {}: arc detected on {} samples, too short to classify",
                frame_number,
                trajectory.len()
            );
            return None;
        };
        let start = trajectory.first()?;
        let pose = self.shot_start_pose.unwrap_or(frame.pose);
        let feedback = self.feedback.generate(classification.result, &pose, &mut self.rng);

        info!(
            "Shot at {:.1}s (frame {}): {} from {} - {}",
            start.timestamp,
            frame_number,
            classification.shot_type,
            classification.zone,
            classification.result
        );

        Some(ShotRecord {
            frame_number,
            timestamp: start.timestamp,
            shot_type: classification.shot_type,
            result: classification.result,
            location: classification.zone.label().to_string(),
            confidence: classification.confidence,
            pose,
            feedback_text: feedback.text,
            technical_notes: feedback.technical_notes,
        })
    }

    pub fn shots(&self) -> &[ShotRecord] {
        &self.shots
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Samples of the trajectory currently in flight
    pub fn pending_samples(&self) -> usize {
        self.buffer.len()
    }

    /// Drops the in-flight trajectory without emitting a shot
    pub fn discard_partial(&mut self) {
        self.buffer.clear();
        self.shot_start_pose = None;
    }

    /// Ends the session; a trajectory still in flight is discarded
    pub fn finish(mut self) -> AnalysisOutcome {
        self.discard_partial();
        AnalysisOutcome {
            shots: self.shots,
            stats: self.stats,
        }
    }
}

/// Lets the host abort an in-flight analysis
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Brings the backend up, retrying once on the CPU if accelerated start fails
async fn initialize_backend<S: FrameSource + ?Sized>(
    source: &mut S,
    mode: BackendMode,
) -> Result<BackendMode, AnalysisError> {
    match source.initialize(mode).await {
        Ok(()) => Ok(mode),
        Err(err) if mode == BackendMode::Accelerated => {
            warn!("Accelerated backend failed to initialize ({:#}), retrying on CPU", err);
            source
                .initialize(BackendMode::Cpu)
                .await
                .map(|()| BackendMode::Cpu)
                .map_err(|err| AnalysisError::ModelUnavailable {
                    reason: format!("{:#}", err),
                })
        }
        Err(err) => Err(AnalysisError::ModelUnavailable {
            reason: format!("{:#}", err),
        }),
    }
}

/// Runs one analysis over a frame source.
///
/// Frames are requested strictly in order at `config.sample_rate_hz`; progress
/// is reported after each one. Any failure or cancellation discards the run.
/// The sink sees exactly one `on_finish` (success, even with nothing to
/// analyze) or `on_abandon` (any error).
pub async fn analyze<S, P, R>(
    source: &mut S,
    progress: &mut P,
    config: &AnalyzerConfig,
    rng: R,
    cancel: &CancelToken,
) -> Result<AnalysisOutcome, AnalysisError>
where
    S: FrameSource + ?Sized,
    P: ProgressSink + ?Sized,
    R: Rng,
{
    match run_analysis(source, progress, config, rng, cancel).await {
        Ok(outcome) => {
            progress.on_finish();
            Ok(outcome)
        }
        Err(err) => {
            progress.on_abandon();
            Err(err)
        }
    }
}

async fn run_analysis<S, P, R>(
    source: &mut S,
    progress: &mut P,
    config: &AnalyzerConfig,
    rng: R,
    cancel: &CancelToken,
) -> Result<AnalysisOutcome, AnalysisError>
where
    S: FrameSource + ?Sized,
    P: ProgressSink + ?Sized,
    R: Rng,
{
    config.validate()?;
    let mode = initialize_backend(source, config.backend_mode).await?;
    debug!("Backend ready in {:?} mode", mode);

    let total_samples = config.total_samples(source.duration_secs());
    let mut session = AnalysisSession::new(config, rng);
    if total_samples == 0 {
        info!("Nothing to analyze: video has no full sample");
        return Ok(session.finish());
    }

    for frame_number in 0..total_samples {
        let timestamp = frame_number as f64 / config.sample_rate_hz;

        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        let observed = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
            observed = source.observe(timestamp) => observed,
        };
        let frame = observed.map_err(|err| AnalysisError::FrameUnavailable {
            timestamp,
            reason: format!("{:#}", err),
        })?;

        debug!(
            "Frame {} at {:.2}s: ball {:?}, hoop detected: {}",
            frame_number,
            timestamp,
            frame.ball,
            frame.hoop_detected()
        );
        session.process_frame(frame_number, timestamp, &frame);

        progress.on_progress((frame_number + 1) as f64 / total_samples as f64 * 100.0);
    }

    if session.pending_samples() > 0 {
        debug!("Discarding {} samples of an unfinished trajectory", session.pending_samples());
    }
    Ok(session.finish())
}
