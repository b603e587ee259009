use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Receives analysis progress as a percentage after every processed frame
pub trait ProgressSink {
    /// `percent` is in [0, 100] and never decreases within a run
    fn on_progress(&mut self, percent: f64);

    /// Called once when a run completes, including runs with nothing to analyze
    fn on_finish(&mut self) {}

    /// Called once when a run fails or is cancelled after the backend came up
    fn on_abandon(&mut self) {}
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn on_progress(&mut self, percent: f64) {
        self(percent)
    }
}

/// Terminal progress bar for an analysis run
pub struct AnalysisProgressTracker {
    progress_bar: ProgressBar,
    start_time: Instant,
    total_samples: u64,
    sample_rate: f64,
    processed_samples: u64,
}

impl AnalysisProgressTracker {
    /// Creates a new progress tracker for a known number of samples
    pub fn new(total_samples: u64, sample_rate: f64, operation_name: &str) -> Self {
        let progress_bar = ProgressBar::new(total_samples);

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} samples ({percent}%) | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        progress_bar.set_style(style);
        progress_bar.set_message(format!("Analyzing {}", operation_name));

        Self {
            progress_bar,
            start_time: Instant::now(),
            total_samples,
            sample_rate,
            processed_samples: 0,
        }
    }

    /// Moves the bar to the sample matching `percent`
    pub fn set_percent(&mut self, percent: f64) {
        let target = ((percent.clamp(0.0, 100.0) / 100.0) * self.total_samples as f64).round() as u64;
        if target > self.processed_samples {
            self.progress_bar.inc(target - self.processed_samples);
            self.processed_samples = target;
        }

        let msg = self.get_progress_message();
        self.progress_bar.set_message(msg);
    }

    /// Gets the current position in the video (h:mm:ss format)
    fn get_current_time(&self) -> String {
        format_duration(self.processed_samples as f64 / self.sample_rate)
    }

    fn get_progress_message(&self) -> String {
        if self.processed_samples == 0 {
            return "Starting...".to_string();
        }

        let elapsed = self.start_time.elapsed();
        let samples_per_second = self.processed_samples as f64 / elapsed.as_secs_f64();
        let total_video_time = format_duration(self.total_samples as f64 / self.sample_rate);
        let remaining = self.total_samples.saturating_sub(self.processed_samples);
        let eta = if samples_per_second > 0.0 {
            format_duration(remaining as f64 / samples_per_second)
        } else {
            "Calculating...".to_string()
        };

        format!(
            "{} | Total: {} | Speed: {:.1} samples/s | ETA: {}",
            self.get_current_time(),
            total_video_time,
            samples_per_second,
            eta
        )
    }

    /// Finishes the progress bar
    pub fn finish(&self) {
        let total_time = self.start_time.elapsed();
        let message = format!(
            "Completed! Video: {} | Processing: {}",
            format_duration(self.total_samples as f64 / self.sample_rate),
            format_duration(total_time.as_secs_f64())
        );
        self.progress_bar.finish_with_message(message);
    }

    /// Leaves the bar where the run stopped
    pub fn abandon(&self) {
        let message = format!("Stopped at {}", self.get_current_time());
        self.progress_bar.abandon_with_message(message);
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn processed_samples(&self) -> u64 {
        self.processed_samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl ProgressSink for AnalysisProgressTracker {
    fn on_progress(&mut self, percent: f64) {
        self.set_percent(percent);
    }

    fn on_finish(&mut self) {
        self.finish();
    }

    fn on_abandon(&mut self) {
        self.abandon();
    }
}

/// Formats a duration in seconds to h:mm:ss format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(30.0), "0:30");
        assert_eq!(format_duration(90.0), "1:30");
        assert_eq!(format_duration(3661.0), "1:01:01");
    }

    #[test]
    fn test_progress_tracker_creation() {
        let tracker = AnalysisProgressTracker::new(120, 1.0, "test video");
        assert_eq!(tracker.total_samples(), 120);
        assert_eq!(tracker.sample_rate(), 1.0);
        assert_eq!(tracker.processed_samples(), 0);
    }

    #[test]
    fn test_progress_tracker_never_moves_backwards() {
        let mut tracker = AnalysisProgressTracker::new(10, 1.0, "test video");
        tracker.on_progress(50.0);
        assert_eq!(tracker.processed_samples(), 5);
        tracker.on_progress(20.0);
        assert_eq!(tracker.processed_samples(), 5);
        tracker.on_progress(100.0);
        assert_eq!(tracker.processed_samples(), 10);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |p: f64| seen.push(p);
            sink.on_progress(10.0);
            sink.on_progress(20.0);
            sink.on_finish();
            sink.on_abandon();
        }
        assert_eq!(seen, vec![10.0, 20.0]);
    }
}
