use crate::classifier::ShotType;
use crate::progress::format_duration;
use crate::session::AnalysisOutcome;
use crate::shot::ShotRecord;
use crate::stats::{GameStats, MakeMiss};
use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// What gets written to `results.json` for a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub source: String,
    pub sample_rate_hz: f64,
    pub shots: Vec<ShotRecord>,
    pub stats: GameStats,
}

impl AnalysisReport {
    pub fn new(source: &str, sample_rate_hz: f64, outcome: AnalysisOutcome) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            source: source.to_string(),
            sample_rate_hz,
            shots: outcome.shots,
            stats: outcome.stats,
        }
    }

    /// Writes the report as pretty JSON, creating parent directories as needed
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("failed to write: {}", path.display()))?;
        Ok(())
    }
}

/// Renders the text dashboard for a finished run
pub fn render_summary(outcome: &AnalysisOutcome, recent: usize) -> String {
    Summary { outcome, recent }.to_string()
}

/// Text dashboard over a finished run, showing the last `recent` shots
pub struct Summary<'a> {
    pub outcome: &'a AnalysisOutcome,
    pub recent: usize,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.outcome.stats;

        writeln!(f, "================================")?;
        writeln!(f, "Shot Accuracy: {:.1}% ({}/{} shots)", stats.overall_accuracy, stats.makes, stats.total_shots)?;
        match stats.hot_zone() {
            Some((label, tally)) => writeln!(
                f,
                "Hot Zone: {} ({:.1}%, {}/{})",
                label,
                tally.accuracy(),
                tally.makes,
                tally.attempts()
            )?,
            None => writeln!(f, "Hot Zone: none yet")?,
        }

        if stats.total_shots == 0 {
            return writeln!(f, "No shots detected.");
        }

        writeln!(f, "--------------------------------")?;
        writeln!(f, "By shot type:")?;
        for shot_type in ShotType::ALL {
            let tally = stats.by_type(shot_type);
            if tally.attempts() > 0 {
                write_tally(f, shot_type.display_name(), tally)?;
            }
        }

        writeln!(f, "By location:")?;
        for (label, tally) in &stats.shot_locations {
            write_tally(f, label, tally)?;
        }

        let shots = self.outcome.recent_shots(self.recent);
        if shots.is_empty() {
            return Ok(());
        }
        writeln!(f, "--------------------------------")?;
        writeln!(f, "Recent shots:")?;
        let first_index = self.outcome.shots.len() - shots.len();
        for (offset, shot) in shots.iter().enumerate() {
            write_shot(f, first_index + offset + 1, shot)?;
        }
        Ok(())
    }
}

fn write_tally(f: &mut fmt::Formatter<'_>, label: &str, tally: &MakeMiss) -> fmt::Result {
    writeln!(
        f,
        "  {:<15} {:>3}/{:<3} {:>5.1}%",
        label,
        tally.makes,
        tally.attempts(),
        tally.accuracy()
    )
}

fn write_shot(f: &mut fmt::Formatter<'_>, number: usize, shot: &ShotRecord) -> fmt::Result {
    writeln!(
        f,
        "  #{} [{}] {} from {} - {} ({:.0}% confidence)",
        number,
        format_duration(shot.timestamp),
        shot.shot_type,
        shot.location,
        shot.result,
        shot.confidence * 100.0
    )?;
    // balance and follow-through are shown on a 10 point scale
    writeln!(
        f,
        "     Elbow {:.0}° | Knee {:.0}° | Balance {:.1}/10 | Follow-through {:.1}/10",
        shot.pose.elbow_angle_deg,
        shot.pose.knee_angle_deg,
        shot.pose.balance * 10.0,
        shot.pose.follow_through * 10.0
    )?;
    writeln!(f, "     \"{}\"", shot.feedback_text)?;
    for note in &shot.technical_notes {
        writeln!(f, "     - {}", note)?;
    }
    Ok(())
}
