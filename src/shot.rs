use crate::classifier::{ShotResult, ShotType};
use crate::observation::PoseObservation;
use serde::{Deserialize, Serialize};

/// One detected and classified shot.
///
/// `timestamp` is the timestamp of the first ball sample of the trajectory
/// that produced the shot; `frame_number` is the frame at which the shot was
/// detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub frame_number: u64,
    pub timestamp: f64,
    pub shot_type: ShotType,
    pub result: ShotResult,
    pub location: String,
    pub confidence: f64,
    pub pose: PoseObservation,
    pub feedback_text: String,
    pub technical_notes: Vec<String>,
}

impl ShotRecord {
    pub fn is_make(&self) -> bool {
        self.result.is_make()
    }
}
