use serde::{Deserialize, Serialize};

/// A point in frame coordinates (pixels, y grows toward the floor)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// One ball position sampled from a processed frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub x: f64,
    pub y: f64,
    pub timestamp: f64,
}

impl PositionSample {
    pub fn new(x: f64, y: f64, timestamp: f64) -> Self {
        Self { x, y, timestamp }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Shooter body mechanics estimated for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseObservation {
    pub elbow_angle_deg: f64,
    pub knee_angle_deg: f64,
    /// 0.0 (off balance) to 1.0 (fully set)
    pub balance: f64,
    /// 0.0 (no follow-through) to 1.0 (full wrist snap)
    pub follow_through: f64,
}

impl Default for PoseObservation {
    fn default() -> Self {
        Self {
            elbow_angle_deg: 90.0,
            knee_angle_deg: 150.0,
            balance: 1.0,
            follow_through: 1.0,
        }
    }
}

/// Everything the detection backend reports for one sampled timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    #[serde(default)]
    pub ball: Option<Point>,
    #[serde(default)]
    pub hoop: Option<Point>,
    #[serde(default)]
    pub pose: PoseObservation,
}

impl FrameObservation {
    pub fn ball_detected(&self) -> bool {
        self.ball.is_some()
    }

    pub fn hoop_detected(&self) -> bool {
        self.hoop.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to() {
        let a = Point::new(400.0, 170.0);
        assert_eq!(a.distance_to(&a), 0.0);
        assert_eq!(Point::new(500.0, 170.0).distance_to(&a), 100.0);
        assert_eq!(Point::new(3.0, 4.0).distance_to(&Point::new(0.0, 0.0)), 5.0);
    }

    #[test]
    fn test_frame_observation_from_json_defaults() {
        let json = r#"{ "ball": { "x": 120.0, "y": 340.0 } }"#;
        let frame: FrameObservation = serde_json::from_str(json).unwrap();
        assert!(frame.ball_detected());
        assert!(!frame.hoop_detected());
        assert_eq!(frame.pose, PoseObservation::default());
    }
}
