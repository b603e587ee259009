use crate::config::CourtGeometry;
use crate::observation::{Point, PositionSample};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trajectories shorter than this never produce a shot record
pub const MIN_SHOT_SAMPLES: usize = 3;

/// Range of the pseudo-confidence attached to every classified shot
pub const CONFIDENCE_RANGE: (f64, f64) = (0.85, 0.95);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Layup,
    JumpShot,
    ThreePointer,
    /// Valid category that trajectory classification never produces on its own
    FreeThrow,
}

impl ShotType {
    pub const ALL: [ShotType; 4] = [
        ShotType::Layup,
        ShotType::JumpShot,
        ShotType::ThreePointer,
        ShotType::FreeThrow,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ShotType::Layup => "Layup",
            ShotType::JumpShot => "Jump Shot",
            ShotType::ThreePointer => "Three Pointer",
            ShotType::FreeThrow => "Free Throw",
        }
    }
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotResult {
    Make,
    Miss,
}

impl ShotResult {
    pub fn is_make(&self) -> bool {
        matches!(self, ShotResult::Make)
    }
}

impl fmt::Display for ShotResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotResult::Make => f.write_str("Make"),
            ShotResult::Miss => f.write_str("Miss"),
        }
    }
}

/// Court zone derived from where the ball was first seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourtZone {
    LeftWing,
    RightWing,
    TopOfKey,
    FreeThrowLine,
    Paint,
    MidRange,
}

impl CourtZone {
    pub fn label(&self) -> &'static str {
        match self {
            CourtZone::LeftWing => "Left Wing",
            CourtZone::RightWing => "Right Wing",
            CourtZone::TopOfKey => "Top of Key",
            CourtZone::FreeThrowLine => "Free Throw Line",
            CourtZone::Paint => "Paint",
            CourtZone::MidRange => "Mid Range",
        }
    }
}

impl fmt::Display for CourtZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The labels assigned to one completed trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub shot_type: ShotType,
    pub result: ShotResult,
    pub zone: CourtZone,
    pub confidence: f64,
}

/// Assigns shot type, outcome and court zone to completed trajectories
#[derive(Debug, Clone, Default)]
pub struct ShotClassifier {
    court: CourtGeometry,
}

impl ShotClassifier {
    pub fn new(court: CourtGeometry) -> Self {
        Self { court }
    }

    /// Classifies a completed trajectory.
    ///
    /// Returns `None` for trajectories with fewer than [`MIN_SHOT_SAMPLES`]
    /// samples so that degenerate windows never become shot records.
    pub fn classify<R: Rng + ?Sized>(
        &self,
        trajectory: &[PositionSample],
        rng: &mut R,
    ) -> Option<Classification> {
        if trajectory.len() < MIN_SHOT_SAMPLES {
            return None;
        }
        let start = trajectory.first()?;
        let end = trajectory.last()?;

        Some(Classification {
            shot_type: self.shot_type(trajectory)?,
            result: self.result(end),
            zone: self.zone(start),
            confidence: rng.gen_range(CONFIDENCE_RANGE.0..CONFIDENCE_RANGE.1),
        })
    }

    /// Layup when the ball barely rose above its release point, three pointer
    /// when released from either wing, jump shot otherwise.
    pub fn shot_type(&self, trajectory: &[PositionSample]) -> Option<ShotType> {
        let start = trajectory.first()?;
        let apex_y = trajectory
            .iter()
            .map(|s| s.y)
            .fold(f64::INFINITY, f64::min);
        let rise = start.y - apex_y;

        let shot_type = if rise < self.court.layup_max_rise {
            ShotType::Layup
        } else if start.x < self.court.left_wing_x || start.x > self.court.right_wing_x {
            ShotType::ThreePointer
        } else {
            ShotType::JumpShot
        };
        Some(shot_type)
    }

    /// Make when the last sample lands within the make radius of the hoop reference point
    pub fn result(&self, end: &PositionSample) -> ShotResult {
        let distance = end.position().distance_to(&self.court.hoop);
        if distance < self.court.make_radius {
            ShotResult::Make
        } else {
            ShotResult::Miss
        }
    }

    /// Zone lookup in priority order; the first matching rule wins
    pub fn zone(&self, start: &PositionSample) -> CourtZone {
        zone_for(&start.position(), &self.court)
    }
}

fn zone_for(p: &Point, court: &CourtGeometry) -> CourtZone {
    let (x, y) = (p.x, p.y);
    let within = |(low, high): (f64, f64)| x > low && x < high;
    if x < court.left_wing_x {
        CourtZone::LeftWing
    } else if x > court.right_wing_x {
        CourtZone::RightWing
    } else if within(court.top_of_key_x) && y > court.top_of_key_min_y {
        CourtZone::TopOfKey
    } else if within(court.free_throw_x) && y > court.free_throw_min_y {
        CourtZone::FreeThrowLine
    } else if y < court.paint_max_y {
        CourtZone::Paint
    } else {
        CourtZone::MidRange
    }
}
