use crate::classifier::{ShotResult, ShotType};
use crate::shot::ShotRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Make/miss tally for one bucket (shot type or location)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeMiss {
    pub makes: u32,
    pub misses: u32,
}

impl MakeMiss {
    pub fn record(&mut self, result: ShotResult) {
        match result {
            ShotResult::Make => self.makes += 1,
            ShotResult::Miss => self.misses += 1,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.makes + self.misses
    }

    /// Percentage of makes, 0 when nothing was attempted
    pub fn accuracy(&self) -> f64 {
        percentage(self.makes, self.attempts())
    }
}

/// Aggregate shooting statistics derived from the shot list of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub total_shots: u32,
    pub makes: u32,
    pub misses: u32,
    pub layups: MakeMiss,
    pub jump_shots: MakeMiss,
    pub three_pointers: MakeMiss,
    pub free_throws: MakeMiss,
    pub shot_locations: BTreeMap<String, MakeMiss>,
    pub overall_accuracy: f64,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds an ordered shot list into totals; zero-valued stats for an empty list
    pub fn from_shots(shots: &[ShotRecord]) -> Self {
        let mut stats = Self::new();
        for shot in shots {
            stats.add_shot(shot);
        }
        stats
    }

    /// Adds one shot to the running totals and recomputes accuracy from them
    pub fn add_shot(&mut self, shot: &ShotRecord) {
        self.total_shots += 1;
        match shot.result {
            ShotResult::Make => self.makes += 1,
            ShotResult::Miss => self.misses += 1,
        }
        self.by_type_mut(shot.shot_type).record(shot.result);
        self.shot_locations
            .entry(shot.location.clone())
            .or_default()
            .record(shot.result);
        self.overall_accuracy = percentage(self.makes, self.total_shots);
    }

    pub fn by_type(&self, shot_type: ShotType) -> &MakeMiss {
        match shot_type {
            ShotType::Layup => &self.layups,
            ShotType::JumpShot => &self.jump_shots,
            ShotType::ThreePointer => &self.three_pointers,
            ShotType::FreeThrow => &self.free_throws,
        }
    }

    fn by_type_mut(&mut self, shot_type: ShotType) -> &mut MakeMiss {
        match shot_type {
            ShotType::Layup => &mut self.layups,
            ShotType::JumpShot => &mut self.jump_shots,
            ShotType::ThreePointer => &mut self.three_pointers,
            ShotType::FreeThrow => &mut self.free_throws,
        }
    }

    /// Location with the best accuracy. Ties go to more makes, then to label order.
    pub fn hot_zone(&self) -> Option<(&str, &MakeMiss)> {
        let mut best: Option<(&str, &MakeMiss)> = None;
        for (label, tally) in &self.shot_locations {
            if tally.attempts() == 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, current)) => {
                    tally.accuracy() > current.accuracy()
                        || (tally.accuracy() == current.accuracy() && tally.makes > current.makes)
                }
            };
            if better {
                best = Some((label.as_str(), tally));
            }
        }
        best
    }
}

fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
