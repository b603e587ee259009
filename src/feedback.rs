use crate::classifier::ShotResult;
use crate::observation::PoseObservation;
use rand::Rng;
use rand::seq::SliceRandom;

const MAKE_QUOTES: [&str; 5] = [
    "That's championship basketball. Textbook form, and you rose to the moment.",
    "Beautiful shot. That's the killer instinct; when you find the zone, stay in it.",
    "Clutch shooting. That's what separates champions from everyone else.",
    "Perfect follow-through. Keep that confidence and trust your preparation.",
    "That's the shot of a winner. Your work on the fundamentals is paying off.",
];

const MISS_QUOTES: [&str; 5] = [
    "Thousands of misses are what make a great shooter. Learn from this one and come back stronger.",
    "Your elbow drifted. Champions sweat every detail; fix it and shoot again.",
    "Mental toughness means believing the next one is going in. One miss doesn't touch your confidence.",
    "I see the effort, but champions demand more. The form needs work, so stay disciplined.",
    "Every miss is a lesson. Study what went wrong and make the adjustment.",
];

pub const NOTE_ELBOW_WIDE: &str = "Keep your shooting elbow tucked in closer to your body";
pub const NOTE_ELBOW_TIGHT: &str = "Your elbow angle is too tight, allow for a more natural arc";
pub const NOTE_FOLLOW_THROUGH: &str = "Snap your wrist more on the follow-through";
pub const NOTE_BALANCE: &str = "Widen your base, keep your feet shoulder-width apart";
pub const NOTE_KNEE_BEND: &str = "Bend your knees more for better power generation";

/// A single pose threshold rule and the note it contributes when it fires
struct NoteRule {
    fires: fn(&PoseObservation) -> bool,
    note: &'static str,
}

fn elbow_too_wide(pose: &PoseObservation) -> bool {
    pose.elbow_angle_deg > 100.0
}

fn elbow_too_tight(pose: &PoseObservation) -> bool {
    pose.elbow_angle_deg < 80.0
}

fn weak_follow_through(pose: &PoseObservation) -> bool {
    pose.follow_through < 0.7
}

fn off_balance(pose: &PoseObservation) -> bool {
    pose.balance < 0.6
}

fn straight_knees(pose: &PoseObservation) -> bool {
    pose.knee_angle_deg > 160.0
}

// Evaluated in declaration order; notes come out in the same order.
const NOTE_RULES: [NoteRule; 5] = [
    NoteRule { fires: elbow_too_wide, note: NOTE_ELBOW_WIDE },
    NoteRule { fires: elbow_too_tight, note: NOTE_ELBOW_TIGHT },
    NoteRule { fires: weak_follow_through, note: NOTE_FOLLOW_THROUGH },
    NoteRule { fires: off_balance, note: NOTE_BALANCE },
    NoteRule { fires: straight_knees, note: NOTE_KNEE_BEND },
];

/// Coaching message plus technique notes for one shot
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub text: String,
    pub technical_notes: Vec<String>,
}

/// Maps a shot outcome and the shooter's pose to coaching feedback
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackGenerator;

impl FeedbackGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Picks a quote for the outcome uniformly with `rng` and derives the technical notes from `pose`
    pub fn generate<R: Rng + ?Sized>(
        &self,
        result: ShotResult,
        pose: &PoseObservation,
        rng: &mut R,
    ) -> Feedback {
        Feedback {
            text: self.quote(result, rng).to_string(),
            technical_notes: self.technical_notes(pose),
        }
    }

    pub fn quote<R: Rng + ?Sized>(&self, result: ShotResult, rng: &mut R) -> &'static str {
        let quotes = match result {
            ShotResult::Make => &MAKE_QUOTES,
            ShotResult::Miss => &MISS_QUOTES,
        };
        quotes.choose(rng).copied().unwrap_or(quotes[0])
    }

    /// Deterministic: depends on the pose only
    pub fn technical_notes(&self, pose: &PoseObservation) -> Vec<String> {
        NOTE_RULES
            .iter()
            .filter(|rule| (rule.fires)(pose))
            .map(|rule| rule.note.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pose(elbow: f64, knee: f64, balance: f64, follow_through: f64) -> PoseObservation {
        PoseObservation {
            elbow_angle_deg: elbow,
            knee_angle_deg: knee,
            balance,
            follow_through,
        }
    }

    #[test]
    fn test_wide_elbow_yields_single_note() {
        let notes = FeedbackGenerator.technical_notes(&pose(110.0, 150.0, 0.8, 0.9));
        assert_eq!(notes, vec![NOTE_ELBOW_WIDE.to_string()]);
    }

    #[test]
    fn test_notes_follow_rule_order() {
        let notes = FeedbackGenerator.technical_notes(&pose(90.0, 170.0, 0.5, 0.5));
        assert_eq!(
            notes,
            vec![
                NOTE_FOLLOW_THROUGH.to_string(),
                NOTE_BALANCE.to_string(),
                NOTE_KNEE_BEND.to_string(),
            ]
        );
    }

    #[test]
    fn test_clean_pose_yields_no_notes() {
        assert!(FeedbackGenerator.technical_notes(&pose(90.0, 150.0, 0.9, 0.9)).is_empty());
        // thresholds are strict
        assert!(FeedbackGenerator.technical_notes(&pose(100.0, 160.0, 0.6, 0.7)).is_empty());
        assert!(FeedbackGenerator.technical_notes(&pose(80.0, 160.0, 0.6, 0.7)).is_empty());
    }

    #[test]
    fn test_tight_elbow_note() {
        let notes = FeedbackGenerator.technical_notes(&pose(70.0, 150.0, 0.9, 0.9));
        assert_eq!(notes, vec![NOTE_ELBOW_TIGHT.to_string()]);
    }

    #[test]
    fn test_quote_matches_result() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(MAKE_QUOTES.contains(&FeedbackGenerator.quote(ShotResult::Make, &mut rng)));
            assert!(MISS_QUOTES.contains(&FeedbackGenerator.quote(ShotResult::Miss, &mut rng)));
        }
    }

    #[test]
    fn test_generate_is_reproducible_with_seed() {
        let p = pose(110.0, 170.0, 0.9, 0.9);
        let a = FeedbackGenerator.generate(ShotResult::Miss, &p, &mut StdRng::seed_from_u64(11));
        let b = FeedbackGenerator.generate(ShotResult::Miss, &p, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
        assert_eq!(a.technical_notes.len(), 2);
    }
}
