// Quick unit-style benchmarks for the per-frame hot path
// These run in milliseconds, not minutes

#[cfg(test)]
mod benchmark_tests {
    use crate::classifier::{ShotResult, ShotType};
    use crate::config::AnalyzerConfig;
    use crate::detector::{ArcDetector, CurveFitDetector, ShotDetector};
    use crate::observation::{FrameObservation, Point, PoseObservation, PositionSample};
    use crate::session::AnalysisSession;
    use crate::shot::ShotRecord;
    use crate::stats::GameStats;
    use crate::trajectory::TrajectoryBuffer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Instant;

    fn create_test_buffer() -> TrajectoryBuffer {
        let mut buffer = TrajectoryBuffer::new();
        for (i, y) in [450.0, 380.0, 300.0, 260.0, 290.0].iter().enumerate() {
            buffer.append(PositionSample::new(400.0, *y, i as f64));
        }
        buffer
    }

    fn create_test_shots(count: usize) -> Vec<ShotRecord> {
        let locations = ["Paint", "Top of Key", "Left Wing", "Mid Range"];
        (0..count)
            .map(|i| ShotRecord {
                frame_number: i as u64,
                timestamp: i as f64,
                shot_type: ShotType::ALL[i % 3],
                result: if i % 2 == 0 { ShotResult::Make } else { ShotResult::Miss },
                location: locations[i % locations.len()].to_string(),
                confidence: 0.9,
                pose: PoseObservation::default(),
                feedback_text: String::new(),
                technical_notes: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn benchmark_detectors() {
        let buffer = create_test_buffer();
        let iterations = 10000;

        let start = Instant::now();
        for _ in 0..iterations {
            assert!(ArcDetector.detect(&buffer));
        }
        let arc_duration = start.elapsed();

        let curve_fit = CurveFitDetector::default();
        let start = Instant::now();
        for _ in 0..iterations {
            assert!(curve_fit.detect(&buffer));
        }
        let curve_fit_duration = start.elapsed();

        println!("Detector benchmark ({} iterations):", iterations);
        println!("  Arc: {:?}", arc_duration);
        println!("  Curve fit: {:?}", curve_fit_duration);

        // Should complete in reasonable time
        assert!(curve_fit_duration.as_millis() < 2000);
    }

    #[test]
    fn benchmark_stats_fold() {
        let shots = create_test_shots(10000);

        let start = Instant::now();
        let stats = GameStats::from_shots(&shots);
        let duration = start.elapsed();

        println!("Stats fold benchmark ({} shots): {:?}", shots.len(), duration);
        assert_eq!(stats.total_shots, 10000);
        assert_eq!(stats.makes, 5000);
        assert!(duration.as_millis() < 1000);
    }

    #[test]
    fn benchmark_session_frames() {
        let config = AnalyzerConfig::default();
        let mut session = AnalysisSession::new(&config, StdRng::seed_from_u64(1));
        let arc = [450.0, 300.0, 200.0, 350.0];
        let frames = 30000u64;

        let start = Instant::now();
        for n in 0..frames {
            let frame = FrameObservation {
                ball: Some(Point::new(400.0, arc[(n % 4) as usize])),
                hoop: None,
                pose: PoseObservation::default(),
            };
            session.process_frame(n, n as f64, &frame);
        }
        let duration = start.elapsed();

        println!("Session benchmark ({} frames): {:?}", frames, duration);
        println!("  Average per frame: {:?}", duration / frames as u32);
        assert!(!session.shots().is_empty());
        assert!(duration.as_millis() < 5000);
    }
}
