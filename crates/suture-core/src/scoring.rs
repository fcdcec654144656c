//! Deductive scoring of suture observations.
//!
//! Only distances beyond a threshold cost points; short distances are never
//! penalised. Every rounding step uses round-half-to-even.

use crate::model::{DistanceMetric, ScaleCalibration, ScoreEntry, SutureObservation};

pub const MAX_SCORE: u8 = 10;

/// Far points score full marks up to this distance.
pub const FAR_THRESHOLD_MM: f64 = 8.0;
const FAR_STEP_MM: f64 = 2.0;

/// Near points score full marks up to this distance.
pub const NEAR_THRESHOLD_MM: f64 = 2.0;
const NEAR_STEP_MM: f64 = 1.0;

/// Points deducted per step beyond a threshold.
const POINTS_PER_STEP: f64 = 2.0;

/// Scored entries plus the headline aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub entries: Vec<ScoreEntry>,
    pub final_average_score: f64,
    pub valid_count: usize,
    pub abnormal_count: usize,
    pub total_count: usize,
}

/// Round the exact binary value to `decimals` places, ties to even.
///
/// Scaling by a power of ten first can manufacture a tie the stored value
/// does not sit on (`0.15 * 10 == 1.5`), so this goes through the exact
/// decimal expansion instead.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

fn deductive_score(distance_mm: f64, threshold_mm: f64, step_mm: f64) -> u8 {
    let max = f64::from(MAX_SCORE);
    let raw = if distance_mm <= threshold_mm {
        max
    } else {
        max - (distance_mm - threshold_mm) / step_mm * POINTS_PER_STEP
    };
    raw.clamp(0.0, max).round_ties_even() as u8
}

pub fn far_score(distance_mm: f64) -> u8 {
    deductive_score(distance_mm, FAR_THRESHOLD_MM, FAR_STEP_MM)
}

pub fn near_score(distance_mm: f64) -> u8 {
    deductive_score(distance_mm, NEAR_THRESHOLD_MM, NEAR_STEP_MM)
}

/// Rounded mean of the two sub-scores.
pub fn total_score(far: u8, near: u8) -> u8 {
    ((f64::from(far) + f64::from(near)) / 2.0).round_ties_even() as u8
}

pub fn score_observation(obs: &SutureObservation, calibration: ScaleCalibration) -> ScoreEntry {
    let far_mm = calibration.to_mm(obs.far_point_distance_px);
    let near_mm = calibration.to_mm(obs.near_point_distance_px);
    let far = far_score(far_mm);
    let near = near_score(near_mm);

    ScoreEntry {
        group_id: obs.id.clone(),
        position: obs.position.clone(),
        is_abnormal: obs.is_abnormal,
        abnormal_reason: obs.abnormal_reason.clone(),
        avr_far_points: DistanceMetric {
            average_distance_mm: round_to(far_mm, 2),
            score: far,
        },
        avr_near_points: DistanceMetric {
            average_distance_mm: round_to(near_mm, 2),
            score: near,
        },
        total_score: total_score(far, near),
    }
}

/// Score every observation and aggregate.
///
/// Abnormal entries are excluded from the average unless every entry is
/// abnormal, in which case all entries count.
pub fn score(observations: &[SutureObservation], calibration: ScaleCalibration) -> ScoreSummary {
    let entries: Vec<ScoreEntry> = observations
        .iter()
        .map(|obs| score_observation(obs, calibration))
        .collect();

    let valid: Vec<u8> = entries
        .iter()
        .filter(|e| !e.is_abnormal)
        .map(|e| e.total_score)
        .collect();
    let valid_count = valid.len();
    let total_count = entries.len();

    let average = if valid_count > 0 {
        mean(valid.into_iter())
    } else if total_count > 0 {
        mean(entries.iter().map(|e| e.total_score))
    } else {
        0.0
    };

    ScoreSummary {
        final_average_score: round_to(average, 1),
        valid_count,
        abnormal_count: total_count - valid_count,
        total_count,
        entries,
    }
}

fn mean(scores: impl Iterator<Item = u8>) -> f64 {
    let (sum, n) = scores.fold((0u64, 0u64), |(s, n), v| (s + u64::from(v), n + 1));
    if n == 0 {
        0.0
    } else {
        sum as f64 / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SutureId;
    use proptest::prelude::*;

    fn obs(id: u64, far_px: f64, near_px: f64, abnormal: bool) -> SutureObservation {
        SutureObservation {
            id: SutureId::Number(id),
            position: String::new(),
            far_point_distance_px: far_px,
            near_point_distance_px: near_px,
            is_abnormal: abnormal,
            abnormal_reason: if abnormal { "blurred".into() } else { String::new() },
        }
    }

    fn cal(v: f64) -> ScaleCalibration {
        ScaleCalibration::new(v).unwrap()
    }

    #[test]
    fn far_score_thresholds() {
        assert_eq!(far_score(4.0), 10);
        assert_eq!(far_score(8.0), 10);
        assert_eq!(far_score(10.0), 8);
        assert_eq!(far_score(14.0), 4);
        assert_eq!(far_score(18.0), 0);
        assert_eq!(far_score(40.0), 0);
    }

    #[test]
    fn near_score_thresholds() {
        assert_eq!(near_score(0.5), 10);
        assert_eq!(near_score(2.0), 10);
        assert_eq!(near_score(4.0), 6);
        assert_eq!(near_score(7.0), 0);
        assert_eq!(near_score(12.0), 0);
    }

    #[test]
    fn short_distances_are_never_penalised() {
        assert_eq!(far_score(0.0), 10);
        assert_eq!(near_score(0.0), 10);
    }

    #[test]
    fn in_range_observation_scores_full_marks() {
        let summary = score(&[obs(1, 93.0, 28.0, false)], cal(14.0));
        let e = &summary.entries[0];
        assert_eq!(e.avr_far_points.average_distance_mm, 6.64);
        assert_eq!(e.avr_far_points.score, 10);
        assert_eq!(e.avr_near_points.average_distance_mm, 2.0);
        assert_eq!(e.avr_near_points.score, 10);
        assert_eq!(e.total_score, 10);
        assert_eq!(summary.final_average_score, 10.0);
    }

    #[test]
    fn over_threshold_observation_loses_points() {
        let summary = score(&[obs(1, 140.0, 56.0, false)], cal(14.0));
        let e = &summary.entries[0];
        assert_eq!(e.avr_far_points.average_distance_mm, 10.0);
        assert_eq!(e.avr_far_points.score, 8);
        assert_eq!(e.avr_near_points.average_distance_mm, 4.0);
        assert_eq!(e.avr_near_points.score, 6);
        assert_eq!(e.total_score, 7);
    }

    #[test]
    fn total_score_ties_round_to_even() {
        assert_eq!(total_score(10, 9), 10);
        assert_eq!(total_score(8, 9), 8);
        assert_eq!(total_score(8, 6), 7);
    }

    #[test]
    fn abnormal_entries_are_excluded_from_average() {
        // totals: 10, 7, 0(abnormal)
        let summary = score(
            &[
                obs(1, 93.0, 28.0, false),
                obs(2, 140.0, 56.0, false),
                obs(3, 500.0, 500.0, true),
            ],
            cal(14.0),
        );
        assert_eq!(summary.entries.len(), 3);
        assert_eq!(summary.entries[2].total_score, 0);
        assert_eq!(summary.valid_count, 2);
        assert_eq!(summary.abnormal_count, 1);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.final_average_score, 8.5);
    }

    #[test]
    fn all_abnormal_falls_back_to_mean_of_all_entries() {
        let summary = score(
            &[obs(1, 93.0, 28.0, true), obs(2, 140.0, 56.0, true)],
            cal(14.0),
        );
        assert_eq!(summary.valid_count, 0);
        assert_eq!(summary.abnormal_count, 2);
        assert_eq!(summary.final_average_score, 8.5);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        // totals 10, 10, 7 -> 9.0; 10, 7, 7 -> 8.0; 10, 10, 10, 7 -> 9.25 -> 9.2
        let summary = score(
            &[
                obs(1, 93.0, 28.0, false),
                obs(2, 93.0, 28.0, false),
                obs(3, 93.0, 28.0, false),
                obs(4, 140.0, 56.0, false),
            ],
            cal(14.0),
        );
        assert_eq!(summary.final_average_score, 9.2);
    }

    #[test]
    fn round_to_uses_the_stored_value() {
        assert_eq!(round_to(0.15, 1), 0.1);
        assert_eq!(round_to(0.05, 1), 0.1);
        assert_eq!(round_to(9.25, 1), 9.2);
        assert_eq!(round_to(6.642857, 2), 6.64);
    }

    #[test]
    fn small_average_is_not_rounded_down_by_scaling() {
        // 19 totals of 0 plus one total of 1: mean 1/20 sits just above 0.05
        let mut input: Vec<_> = (1..20).map(|i| obs(i, 40.0, 12.0, false)).collect();
        input.push(obs(20, 16.0, 7.0, false));
        let summary = score(&input, cal(1.0));
        assert_eq!(summary.entries[19].total_score, 1);
        assert_eq!(summary.valid_count, 20);
        assert_eq!(summary.final_average_score, 0.1);
    }

    #[test]
    fn empty_input_yields_zero_average() {
        let summary = score(&[], cal(14.0));
        assert_eq!(summary.final_average_score, 0.0);
        assert_eq!(summary.total_count, 0);
    }

    #[test]
    fn scoring_is_repeatable() {
        let input = [obs(1, 101.0, 37.0, false), obs(2, 130.0, 20.0, true)];
        assert_eq!(score(&input, cal(13.9)), score(&input, cal(13.9)));
    }

    #[test]
    fn carries_observation_metadata() {
        let mut o = obs(7, 93.0, 28.0, true);
        o.position = "center".into();
        let e = score_observation(&o, cal(14.0));
        assert_eq!(e.group_id, SutureId::Number(7));
        assert_eq!(e.position, "center");
        assert!(e.is_abnormal);
        assert_eq!(e.abnormal_reason, "blurred");
    }

    proptest! {
        #[test]
        fn scores_stay_in_range(
            far_px in 0.0f64..5000.0,
            near_px in 0.0f64..5000.0,
            c in 0.5f64..100.0,
        ) {
            let e = score_observation(&obs(1, far_px, near_px, false), cal(c));
            prop_assert!(e.avr_far_points.score <= MAX_SCORE);
            prop_assert!(e.avr_near_points.score <= MAX_SCORE);
            prop_assert!(e.total_score <= MAX_SCORE);
        }

        #[test]
        fn within_far_threshold_scores_ten(c in 0.5f64..100.0, ratio in 0.0f64..=1.0) {
            let far_px = FAR_THRESHOLD_MM * ratio * c * 0.999;
            let e = score_observation(&obs(1, far_px, 0.0, false), cal(c));
            prop_assert_eq!(e.avr_far_points.score, 10);
        }

        #[test]
        fn average_lies_within_entry_scores(
            totals in proptest::collection::vec((0.0f64..400.0, 0.0f64..200.0, any::<bool>()), 1..8)
        ) {
            let input: Vec<_> = totals
                .iter()
                .enumerate()
                .map(|(i, (f, n, a))| obs(i as u64 + 1, *f, *n, *a))
                .collect();
            let summary = score(&input, cal(14.0));
            prop_assert!(summary.final_average_score >= 0.0);
            prop_assert!(summary.final_average_score <= 10.0);
            prop_assert_eq!(summary.valid_count + summary.abnormal_count, summary.total_count);
        }
    }
}
