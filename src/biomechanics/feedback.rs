//! 表示用のフレーム単位フィードバック
//!
//! 状態を持たず各フレームを単独で判定する（平滑化なし）。ノイズの多い
//! 1 フレームで判定が反転しうる。

use std::fmt;

use super::metrics::FrameMetrics;
use crate::config::{GoodRange, ThresholdsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub message: &'static str,
}

impl Verdict {
    fn judge(passed: bool, good: &'static str, bad: &'static str) -> Self {
        Self {
            passed,
            message: if passed { good } else { bad },
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { "OK" } else { "NG" };
        write!(f, "[{mark}] {}", self.message)
    }
}

/// 現在フレームの判定（存在する指標のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFeedback {
    pub elbow: Option<Verdict>,
    pub spine: Option<Verdict>,
    pub head: Option<Verdict>,
}

impl FrameFeedback {
    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        [&self.elbow, &self.spine, &self.head]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts().next().is_none()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FrameFeedbackRules {
    elbow_angle: GoodRange,
    spine_lean: GoodRange,
    max_head_distance: f64,
}

impl FrameFeedbackRules {
    pub fn new(elbow_angle: GoodRange, spine_lean: GoodRange, max_head_distance: f64) -> Self {
        Self {
            elbow_angle,
            spine_lean,
            max_head_distance,
        }
    }

    pub fn from_config(config: &ThresholdsConfig) -> Self {
        Self::new(
            config.elbow_angle,
            config.spine_lean,
            config.head_knee_alignment.max_distance,
        )
    }

    pub fn evaluate(&self, metrics: &FrameMetrics) -> FrameFeedback {
        FrameFeedback {
            elbow: metrics.elbow_angle.map(|angle| {
                Verdict::judge(
                    self.elbow_angle.contains(angle),
                    "Good elbow elevation",
                    "Adjust elbow angle",
                )
            }),
            spine: metrics.spine_lean.map(|lean| {
                Verdict::judge(
                    self.spine_lean.contains(lean),
                    "Good spine lean",
                    "Adjust forward lean",
                )
            }),
            head: metrics.head_knee_distance.map(|distance| {
                Verdict::judge(
                    distance <= self.max_head_distance,
                    "Good head position",
                    "Head not over front knee",
                )
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> FrameFeedbackRules {
        FrameFeedbackRules::new(GoodRange::new(110.0, 140.0), GoodRange::new(10.0, 25.0), 50.0)
    }

    #[test]
    fn test_all_good() {
        let m = FrameMetrics {
            frame_number: 0,
            elbow_angle: Some(120.0),
            spine_lean: Some(25.0),
            head_knee_distance: Some(50.0),
            foot_direction: Some(10.0),
        };
        let fb = rules().evaluate(&m);
        assert!(fb.verdicts().all(|v| v.passed));
        assert_eq!(fb.verdicts().count(), 3);
        assert_eq!(fb.elbow.unwrap().message, "Good elbow elevation");
        assert_eq!(fb.spine.unwrap().message, "Good spine lean");
        assert_eq!(fb.head.unwrap().message, "Good head position");
    }

    #[test]
    fn test_all_bad() {
        let m = FrameMetrics {
            frame_number: 0,
            elbow_angle: Some(160.0),
            spine_lean: Some(5.0),
            head_knee_distance: Some(50.5),
            foot_direction: None,
        };
        let fb = rules().evaluate(&m);
        assert!(fb.verdicts().all(|v| !v.passed));
        assert_eq!(fb.elbow.unwrap().message, "Adjust elbow angle");
        assert_eq!(fb.spine.unwrap().message, "Adjust forward lean");
        assert_eq!(fb.head.unwrap().message, "Head not over front knee");
    }

    #[test]
    fn test_only_present_metrics_judged() {
        let m = FrameMetrics {
            frame_number: 0,
            elbow_angle: None,
            spine_lean: Some(15.0),
            head_knee_distance: None,
            foot_direction: Some(45.0),
        };
        let fb = rules().evaluate(&m);
        assert!(fb.elbow.is_none());
        assert!(fb.head.is_none());
        assert!(fb.spine.unwrap().passed);
    }

    #[test]
    fn test_empty_frame_has_no_feedback() {
        assert!(rules().evaluate(&FrameMetrics::empty(4)).is_empty());
    }

    #[test]
    fn test_no_memory_between_frames() {
        let r = rules();
        let good = FrameMetrics { elbow_angle: Some(125.0), ..FrameMetrics::empty(0) };
        let noisy = FrameMetrics { elbow_angle: Some(179.0), ..FrameMetrics::empty(1) };
        assert!(r.evaluate(&good).elbow.unwrap().passed);
        assert!(!r.evaluate(&noisy).elbow.unwrap().passed);
        assert!(r.evaluate(&good).elbow.unwrap().passed);
    }

    #[test]
    fn test_verdict_display() {
        let v = Verdict::judge(true, "fine", "not fine");
        assert_eq!(v.to_string(), "[OK] fine");
    }
}
