//! クリップ全体のカテゴリ採点
//!
//! 各採点は履歴を少数の固定点数に対応付ける。データ不足の場合は
//! エラーにせず中立値を返す。

use super::category::CategoryScores;
use super::history::MetricsHistory;
use crate::config::{GoodRange, ThresholdsConfig};

/// データ不足時の中立値
pub const NEUTRAL_SCORE: f64 = 5.0;
/// フレームはあるが足の向きが一度も測れなかった場合のフットワーク点
pub const FOOTWORK_UNMEASURED_SCORE: f64 = 6.0;
/// フォロースルー採点に必要な最小フレーム数
pub const MIN_FOLLOW_THROUGH_FRAMES: usize = 10;
/// フォロースルーはクリップ末尾の 1/N を見る
pub const FOLLOW_THROUGH_DIVISOR: usize = 5;

/// フォロースルー窓の取り方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowThroughWindow {
    /// 末尾 `len / 5` フレーム位置（プレースホルダを含む）
    #[default]
    FramePositions,
    /// 末尾 `samples / 5` 個の肘角度サンプル
    ElbowSamples,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// 母分散
fn variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn fraction_in_range(values: &[f64], range: GoodRange) -> f64 {
    let in_range = values.iter().filter(|v| range.contains(**v)).count();
    in_range as f64 / values.len() as f64
}

/// 以下 (`<=`) で判定するバンド: 最初に `value <= limit` を満たした点数
fn band_at_most(value: f64, bands: &[(f64, f64)], otherwise: f64) -> f64 {
    bands
        .iter()
        .find(|(limit, _)| value <= *limit)
        .map_or(otherwise, |(_, score)| *score)
}

/// 以上 (`>=`) で判定するバンド
fn band_at_least(value: f64, bands: &[(f64, f64)], otherwise: f64) -> f64 {
    bands
        .iter()
        .find(|(floor, _)| value >= *floor)
        .map_or(otherwise, |(_, score)| *score)
}

#[derive(Debug, Clone)]
pub struct CategoryScorer {
    thresholds: ThresholdsConfig,
    window: FollowThroughWindow,
}

impl CategoryScorer {
    pub fn new(thresholds: ThresholdsConfig) -> Self {
        Self {
            thresholds,
            window: FollowThroughWindow::default(),
        }
    }

    pub fn with_window(mut self, window: FollowThroughWindow) -> Self {
        self.window = window;
        self
    }

    pub fn score_all(&self, history: &MetricsHistory) -> CategoryScores {
        CategoryScores {
            footwork: self.footwork(history),
            head_position: self.head_position(history),
            swing_control: self.swing_control(history),
            balance: self.balance(history),
            follow_through: self.follow_through(history),
        }
    }

    /// 理想角度からの平均絶対偏差
    pub fn footwork(&self, history: &MetricsHistory) -> f64 {
        if history.is_empty() {
            return NEUTRAL_SCORE;
        }
        let angles = history.samples(|m| m.foot_direction);
        if angles.is_empty() {
            return FOOTWORK_UNMEASURED_SCORE;
        }
        let ideal = self.thresholds.foot_direction.ideal_angle;
        let deviations: Vec<f64> = angles.iter().map(|a| (a - ideal).abs()).collect();
        band_at_most(mean(&deviations), &[(10.0, 9.0), (20.0, 7.0), (30.0, 5.0)], 3.0)
    }

    pub fn head_position(&self, history: &MetricsHistory) -> f64 {
        let distances = history.samples(|m| m.head_knee_distance);
        if distances.is_empty() {
            return NEUTRAL_SCORE;
        }
        let max = self.thresholds.head_knee_alignment.max_distance;
        band_at_most(
            mean(&distances),
            &[(max * 0.5, 9.0), (max, 7.0), (max * 1.5, 5.0)],
            3.0,
        )
    }

    pub fn swing_control(&self, history: &MetricsHistory) -> f64 {
        let angles = history.samples(|m| m.elbow_angle);
        if angles.is_empty() {
            return NEUTRAL_SCORE;
        }
        let fraction = fraction_in_range(&angles, self.thresholds.elbow_angle);
        band_at_least(fraction, &[(0.8, 9.0), (0.6, 7.0), (0.4, 5.0)], 3.0)
    }

    pub fn balance(&self, history: &MetricsHistory) -> f64 {
        let leans = history.samples(|m| m.spine_lean);
        if leans.is_empty() {
            return NEUTRAL_SCORE;
        }
        let fraction = fraction_in_range(&leans, self.thresholds.spine_lean);
        band_at_least(fraction, &[(0.7, 9.0), (0.5, 7.0), (0.3, 5.0)], 3.0)
    }

    /// クリップ終盤の肘角度の安定度
    pub fn follow_through(&self, history: &MetricsHistory) -> f64 {
        if history.len() < MIN_FOLLOW_THROUGH_FRAMES {
            return NEUTRAL_SCORE;
        }
        let tail = self.follow_through_samples(history);
        if tail.is_empty() {
            return NEUTRAL_SCORE;
        }
        band_at_most(variance(&tail), &[(100.0, 8.0), (300.0, 6.0)], 4.0)
    }

    /// 末尾窓に含まれる肘角度
    pub fn follow_through_samples(&self, history: &MetricsHistory) -> Vec<f64> {
        match self.window {
            FollowThroughWindow::FramePositions => {
                let count = history.len() / FOLLOW_THROUGH_DIVISOR;
                history
                    .trailing(count)
                    .iter()
                    .filter_map(|m| m.elbow_angle)
                    .collect()
            }
            FollowThroughWindow::ElbowSamples => {
                let samples = history.samples(|m| m.elbow_angle);
                let start = samples.len() - samples.len() / FOLLOW_THROUGH_DIVISOR;
                samples[start..].to_vec()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomechanics::FrameMetrics;
    use crate::config::{FootDirectionConfig, HeadKneeConfig};

    fn thresholds() -> ThresholdsConfig {
        ThresholdsConfig {
            elbow_angle: GoodRange::new(120.0, 150.0),
            spine_lean: GoodRange::new(10.0, 20.0),
            head_knee_alignment: HeadKneeConfig { max_distance: 40.0 },
            foot_direction: FootDirectionConfig { ideal_angle: 45.0 },
        }
    }

    fn scorer() -> CategoryScorer {
        CategoryScorer::new(thresholds())
    }

    fn history_of<F>(values: &[Option<f64>], set: F) -> MetricsHistory
    where
        F: Fn(&mut FrameMetrics, Option<f64>),
    {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut m = FrameMetrics::empty(i as u64);
                set(&mut m, *v);
                m
            })
            .collect()
    }

    fn elbows(values: &[Option<f64>]) -> MetricsHistory {
        history_of(values, |m, v| m.elbow_angle = v)
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_footwork_empty_history_vs_unmeasured() {
        let s = scorer();
        assert_eq!(s.footwork(&MetricsHistory::new()), 5.0);
        let no_feet = elbows(&some(&[130.0, 131.0]));
        assert_eq!(s.footwork(&no_feet), 6.0);
    }

    #[test]
    fn test_footwork_bands() {
        let s = scorer();
        let feet = |v: &[f64]| history_of(&some(v), |m, x| m.foot_direction = x);
        assert_eq!(s.footwork(&feet(&[40.0, 50.0])), 9.0);
        assert_eq!(s.footwork(&feet(&[55.0])), 9.0);
        assert_eq!(s.footwork(&feet(&[65.0, 25.0])), 7.0);
        assert_eq!(s.footwork(&feet(&[75.0])), 5.0);
        assert_eq!(s.footwork(&feet(&[80.0, 5.0])), 3.0);
    }

    #[test]
    fn test_head_position_bands() {
        let s = scorer();
        let heads = |v: &[Option<f64>]| history_of(v, |m, x| m.head_knee_distance = x);
        assert_eq!(s.head_position(&heads(&[None, None])), 5.0);
        assert_eq!(s.head_position(&heads(&some(&[20.0]))), 9.0);
        assert_eq!(s.head_position(&heads(&some(&[10.0, 50.0]))), 7.0);
        assert_eq!(s.head_position(&heads(&some(&[60.0]))), 5.0);
        assert_eq!(s.head_position(&heads(&some(&[60.1]))), 3.0);
    }

    #[test]
    fn test_swing_control_all_in_range() {
        let history = elbows(&some(&[130.0, 135.0, 140.0, 128.0, 132.0]));
        assert_eq!(scorer().swing_control(&history), 9.0);
    }

    #[test]
    fn test_swing_control_bands() {
        let s = scorer();
        assert_eq!(s.swing_control(&MetricsHistory::new()), 5.0);
        // 3/5 = 0.6
        assert_eq!(s.swing_control(&elbows(&some(&[130.0, 130.0, 130.0, 90.0, 90.0]))), 7.0);
        // 2/5 = 0.4
        assert_eq!(s.swing_control(&elbows(&some(&[130.0, 130.0, 90.0, 90.0, 90.0]))), 5.0);
        // 1/5
        assert_eq!(s.swing_control(&elbows(&some(&[130.0, 90.0, 90.0, 90.0, 90.0]))), 3.0);
    }

    #[test]
    fn test_balance_bands() {
        let s = scorer();
        let leans = |v: &[f64]| history_of(&some(v), |m, x| m.spine_lean = x);
        assert_eq!(s.balance(&MetricsHistory::new()), 5.0);
        // 7/10
        let mut v = vec![15.0; 7];
        v.extend([40.0; 3]);
        assert_eq!(s.balance(&leans(&v)), 9.0);
        // 1/2
        assert_eq!(s.balance(&leans(&[15.0, 40.0])), 7.0);
        // 1/3
        assert_eq!(s.balance(&leans(&[15.0, 40.0, 40.0])), 5.0);
        assert_eq!(s.balance(&leans(&[40.0])), 3.0);
    }

    #[test]
    fn test_follow_through_below_frame_floor() {
        // 角度は大きく変動するが 9 フレームしかない
        let history = elbows(&some(&[0.0, 180.0, 0.0, 180.0, 0.0, 180.0, 0.0, 180.0, 0.0]));
        assert_eq!(scorer().follow_through(&history), 5.0);
    }

    #[test]
    fn test_follow_through_bands() {
        let s = scorer();
        let steady = elbows(&some(&[130.0; 10]));
        assert_eq!(s.follow_through(&steady), 8.0);

        // 窓 = 末尾 2 フレーム: [100, 130] の分散 = 225
        let mut v = vec![130.0; 8];
        v.extend([100.0, 130.0]);
        assert_eq!(s.follow_through(&elbows(&some(&v))), 6.0);

        // [100, 140] の分散 = 400
        let mut v = vec![130.0; 8];
        v.extend([100.0, 140.0]);
        assert_eq!(s.follow_through(&elbows(&some(&v))), 4.0);
    }

    #[test]
    fn test_follow_through_window_is_floor_of_len_over_five() {
        // 23 フレーム → 末尾 4。フレーム 18 は窓の外
        let mut v = vec![Some(130.0); 23];
        v[18] = Some(10.0);
        let history = elbows(&v);
        assert_eq!(scorer().follow_through_samples(&history).len(), 4);
        assert_eq!(scorer().follow_through(&history), 8.0);

        v[19] = Some(10.0);
        assert_eq!(scorer().follow_through(&elbows(&v)), 4.0);
    }

    #[test]
    fn test_follow_through_empty_window() {
        let mut v = some(&[130.0; 10]);
        v[8] = None;
        v[9] = None;
        assert_eq!(scorer().follow_through(&elbows(&v)), 5.0);
    }

    /// 末尾に肘サンプルがない場合、2 つの窓の取り方で結果が変わる（デフォルトはフレーム位置）
    #[test]
    fn test_follow_through_position_vs_sample_window() {
        // 10 フレーム: 8 つ計測（終盤でぶれる）、最後の 2 つは欠損
        let mut v = some(&[130.0, 130.0, 130.0, 130.0, 130.0, 130.0, 100.0, 140.0]);
        v.extend([None, None]);
        let history = elbows(&v);

        let by_position = scorer();
        assert_eq!(by_position.follow_through_samples(&history), Vec::<f64>::new());
        assert_eq!(by_position.follow_through(&history), 5.0);

        // 8 samples / 5 = 1 -> [140]
        let by_sample = scorer().with_window(FollowThroughWindow::ElbowSamples);
        assert_eq!(by_sample.follow_through_samples(&history), vec![140.0]);
        assert_eq!(by_sample.follow_through(&history), 8.0);
    }

    #[test]
    fn test_score_all() {
        let scores = scorer().score_all(&MetricsHistory::new());
        assert_eq!(scores.footwork, 5.0);
        assert_eq!(scores.head_position, 5.0);
        assert_eq!(scores.swing_control, 5.0);
        assert_eq!(scores.balance, 5.0);
        assert_eq!(scores.follow_through, 5.0);
    }

    #[test]
    fn test_variance_is_population() {
        assert!((variance(&[100.0, 140.0]) - 400.0).abs() < 1e-9);
        assert_eq!(variance(&[5.0]), 0.0);
    }
}
