use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::category::{Category, CategoryScores};

/// 設定にないカテゴリの重み
pub const DEFAULT_WEIGHT: f64 = 0.2;

/// カテゴリごとの重み
///
/// 正規化しないので、合計が 1.0 を超えると総合点が 10 を超えうる。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringWeights {
    weights: BTreeMap<Category, f64>,
}

impl ScoringWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// `scoring.<category> = weight` から構築（未知の名前は無視）
    pub fn from_names(entries: &BTreeMap<String, f64>) -> Self {
        let weights = entries
            .iter()
            .filter_map(|(name, weight)| Category::from_name(name).map(|c| (c, *weight)))
            .collect();
        Self { weights }
    }

    pub fn with(mut self, category: Category, weight: f64) -> Self {
        self.weights.insert(category, weight);
        self
    }

    pub fn weight(&self, category: Category) -> f64 {
        self.weights.get(&category).copied().unwrap_or(DEFAULT_WEIGHT)
    }
}

/// 小数第1位への丸め
///
/// 格納された2進値を10進に正確に展開してから丸める（ちょうど中間の場合は偶数側）
fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // 得点域の f64 は小数 60 桁で正確に表現できる
    let text = format!("{:.60}", value.abs());
    let Some((whole, fraction)) = text.split_once('.') else {
        return value;
    };
    let digits = fraction.as_bytes();
    let tenths = whole
        .parse::<u128>()
        .ok()
        .and_then(|w| w.checked_mul(10))
        .and_then(|w| w.checked_add(u128::from(digits[0] - b'0')));
    let Some(mut tenths) = tenths else {
        return value;
    };

    let round_up = match digits[1] {
        d if d > b'5' => true,
        b'5' => digits[2..].iter().any(|&d| d != b'0') || tenths % 2 == 1,
        _ => false,
    };
    if round_up {
        tenths += 1;
    }
    (tenths as f64 / 10.0).copysign(value)
}

pub fn overall_score(scores: &CategoryScores, weights: &ScoringWeights) -> f64 {
    let total: f64 = scores
        .iter()
        .map(|(category, score)| score * weights.weight(category))
        .sum();
    round_one_decimal(total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Beginner,
    Intermediate,
    Advanced,
}

impl Grade {
    pub fn from_score(overall: f64) -> Self {
        if overall >= 8.0 {
            Grade::Advanced
        } else if overall >= 6.0 {
            Grade::Intermediate
        } else {
            Grade::Beginner
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::Beginner => "Beginner",
            Grade::Intermediate => "Intermediate",
            Grade::Advanced => "Advanced",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_scores_default_weights() {
        let overall = overall_score(&CategoryScores::uniform(6.0), &ScoringWeights::new());
        assert_eq!(overall, 6.0);
        assert_eq!(Grade::from_score(overall), Grade::Intermediate);
    }

    #[test]
    fn test_weighted_sum_rounds_to_one_decimal() {
        let scores = CategoryScores {
            footwork: 9.0,
            head_position: 7.0,
            swing_control: 5.0,
            balance: 9.0,
            follow_through: 8.0,
        };
        let weights = ScoringWeights::new()
            .with(Category::Footwork, 0.25)
            .with(Category::HeadPosition, 0.25)
            .with(Category::SwingControl, 0.15)
            .with(Category::Balance, 0.15)
            .with(Category::FollowThrough, 0.2);
        // 2.25 + 1.75 + 0.75 + 1.35 + 1.6 = 7.7
        assert_eq!(overall_score(&scores, &weights), 7.7);
    }

    #[test]
    fn test_exact_tie_rounds_to_even() {
        let scores = CategoryScores {
            footwork: 9.0,
            head_position: 7.0,
            swing_control: 5.0,
            balance: 8.0,
            follow_through: 3.0,
        };
        let weights = ScoringWeights::new()
            .with(Category::Footwork, 0.25)
            .with(Category::HeadPosition, 0.25)
            .with(Category::SwingControl, 0.25)
            .with(Category::Balance, 0.25)
            .with(Category::FollowThrough, 0.0);
        // 2.25 + 1.75 + 1.25 + 2.0 = 7.25（2進で正確に表現される中間値）
        let overall = overall_score(&scores, &weights);
        assert_eq!(overall, 7.2);
        assert_eq!(Grade::from_score(overall), Grade::Intermediate);
    }

    #[test]
    fn test_rounding_uses_stored_value() {
        // 6.05 は 6.0499999... として格納される
        assert_eq!(round_one_decimal(6.05), 6.0);
        assert_eq!(round_one_decimal(7.35), 7.3);
        assert_eq!(round_one_decimal(0.15), 0.1);
        assert_eq!(round_one_decimal(7.75), 7.8);
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(6.96), 7.0);
        assert_eq!(round_one_decimal(9.99), 10.0);
        assert_eq!(round_one_decimal(0.0), 0.0);
        assert_eq!(round_one_decimal(22.5), 22.5);
    }

    #[test]
    fn test_missing_weight_defaults() {
        let weights = ScoringWeights::new().with(Category::Footwork, 0.5);
        assert_eq!(weights.weight(Category::Footwork), 0.5);
        assert_eq!(weights.weight(Category::Balance), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_no_renormalization() {
        let mut weights = ScoringWeights::new();
        for c in Category::ALL {
            weights = weights.with(c, 0.5);
        }
        assert_eq!(overall_score(&CategoryScores::uniform(9.0), &weights), 22.5);
    }

    #[test]
    fn test_from_names_skips_unknown() {
        let mut entries = BTreeMap::new();
        entries.insert("balance".to_string(), 0.4);
        entries.insert("timing".to_string(), 0.9);
        let weights = ScoringWeights::from_names(&entries);
        assert_eq!(weights.weight(Category::Balance), 0.4);
        assert_eq!(weights.weight(Category::SwingControl), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(8.0), Grade::Advanced);
        assert_eq!(Grade::from_score(7.99), Grade::Intermediate);
        assert_eq!(Grade::from_score(6.0), Grade::Intermediate);
        assert_eq!(Grade::from_score(5.99), Grade::Beginner);
        assert_eq!(Grade::from_score(0.0), Grade::Beginner);
    }

    #[test]
    fn test_grade_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Grade::Advanced).unwrap(), "\"Advanced\"");
        assert_eq!(Grade::Beginner.to_string(), "Beginner");
    }
}
