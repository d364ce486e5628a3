use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::category::{CategoryFeedback, CategoryScores};
use super::feedback::generate_feedback;
use super::history::MetricsHistory;
use super::overall::{overall_score, Grade, ScoringWeights};
use super::scoring::CategoryScorer;
use crate::config::Config;

/// 最終評価（レポート出力の入力）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub overall_score: f64,
    pub category_scores: CategoryScores,
    pub feedback: CategoryFeedback,
    pub grade: Grade,
}

impl Evaluation {
    pub fn from_scores(category_scores: CategoryScores, weights: &ScoringWeights) -> Self {
        let overall_score = overall_score(&category_scores, weights);
        Self {
            overall_score,
            feedback: generate_feedback(&category_scores),
            grade: Grade::from_score(overall_score),
            category_scores,
        }
    }

    /// 整形 JSON（2スペースインデント）で保存。親ディレクトリがなければ作成する
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let evaluation = serde_json::from_str(&content)
            .with_context(|| format!("invalid evaluation file {}", path.display()))?;
        Ok(evaluation)
    }
}

/// 完成した履歴を採点して [`Evaluation`] を組み立てる
#[derive(Debug, Clone)]
pub struct ShotEvaluator {
    scorer: CategoryScorer,
    weights: ScoringWeights,
}

impl ShotEvaluator {
    pub fn new(scorer: CategoryScorer, weights: ScoringWeights) -> Self {
        Self { scorer, weights }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CategoryScorer::new(config.thresholds.clone()),
            config.scoring_weights(),
        )
    }

    pub fn category_scores(&self, history: &MetricsHistory) -> CategoryScores {
        self.scorer.score_all(history)
    }

    pub fn evaluate(&self, history: &MetricsHistory) -> Evaluation {
        Evaluation::from_scores(self.category_scores(history), &self.weights)
    }
}
