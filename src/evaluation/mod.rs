//! クリップ全体の評価（履歴・カテゴリ点・フィードバック・グレード）

pub mod category;
pub mod feedback;
pub mod history;
pub mod overall;
pub mod report;
pub mod scoring;

pub use category::{Category, CategoryFeedback, CategoryScores};
pub use feedback::{generate_feedback, FeedbackBand};
pub use history::MetricsHistory;
pub use overall::{overall_score, Grade, ScoringWeights, DEFAULT_WEIGHT};
pub use report::{Evaluation, ShotEvaluator};
pub use scoring::{CategoryScorer, FollowThroughWindow};
