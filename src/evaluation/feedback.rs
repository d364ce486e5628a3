use super::category::{Category, CategoryFeedback, CategoryScores};

/// 定型フィードバックを選ぶ点数帯
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackBand {
    /// score >= 8
    Strong,
    /// score >= 6
    Solid,
    NeedsWork,
}

impl FeedbackBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            FeedbackBand::Strong
        } else if score >= 6.0 {
            FeedbackBand::Solid
        } else {
            FeedbackBand::NeedsWork
        }
    }
}

pub fn messages(category: Category, band: FeedbackBand) -> [&'static str; 2] {
    use Category::*;
    use FeedbackBand::*;
    match (category, band) {
        (Footwork, Strong) => [
            "Excellent foot positioning and movement",
            "Maintain this stance consistency in future shots",
        ],
        (Footwork, Solid) => [
            "Good footwork with minor adjustments needed",
            "Focus on foot direction alignment with the shot",
        ],
        (Footwork, NeedsWork) => [
            "Work on foot positioning and balance",
            "Practice getting your front foot pointing toward the target",
        ],
        (HeadPosition, Strong) => [
            "Excellent head stability over front knee",
            "Great visual alignment with the ball",
        ],
        (HeadPosition, Solid) => [
            "Good head position with room for improvement",
            "Keep your head more directly over your front knee",
        ],
        (HeadPosition, NeedsWork) => [
            "Focus on keeping head still and over front knee",
            "Practice watching the ball closely through contact",
        ],
        (SwingControl, Strong) => [
            "Excellent elbow positioning and swing path",
            "Consistent technique throughout the shot",
        ],
        (SwingControl, Solid) => [
            "Good swing mechanics with minor refinements needed",
            "Work on maintaining consistent elbow height",
        ],
        (SwingControl, NeedsWork) => [
            "Focus on keeping front elbow up and extended",
            "Practice smooth, controlled swing movements",
        ],
        (Balance, Strong) => [
            "Excellent balance and body positioning",
            "Great forward lean and weight transfer",
        ],
        (Balance, Solid) => [
            "Good balance with slight improvements possible",
            "Maintain consistent forward lean angle",
        ],
        (Balance, NeedsWork) => [
            "Work on balance and weight distribution",
            "Practice proper forward lean into the shot",
        ],
        (FollowThrough, Strong) => [
            "Excellent follow-through completion",
            "Good extension and finish position",
        ],
        (FollowThrough, Solid) => [
            "Good follow-through with room for smoothness",
            "Focus on completing the swing motion",
        ],
        (FollowThrough, NeedsWork) => [
            "Work on completing your follow-through",
            "Practice extending fully through the shot",
        ],
    }
}

fn lines(scores: &CategoryScores, category: Category) -> [String; 2] {
    messages(category, FeedbackBand::from_score(scores.get(category))).map(str::to_string)
}

pub fn generate_feedback(scores: &CategoryScores) -> CategoryFeedback {
    CategoryFeedback {
        footwork: lines(scores, Category::Footwork),
        head_position: lines(scores, Category::HeadPosition),
        swing_control: lines(scores, Category::SwingControl),
        balance: lines(scores, Category::Balance),
        follow_through: lines(scores, Category::FollowThrough),
    }
}
