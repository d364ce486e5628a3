use serde::{Deserialize, Serialize};
use std::fmt;

/// ショットの 5 つの採点カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Footwork,
    HeadPosition,
    SwingControl,
    Balance,
    FollowThrough,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Footwork,
        Category::HeadPosition,
        Category::SwingControl,
        Category::Balance,
        Category::FollowThrough,
    ];

    /// 設定ファイルと評価 JSON で使うキー
    pub fn name(self) -> &'static str {
        match self {
            Category::Footwork => "footwork",
            Category::HeadPosition => "head_position",
            Category::SwingControl => "swing_control",
            Category::Balance => "balance",
            Category::FollowThrough => "follow_through",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Footwork => "Footwork",
            Category::HeadPosition => "Head Position",
            Category::SwingControl => "Swing Control",
            Category::Balance => "Balance",
            Category::FollowThrough => "Follow Through",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// カテゴリごとの点数（フィールド順がシリアライズ順）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub footwork: f64,
    pub head_position: f64,
    pub swing_control: f64,
    pub balance: f64,
    pub follow_through: f64,
}

impl CategoryScores {
    /// 全カテゴリ同じ点数
    pub fn uniform(score: f64) -> Self {
        Self {
            footwork: score,
            head_position: score,
            swing_control: score,
            balance: score,
            follow_through: score,
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Footwork => self.footwork,
            Category::HeadPosition => self.head_position,
            Category::SwingControl => self.swing_control,
            Category::Balance => self.balance,
            Category::FollowThrough => self.follow_through,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// カテゴリごとの定型フィードバック 2 行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFeedback {
    pub footwork: [String; 2],
    pub head_position: [String; 2],
    pub swing_control: [String; 2],
    pub balance: [String; 2],
    pub follow_through: [String; 2],
}

impl CategoryFeedback {
    pub fn get(&self, category: Category) -> &[String; 2] {
        match category {
            Category::Footwork => &self.footwork,
            Category::HeadPosition => &self.head_position,
            Category::SwingControl => &self.swing_control,
            Category::Balance => &self.balance,
            Category::FollowThrough => &self.follow_through,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::from_name(c.name()), Some(c));
        }
        assert_eq!(Category::from_name("batting"), None);
    }

    #[test]
    fn test_title() {
        assert_eq!(Category::HeadPosition.title(), "Head Position");
        assert_eq!(Category::FollowThrough.to_string(), "follow_through");
    }

    #[test]
    fn test_scores_iter_order() {
        let scores = CategoryScores {
            footwork: 1.0,
            head_position: 2.0,
            swing_control: 3.0,
            balance: 4.0,
            follow_through: 5.0,
        };
        let values: Vec<f64> = scores.iter().map(|(_, s)| s).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(scores.get(Category::Balance), 4.0);
    }

    #[test]
    fn test_scores_serialize_with_category_keys() {
        let json = serde_json::to_value(CategoryScores::uniform(7.0)).unwrap();
        for c in Category::ALL {
            assert_eq!(json[c.name()], 7.0);
        }
    }
}
