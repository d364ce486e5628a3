//! 関節座標の解決と姿勢推定モデルとの境界
//!
//! 姿勢推定モデル本体はこのクレートの外にある。フレームを 33 点の正規化
//! ランドマークに変換するものは [`PoseProvider`] を、ランドマークを採用するか
//! 判断するものは [`JointResolver`] を実装する。

use anyhow::Result;

use super::landmark::{FrameDimensions, JointCoordinate, LandmarkIndex, Landmarks};

/// デフォルトの可視性閾値（この値より大きい場合のみ採用）
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// 1フレームのランドマークを返す（人物未検出なら None）
pub trait PoseProvider {
    type Frame;

    fn extract(&mut self, frame: &Self::Frame) -> Result<Option<Landmarks>>;
}

/// 正規化ランドマーク → ピクセル座標（信頼できない場合は None）
pub trait JointResolver {
    fn resolve(
        &self,
        landmarks: &Landmarks,
        index: LandmarkIndex,
        dims: FrameDimensions,
    ) -> Option<JointCoordinate>;
}

/// `visibility > threshold` のときのみ採用し、ピクセルへ切り捨て変換する
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver {
    threshold: f32,
}

impl VisibilityResolver {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Default for VisibilityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

impl JointResolver for VisibilityResolver {
    fn resolve(
        &self,
        landmarks: &Landmarks,
        index: LandmarkIndex,
        dims: FrameDimensions,
    ) -> Option<JointCoordinate> {
        let landmark = landmarks.get(index);
        if landmark.is_visible(self.threshold) {
            Some(landmark.to_pixel(dims))
        } else {
            None
        }
    }
}
