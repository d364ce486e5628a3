use serde::{Deserialize, Serialize};

use super::angle::{angle, angle_from_reference, HORIZONTAL_RIGHT, VERTICAL_UP};
use crate::pose::{FrameDimensions, JointCoordinate, JointResolver, LandmarkIndex, Landmarks};

/// 投手側を向いている体の側
///
/// 自動判定はしない。右打者は左半身が前（デフォルト）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontSide {
    #[default]
    Left,
    Right,
}

/// 前側の関節インデックス（FrontSide から解決済み）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontJoints {
    pub shoulder: LandmarkIndex,
    pub elbow: LandmarkIndex,
    pub wrist: LandmarkIndex,
    pub hip: LandmarkIndex,
    pub knee: LandmarkIndex,
    pub ankle: LandmarkIndex,
    pub foot: LandmarkIndex,
}

impl FrontSide {
    pub fn joints(self) -> FrontJoints {
        use LandmarkIndex::*;
        match self {
            FrontSide::Left => FrontJoints {
                shoulder: LeftShoulder,
                elbow: LeftElbow,
                wrist: LeftWrist,
                hip: LeftHip,
                knee: LeftKnee,
                ankle: LeftAnkle,
                foot: LeftFootIndex,
            },
            FrontSide::Right => FrontJoints {
                shoulder: RightShoulder,
                elbow: RightElbow,
                wrist: RightWrist,
                hip: RightHip,
                knee: RightKnee,
                ankle: RightAnkle,
                foot: RightFootIndex,
            },
        }
    }
}

/// 1フレーム分のバイオメカニクス指標
///
/// 各値は独立に欠損しうる。姿勢未検出フレームは全て `None`。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub frame_number: u64,
    /// 前肘の角度（度）
    pub elbow_angle: Option<f64>,
    /// 鉛直からの背骨の傾き（度）
    pub spine_lean: Option<f64>,
    /// 鼻と前膝の水平距離（ピクセル）
    pub head_knee_distance: Option<f64>,
    /// 水平からの前足の向き（度）
    pub foot_direction: Option<f64>,
}

impl FrameMetrics {
    /// 姿勢が検出されなかったフレーム
    pub fn empty(frame_number: u64) -> Self {
        Self {
            frame_number,
            ..Self::default()
        }
    }

    pub fn has_any(&self) -> bool {
        self.elbow_angle.is_some()
            || self.spine_lean.is_some()
            || self.head_knee_distance.is_some()
            || self.foot_direction.is_some()
    }
}

/// 関節座標から指標を計算する
///
/// 必要な関節が一つでも解決できなければ、その指標は `None`。
pub struct MetricExtractor<R: JointResolver> {
    resolver: R,
    joints: FrontJoints,
}

impl<R: JointResolver> MetricExtractor<R> {
    pub fn new(resolver: R, front_side: FrontSide) -> Self {
        Self {
            resolver,
            joints: front_side.joints(),
        }
    }

    fn joint(
        &self,
        landmarks: &Landmarks,
        index: LandmarkIndex,
        dims: FrameDimensions,
    ) -> Option<JointCoordinate> {
        self.resolver.resolve(landmarks, index, dims)
    }

    /// 肩-肘-手首
    pub fn front_elbow_angle(&self, landmarks: &Landmarks, dims: FrameDimensions) -> Option<f64> {
        let shoulder = self.joint(landmarks, self.joints.shoulder, dims)?;
        let elbow = self.joint(landmarks, self.joints.elbow, dims)?;
        let wrist = self.joint(landmarks, self.joints.wrist, dims)?;
        Some(angle(shoulder.as_f64(), elbow.as_f64(), wrist.as_f64()))
    }

    pub fn spine_lean(&self, landmarks: &Landmarks, dims: FrameDimensions) -> Option<f64> {
        let hip = self.joint(landmarks, self.joints.hip, dims)?;
        let shoulder = self.joint(landmarks, self.joints.shoulder, dims)?;
        let spine = ((shoulder.x - hip.x) as f64, (shoulder.y - hip.y) as f64);
        angle_from_reference(VERTICAL_UP, spine)
    }

    /// 水平方向のみの距離（2D距離ではない）
    pub fn head_knee_distance(&self, landmarks: &Landmarks, dims: FrameDimensions) -> Option<f64> {
        let nose = self.joint(landmarks, LandmarkIndex::Nose, dims)?;
        let knee = self.joint(landmarks, self.joints.knee, dims)?;
        Some((nose.x - knee.x).abs() as f64)
    }

    pub fn foot_direction(&self, landmarks: &Landmarks, dims: FrameDimensions) -> Option<f64> {
        let ankle = self.joint(landmarks, self.joints.ankle, dims)?;
        let foot = self.joint(landmarks, self.joints.foot, dims)?;
        let direction = ((foot.x - ankle.x) as f64, (foot.y - ankle.y) as f64);
        angle_from_reference(HORIZONTAL_RIGHT, direction)
    }

    /// フレーム全体の指標。`landmarks` が `None` なら全て欠損。
    pub fn extract(
        &self,
        frame_number: u64,
        landmarks: Option<&Landmarks>,
        dims: FrameDimensions,
    ) -> FrameMetrics {
        let Some(landmarks) = landmarks else {
            return FrameMetrics::empty(frame_number);
        };
        FrameMetrics {
            frame_number,
            elbow_angle: self.front_elbow_angle(landmarks, dims),
            spine_lean: self.spine_lean(landmarks, dims),
            head_knee_distance: self.head_knee_distance(landmarks, dims),
            foot_direction: self.foot_direction(landmarks, dims),
        }
    }
}
