/// 33点ボディポーズスキーマのランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    const ALL: [LandmarkIndex; LandmarkIndex::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 相対深度（範囲なし）
    pub z: f32,
    /// 可視性スコア (0.0〜1.0)
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// 可視性が閾値を超えているか（閾値と等しい場合は不可視）
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility > threshold
    }

    /// ピクセル座標に変換（切り捨て）
    pub fn to_pixel(&self, dims: FrameDimensions) -> JointCoordinate {
        JointCoordinate {
            x: (self.x as f64 * dims.width as f64) as i32,
            y: (self.y as f64 * dims.height as f64) as i32,
        }
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            visibility: 0.0,
        }
    }
}

/// フレームの幅と高さ（ピクセル）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// ピクセル座標の関節位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointCoordinate {
    pub x: i32,
    pub y: i32,
}

impl JointCoordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn as_f64(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// 1フレーム分の33ランドマーク
#[derive(Debug, Clone)]
pub struct Landmarks {
    pub points: [Landmark; LandmarkIndex::COUNT],
}

impl Landmarks {
    pub fn new(points: [Landmark; LandmarkIndex::COUNT]) -> Self {
        Self { points }
    }

    /// インデックスでランドマークを取得
    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.points[index as usize]
    }

    /// 全ランドマークの平均可視性
    pub fn average_visibility(&self) -> f32 {
        let sum: f32 = self.points.iter().map(|p| p.visibility).sum();
        sum / LandmarkIndex::COUNT as f32
    }
}

impl Default for Landmarks {
    fn default() -> Self {
        Self {
            points: [Landmark::default(); LandmarkIndex::COUNT],
        }
    }
}
