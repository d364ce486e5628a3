//! フレーム単位のバイオメカニクス（幾何計算・指標・即時フィードバック）

pub mod angle;
pub mod feedback;
pub mod metrics;

pub use angle::{angle, angle_from_reference};
pub use feedback::{FrameFeedback, FrameFeedbackRules, Verdict};
pub use metrics::{FrameMetrics, FrontJoints, FrontSide, MetricExtractor};
