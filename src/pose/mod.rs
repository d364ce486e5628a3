pub mod landmark;
pub mod resolver;
pub mod stream;

pub use landmark::{FrameDimensions, JointCoordinate, Landmark, LandmarkIndex, Landmarks};
pub use resolver::{JointResolver, PoseProvider, VisibilityResolver, DEFAULT_VISIBILITY_THRESHOLD};
pub use stream::{LandmarkFrame, LandmarkStream, RecordedPose};
