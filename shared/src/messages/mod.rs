mod input;
mod scene_delta;

pub use input::{InputFrame, InputSubmission};
pub use scene_delta::SceneDelta;
