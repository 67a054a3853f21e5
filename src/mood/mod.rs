pub mod expressions;
pub mod history;
pub mod mapper;
pub mod regulation;
pub mod smoothing;

pub use expressions::{Emotion, ExpressionScores};
pub use history::{MoodHistory, MAX_HISTORY_LENGTH};
pub use mapper::{map_expressions_to_mood, Mood};
pub use regulation::{regulation_target, RegulationTarget};
pub use smoothing::{smooth, MoodAccumulator, DEFAULT_ALPHA};
