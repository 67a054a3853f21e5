pub mod mood_record;
pub mod task;

pub use mood_record::MoodRecord;
pub use task::Task;
