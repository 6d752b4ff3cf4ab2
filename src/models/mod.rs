pub mod progress;
pub mod workout;

pub use progress::{UserProgress, WeekCompletion, WorkoutHistory};
pub use workout::{ActiveWorkout, CompletedSet, CompletedWorkout, DayOfWeek, WorkoutSet};
