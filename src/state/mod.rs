pub mod storage;
pub mod types;

pub use storage::{get_state_path, load_state, reset_state, save_state};
pub use types::{InProgress, QuizRecord, QuizState};
