pub mod queue;
pub mod session;
pub mod sm2;

pub use queue::{QueueMode, StudyQueue, build_queue, due_count};
pub use session::{SessionError, SessionState, StudySession};
pub use sm2::{preview_interval, schedule};
