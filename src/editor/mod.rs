//! Single-article editing

mod session;

pub use session::{EditorSession, SessionState};
