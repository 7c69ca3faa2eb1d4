pub mod session;

pub use session::{AnalyzeOutcome, Blocker, GradingSession, View};
