pub mod answer;
pub mod answer_key;
pub mod graded;
pub mod loaders;
pub mod sheet_image;
pub mod transcription;

pub use answer::{Choice, MarkedAnswer, StudentAnswer, QUESTION_COUNT, UNANSWERED};
pub use answer_key::{AnswerKey, MAX_ACCEPTED};
pub use graded::{GradeSummary, GradedAnswer};
pub use loaders::{load_answer_key, load_sheet_image, parse_answer_key};
pub use sheet_image::{ImageMime, SheetImage};
pub use transcription::{TranscribedMark, Transcription, DEFAULT_STUDENT_NAME};
