pub mod grading;
pub mod llm_service;
pub mod normalizer;
pub mod transcription;

pub use grading::grade;
pub use llm_service::LlmService;
pub use normalizer::normalize_answers;
pub use transcription::{parse_transcription, Transcriber, VisionTranscriber};
