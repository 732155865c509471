//! Language model collaborators: profile extraction, resume review and technical assessment

pub mod assessment;
pub mod client;
pub mod extraction;
pub mod prompts;
pub mod review;

pub use assessment::{AnswerGrade, AnswerGrader, AssessmentReport, QuestionGenerator};
pub use client::{ChatClient, GenerationOptions, TextGenerator};
pub use extraction::ProfileExtractor;
pub use review::ReviewGenerator;
