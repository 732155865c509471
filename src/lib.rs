//! ATS screener library
//!
//! Scores a resume against a job description: skills are normalized and matched
//! semantically, experience is compared, and the raw resume text is checked for
//! structure, readability and writing quality.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{AtsError, Result};
pub use processing::ats_scorer::{AtsScorer, ScoreBreakdown};
pub use processing::records::{CandidateRecord, JobRecord, ProfileRecord, RecordKind};
