//! Skill normalization, matching and scoring

pub mod ats_scorer;
pub mod embedding_manager;
pub mod embeddings;
pub mod formatting;
pub mod normalizer;
pub mod records;
pub mod semantic_matcher;
pub mod similarity;
pub mod soft_factors;
pub mod vocabulary;
