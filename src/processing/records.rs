//! Parsed resume and job-description records

use crate::error::{AtsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

pub const TECH_STACK: &str = "Tech Stack";
pub const YEARS_OF_EXPERIENCE: &str = "Years of Experience";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Candidate,
    Job,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Candidate => write!(f, "resume"),
            RecordKind::Job => write!(f, "job description"),
        }
    }
}

/// A string-keyed record as produced by the profile extractor.
///
/// Only `Tech Stack` and `Years of Experience` are interpreted; every other key
/// is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRecord {
    fields: Map<String, Value>,
}

pub type CandidateRecord = ProfileRecord;
pub type JobRecord = ProfileRecord;

impl ProfileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value, kind: RecordKind) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(AtsError::InvalidInput(format!(
                "{} record must be a JSON object, got {}",
                kind,
                json_type(&other)
            ))),
        }
    }

    pub fn from_json_str(json: &str, kind: RecordKind) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value, kind)
    }

    pub fn from_file(path: &Path, kind: RecordKind) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content, kind)
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Skill tokens from `Tech Stack`: a comma-separated string or an array of
    /// strings, trimmed, empty tokens dropped.
    pub fn tech_stack(&self, kind: RecordKind) -> Result<Vec<String>> {
        let value = self
            .fields
            .get(TECH_STACK)
            .ok_or_else(|| AtsError::malformed(kind, TECH_STACK, "is missing"))?;

        match value {
            Value::String(s) => Ok(split_skills(s)),
            Value::Array(items) => {
                let mut skills = Vec::with_capacity(items.len());
                for item in items {
                    let s = item.as_str().ok_or_else(|| {
                        AtsError::malformed(kind, TECH_STACK, "must contain only strings")
                    })?;
                    skills.extend(split_skills(s));
                }
                Ok(skills)
            }
            Value::Null => Ok(Vec::new()),
            other => Err(AtsError::malformed(
                kind,
                TECH_STACK,
                format!("must be a string or list, got {}", json_type(other)),
            )),
        }
    }

    /// `Years of Experience` as a non-negative number
    pub fn years_of_experience(&self, kind: RecordKind) -> Result<f64> {
        let value = self
            .fields
            .get(YEARS_OF_EXPERIENCE)
            .ok_or_else(|| AtsError::malformed(kind, YEARS_OF_EXPERIENCE, "is missing"))?;

        let years = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            AtsError::malformed(kind, YEARS_OF_EXPERIENCE, format!("is not numeric: {}", value))
        })?;

        if !years.is_finite() || years < 0.0 {
            return Err(AtsError::malformed(
                kind,
                YEARS_OF_EXPERIENCE,
                format!("must be a non-negative number, got {}", years),
            ));
        }

        Ok(years)
    }

    /// Check both scoring fields without keeping the results
    pub fn validate(&self, kind: RecordKind) -> Result<()> {
        self.tech_stack(kind)?;
        self.years_of_experience(kind)?;
        Ok(())
    }
}

fn split_skills(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
