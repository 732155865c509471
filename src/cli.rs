//! CLI interface for the ATS screener

use crate::config::OutputFormat;
use crate::llm::assessment::DEFAULT_QUESTION_COUNT;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ats-screener")]
#[command(about = "ATS-style resume screening against a job description")]
#[command(
    long_about = "Score a resume against a job description: skills are normalized and matched semantically, experience is compared, and the resume text is checked for structure, readability and writing quality"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD); required unless --job-record is given
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Pre-extracted resume record (JSON) instead of calling the language model
        #[arg(long)]
        resume_record: Option<PathBuf>,

        /// Pre-extracted job record (JSON) instead of calling the language model
        #[arg(long)]
        job_record: Option<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include readability and soft-factor details
        #[arg(short, long)]
        detailed: bool,

        /// Skip the narrative review
        #[arg(long)]
        no_review: bool,
    },

    /// Technical short-answer assessment on a tech stack, answered on stdin
    Assess {
        /// Comma-separated tech stack to ask about
        #[arg(short, long, conflicts_with = "record")]
        tech_stack: Option<String>,

        /// Resume or job record (JSON) whose Tech Stack is used
        #[arg(long)]
        record: Option<PathBuf>,

        /// Number of questions
        #[arg(short = 'n', long, default_value_t = DEFAULT_QUESTION_COUNT)]
        questions: usize,

        /// Save questions, answers and grades as JSON
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List configured embedding models and their download status
    List,

    /// Download an embedding model into the models directory
    Download {
        /// Model name or HuggingFace repo ID
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_command() {
        let cli = Cli::try_parse_from([
            "ats-screener",
            "score",
            "--resume",
            "cv.pdf",
            "--job-record",
            "job.json",
            "-o",
            "md",
            "--no-review",
        ])
        .unwrap();

        match cli.command {
            Commands::Score {
                resume,
                job,
                job_record,
                output,
                no_review,
                ..
            } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert!(job.is_none());
                assert_eq!(job_record, Some(PathBuf::from("job.json")));
                assert_eq!(output, Some(OutputFormat::Markdown));
                assert!(no_review);
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_parse_assess_command() {
        let cli = Cli::try_parse_from(["ats-screener", "assess", "--tech-stack", "Rust, SQL", "-n", "3"]).unwrap();
        match cli.command {
            Commands::Assess {
                tech_stack,
                record,
                questions,
                ..
            } => {
                assert_eq!(tech_stack.as_deref(), Some("Rust, SQL"));
                assert!(record.is_none());
                assert_eq!(questions, 3);
            }
            _ => panic!("expected assess command"),
        }

        let cli = Cli::try_parse_from(["ats-screener", "assess", "--record", "cv.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Assess { questions: 5, .. }));

        assert!(Cli::try_parse_from(["ats-screener", "assess", "-t", "Rust", "--record", "cv.json"]).is_err());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
