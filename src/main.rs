//! ats-screener: score resumes against job descriptions

use anyhow::{bail, Context, Result};
use ats_screener::cli::{validate_file_extension, Cli, Commands, ConfigAction, ModelAction};
use ats_screener::config::{Config, OutputFormat};
use ats_screener::input::InputManager;
use ats_screener::llm::{AnswerGrader, AssessmentReport, ChatClient, ProfileExtractor, QuestionGenerator, ReviewGenerator};
use ats_screener::output::{save_report_to_file, ReportGenerator, ScreeningReport};
use ats_screener::processing::embedding_manager::EmbeddingModelManager;
use ats_screener::processing::embeddings::{Embedder, Model2VecEmbedder};
use ats_screener::processing::vocabulary::Vocabulary;
use ats_screener::{AtsScorer, ProfileRecord, RecordKind};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const SUPPORTED_DOCUMENTS: [&str; 4] = ["pdf", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Could not read .env file: {}", e);
        }
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("reading configuration from {}", path.display())),
        None => Config::load().context("loading default configuration"),
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            resume_record,
            job_record,
            output,
            save,
            detailed,
            no_review,
        } => {
            let options = ScoreOptions {
                format: output.unwrap_or(config.output.format),
                save,
                detailed: detailed || config.output.detailed,
                review: config.output.include_review && !no_review,
            };
            run_score(&config, &resume, job.as_deref(), resume_record.as_deref(), job_record.as_deref(), options)
                .await?;
        }

        Commands::Assess {
            tech_stack,
            record,
            questions,
            save,
        } => {
            run_assess(&config, tech_stack, record.as_deref(), questions, save.as_deref()).await?;
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(&config).await?;
            match action {
                ModelAction::List => {
                    println!("{}\n", "Embedding models".bold());
                    for model in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(&model.name) {
                            "downloaded".green()
                        } else {
                            "not downloaded".yellow()
                        };
                        let active = if model.name == config.models.embedding_model
                            || model.repo_id == config.models.embedding_model
                        {
                            " (active)"
                        } else {
                            ""
                        };
                        println!("  {}{} [{}]", model.name.bold(), active, status);
                        println!("    {} | {} MB | {} dims", model.repo_id, model.size_mb, model.dimensions);
                        println!("    {}", model.description);
                    }
                    println!("\nModels directory: {}", config.models_dir().display());
                }
                ModelAction::Download { model } => {
                    let spinner = spinner(&format!("Downloading {}", model));
                    let result = manager.download_model(&model).await;
                    spinner.finish_and_clear();
                    let path = result.with_context(|| format!("downloading model {}", model))?;
                    println!("{} {} -> {}", "Downloaded".green(), model, path.display());
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config).context("rendering configuration")?;
                println!("# {}\n{}", config_path.display(), rendered);
            }
            Some(ConfigAction::Reset) => {
                Config::default()
                    .save_to(config_path)
                    .with_context(|| format!("writing {}", config_path.display()))?;
                println!("Configuration reset: {}", config_path.display());
            }
            Some(ConfigAction::Path) => println!("{}", config_path.display()),
        },
    }

    Ok(())
}

struct ScoreOptions {
    format: OutputFormat,
    save: Option<PathBuf>,
    detailed: bool,
    review: bool,
}

async fn run_score(
    config: &Config,
    resume: &Path,
    job: Option<&Path>,
    resume_record: Option<&Path>,
    job_record: Option<&Path>,
    options: ScoreOptions,
) -> Result<()> {
    let start_time = Instant::now();

    validate_file_extension(resume, &SUPPORTED_DOCUMENTS).map_err(anyhow::Error::msg)?;
    if let Some(job) = job {
        validate_file_extension(job, &SUPPORTED_DOCUMENTS).map_err(anyhow::Error::msg)?;
    }
    if job.is_none() && job_record.is_none() {
        bail!("either --job or --job-record is required");
    }

    let mut input = InputManager::new();
    let resume_text = input
        .extract_text(resume)
        .await
        .with_context(|| format!("extracting text from {}", resume.display()))?;
    let job_text = match job {
        Some(job) => Some(
            input
                .extract_text(job)
                .await
                .with_context(|| format!("extracting text from {}", job.display()))?,
        ),
        None => None,
    };
    info!("Resume text: {} characters", resume_text.len());

    let needs_llm = resume_record.is_none() || job_record.is_none() || options.review;
    let client = if needs_llm {
        match ChatClient::from_config(&config.llm) {
            Ok(client) => Some(client),
            Err(e) if resume_record.is_some() && job_record.is_some() => {
                warn!("Review disabled: {}", e);
                None
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context("language model client is needed to extract records"))
            }
        }
    } else {
        None
    };

    let candidate = match resume_record {
        Some(path) => ProfileRecord::from_file(path, RecordKind::Candidate)
            .with_context(|| format!("reading resume record {}", path.display()))?,
        None => {
            let client = client.clone().context("language model client unavailable")?;
            let spinner = spinner("Extracting resume details");
            let record = ProfileExtractor::new(client, &config.llm).extract_candidate(&resume_text).await;
            spinner.finish_and_clear();
            record.context("extracting resume details")?
        }
    };

    let job_profile = match (job_record, &job_text) {
        (Some(path), _) => ProfileRecord::from_file(path, RecordKind::Job)
            .with_context(|| format!("reading job record {}", path.display()))?,
        (None, Some(text)) => {
            let client = client.clone().context("language model client unavailable")?;
            let spinner = spinner("Extracting job requirements");
            let record = ProfileExtractor::new(client, &config.llm).extract_job(text).await;
            spinner.finish_and_clear();
            record.context("extracting job requirements")?
        }
        (None, None) => bail!("either --job or --job-record is required"),
    };

    let spinner = spinner("Scoring resume");
    let scoring = {
        let config = config.clone();
        let candidate = candidate.clone();
        let job_profile = job_profile.clone();
        let resume_text = resume_text.clone();
        tokio::task::spawn_blocking(move || -> Result<_> {
            let vocabulary = Vocabulary::load(&config.vocabulary).context("loading vocabulary")?;
            let embedder: Arc<dyn Embedder> =
                Arc::new(Model2VecEmbedder::from_config(&config).context("loading embedding model")?);
            let model_name = embedder.model_name().to_string();
            let scorer = AtsScorer::new(&vocabulary, embedder, &config.scoring)?;
            let (score, breakdown) = scorer.score(&candidate, &job_profile, &resume_text)?;
            Ok((score, breakdown, model_name))
        })
        .await
    };
    spinner.finish_and_clear();
    let (score, breakdown, model_name) = scoring.context("scoring task panicked")??;

    let review = match (&client, options.review) {
        (Some(client), true) => {
            let job_context = match &job_text {
                Some(text) => text.clone(),
                None => serde_json::to_string_pretty(&job_profile)?,
            };
            let spinner = self::spinner("Requesting review");
            let result = ReviewGenerator::new(client.clone(), &config.llm)
                .review(&candidate, &job_context)
                .await;
            spinner.finish_and_clear();
            match result {
                Ok(review) => Some(review),
                Err(e) => {
                    warn!("Review unavailable: {}", e);
                    None
                }
            }
        }
        _ => None,
    };

    let report = ScreeningReport::new(score, breakdown, review, &model_name)
        .with_sources(
            Some(resume.display().to_string()),
            job.map(|j| j.display().to_string()),
        )
        .with_processing_time(start_time.elapsed().as_millis() as u64);

    let use_colors = config.output.color_output && options.save.is_none();
    let generator = ReportGenerator::with_options(use_colors, options.detailed, true, true);
    let rendered = generator.generate_report(&report, options.format)?;

    match &options.save {
        Some(path) => {
            save_report_to_file(&rendered, path).with_context(|| format!("saving report to {}", path.display()))?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

async fn run_assess(
    config: &Config,
    tech_stack: Option<String>,
    record: Option<&Path>,
    questions: usize,
    save: Option<&Path>,
) -> Result<()> {
    let tech_stack = match (tech_stack, record) {
        (Some(stack), _) => stack,
        (None, Some(path)) => ProfileRecord::from_file(path, RecordKind::Candidate)
            .and_then(|record| record.tech_stack(RecordKind::Candidate))
            .with_context(|| format!("reading tech stack from {}", path.display()))?
            .join(", "),
        (None, None) => bail!("either --tech-stack or --record is required"),
    };
    if questions == 0 {
        bail!("--questions must be at least 1");
    }

    let client = ChatClient::from_config(&config.llm)
        .map_err(|e| anyhow::Error::new(e).context("language model client is needed for the assessment"))?;
    let asker = QuestionGenerator::new(client.clone(), &config.llm);
    let grader = AnswerGrader::new(client, &config.llm);

    let mut report = AssessmentReport::new(&tech_stack);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{} {}\n", "Technical assessment:".bold(), tech_stack);
    for number in 1..=questions {
        let spinner = spinner("Preparing question");
        let question = asker.question(&tech_stack, number).await;
        spinner.finish_and_clear();
        let question = question.with_context(|| format!("generating question {}", number))?;

        println!("{}", format!("Question {} of {}", number, questions).bold());
        println!("{}\n", question);

        let answer = read_answer(&mut lines).await?;
        let spinner = self::spinner("Grading answer");
        let grade = grader.grade(&question, &answer).await;
        spinner.finish_and_clear();
        let grade = grade.with_context(|| format!("grading answer {}", number))?;

        println!("Score: {}/100", grade.score.to_string().bold());
        println!("Feedback: {}\n", grade.feedback);
        report.push(question, answer, grade);
    }

    if let Some(total) = report.total_percentage() {
        println!("{} {:.2}%", "Total Percentage:".bold(), total);
    }

    if let Some(path) = save {
        let json = serde_json::to_string_pretty(&report).context("rendering assessment")?;
        save_report_to_file(&json, path).with_context(|| format!("saving assessment to {}", path.display()))?;
        println!("Assessment saved to {}", path.display());
    }

    Ok(())
}

/// Next non-empty line from stdin; blank lines ask again
async fn read_answer(lines: &mut Lines<BufReader<Stdin>>) -> Result<String> {
    loop {
        println!("Your answer:");
        match lines.next_line().await? {
            Some(line) if !line.trim().is_empty() => return Ok(line.trim().to_string()),
            Some(_) => println!("{}", "Please provide an answer before submitting.".yellow()),
            None => bail!("input closed before the assessment finished"),
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
