//! Output formatters for screening reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{ScreeningReport, Verdict};
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for the requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn verdict_color(verdict: Verdict) -> Color {
        match verdict {
            Verdict::StrongFit => Color::Green,
            Verdict::PartialMatch => Color::Yellow,
            Verdict::NeedsImprovement => Color::Red,
        }
    }

    fn skill_line(&self, label: &str, skills: &[String], color: Color) -> String {
        let list = if skills.is_empty() {
            "none".to_string()
        } else {
            skills.join(", ")
        };
        format!("{:<9} {}\n", format!("{}:", label), self.colorize(&list, color))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();
        let breakdown = &report.breakdown;

        output.push_str(&self.format_header("ATS SCREENING REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Model: {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.embedding_model
        ));

        output.push_str(&self.format_header("Summary", 2));
        let verdict = report.verdict.to_string();
        let verdict = if self.use_colors {
            verdict.color(Self::verdict_color(report.verdict)).bold().to_string()
        } else {
            verdict
        };
        output.push_str(&format!("ATS Score: {:.2} / 100  {}\n", report.score, verdict));

        output.push_str(&self.format_header("Components", 3));
        output.push_str(&format!(
            "Skill match:            {:>6.2}%  ({:.2} / 50)\n",
            report.percentages.skill_match, breakdown.skill_match
        ));
        output.push_str(&format!(
            "Experience:             {:>6.2}%  ({:.2} / 25)\n",
            report.percentages.experience_match, breakdown.experience_match
        ));
        output.push_str(&format!(
            "Formatting:             {:>6.2}%  ({:.2} / 10)\n",
            report.percentages.formatting, breakdown.formatting_readability
        ));
        output.push_str(&format!(
            "Soft skills & clarity:  {:>6.2}%  ({:.2} / 15)\n",
            report.percentages.soft_skills, breakdown.soft_skills_clarity
        ));
        output.push_str(&format!("Missing skill penalty:  -{:.2}\n", breakdown.missing_penalty));

        output.push_str(&self.format_header("Skills", 3));
        output.push_str(&format!(
            "{} of {} required skills matched\n",
            report.matched_count, report.required_count
        ));
        output.push_str(&self.skill_line("Matched", &breakdown.matched_skills, Color::Green));
        output.push_str(&self.skill_line("Missing", &breakdown.missing_skills, Color::Red));
        output.push_str(&self.skill_line("Extra", &breakdown.extra_skills, Color::Cyan));

        if !breakdown.formatting_issues.is_empty() {
            output.push_str(&self.format_header("Formatting Issues", 3));
            for issue in &breakdown.formatting_issues {
                output.push_str(&format!("  - {}\n", self.colorize(issue, Color::Yellow)));
            }
        }

        if self.detailed {
            let details = &breakdown.soft_skill_details;
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!(
                "Clarity: {:.0}  Impact vs Responsibility: {:.0}  Soft Skills: {:.0}\n",
                details.clarity, details.impact, details.soft_skills
            ));
            output.push_str(&format!(
                "Reading ease: {:.2}  Grade level: {:.2}  Words: {}\n",
                breakdown.readability.ease, breakdown.readability.grade, breakdown.word_count
            ));
            output.push_str(&format!("Raw score: {:.2}\n", breakdown.raw_score));
        }

        if let Some(review) = &report.review {
            output.push_str(&self.format_header("Review", 2));
            output.push_str(review);
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn code_list(skills: &[String]) -> String {
        if skills.is_empty() {
            "_none_".to_string()
        } else {
            skills
                .iter()
                .map(|s| format!("`{}`", s))
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();
        let breakdown = &report.breakdown;

        output.push_str("# ATS Screening Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Model:** {}\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.embedding_model
            ));
            if let Some(resume) = &report.metadata.resume_file {
                let name = Path::new(resume)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| resume.clone());
                output.push_str(&format!("**Resume:** `{}`\n", name));
            }
            output.push('\n');
        }

        output.push_str(&format!("**ATS Score:** {:.2} / 100\n\n", report.score));
        output.push_str(&format!("**Verdict:** {}\n\n", report.verdict));

        output.push_str("## Score Breakdown\n\n");
        output.push_str("| Component | Score | Max | Percent |\n");
        output.push_str("|-----------|-------|-----|---------|\n");
        output.push_str(&format!(
            "| Skill Match | {:.2} | 50 | {:.2}% |\n",
            breakdown.skill_match, report.percentages.skill_match
        ));
        output.push_str(&format!(
            "| Experience Match | {:.2} | 25 | {:.2}% |\n",
            breakdown.experience_match, report.percentages.experience_match
        ));
        output.push_str(&format!(
            "| Formatting & Readability | {:.2} | 10 | {:.2}% |\n",
            breakdown.formatting_readability, report.percentages.formatting
        ));
        output.push_str(&format!(
            "| Soft Skills & Clarity | {:.2} | 15 | {:.2}% |\n",
            breakdown.soft_skills_clarity, report.percentages.soft_skills
        ));
        output.push_str(&format!("| Missing Penalty | -{:.2} | | |\n\n", breakdown.missing_penalty));

        output.push_str("## Skills Analysis\n\n");
        output.push_str(&format!("- **Matched:** {}\n", Self::code_list(&breakdown.matched_skills)));
        output.push_str(&format!("- **Missing:** {}\n", Self::code_list(&breakdown.missing_skills)));
        output.push_str(&format!("- **Extra:** {}\n\n", Self::code_list(&breakdown.extra_skills)));

        output.push_str("## Soft Skill Details\n\n");
        let details = &breakdown.soft_skill_details;
        output.push_str(&format!("- Clarity: {:.0}\n", details.clarity));
        output.push_str(&format!("- Impact vs Responsibility: {:.0}\n", details.impact));
        output.push_str(&format!("- Soft Skills: {:.0}\n\n", details.soft_skills));

        if !breakdown.formatting_issues.is_empty() {
            output.push_str("## Formatting Issues\n\n");
            for issue in &breakdown.formatting_issues {
                output.push_str(&format!("- {}\n", issue));
            }
            output.push('\n');
        }

        if let Some(review) = &report.review {
            output.push_str("## Review\n\n");
            output.push_str(review);
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_screening{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::tests::sample_breakdown;
    use tempfile::TempDir;

    fn report() -> ScreeningReport {
        ScreeningReport::new(46.0, sample_breakdown(), Some("## Strengths\nPython".into()), "stub")
            .with_sources(Some("/tmp/jane_cv.pdf".into()), None)
    }

    #[test]
    fn test_console_plain() {
        let output = ConsoleFormatter::new(false, true).format_report(&report()).unwrap();
        assert!(output.contains("ATS Score: 46.00 / 100  Needs Improvement"));
        assert!(output.contains("1 of 2 required skills matched"));
        assert!(output.contains("Matched:  Python"));
        assert!(output.contains("Missing:  Django"));
        assert!(output.contains("Resume too short (<200 words)"));
        assert!(output.contains("Clarity: 4  Impact vs Responsibility: 5  Soft Skills: 3"));
        assert!(output.contains("## Strengths"));
    }

    #[test]
    fn test_console_summary_hides_details() {
        let output = ConsoleFormatter::new(false, false).format_report(&report()).unwrap();
        assert!(!output.contains("Raw score"));
    }

    #[test]
    fn test_json_roundtrips_breakdown_names() {
        let output = JsonFormatter::new(true).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["score"], 46.0);
        assert_eq!(value["verdict"], "NeedsImprovement");
        assert_eq!(value["breakdown"]["Matched Skills"][0], "Python");
        assert_eq!(value["percentages"]["soft_skills"], 40.0);
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(true).format_report(&report()).unwrap();
        assert!(output.starts_with("# ATS Screening Report"));
        assert!(output.contains("**Resume:** `jane_cv.pdf`"));
        assert!(output.contains("| Skill Match | 25.00 | 50 | 50.00% |"));
        assert!(output.contains("- **Missing:** `Django`"));
        assert!(output.contains("## Review"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, false, false);
        let json = generator.generate_report(&report(), OutputFormat::Json).unwrap();
        assert!(!json.contains('\n'));
        let md = generator.generate_report(&report(), OutputFormat::Markdown).unwrap();
        assert!(!md.contains("**Generated:**"));
    }

    #[test]
    fn test_save_and_suggest_filename() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi");

        assert_eq!(suggest_filename(OutputFormat::Json, "cv/jane.pdf", false), "jane_screening.json");
        assert!(suggest_filename(OutputFormat::Markdown, "jane.pdf", true).ends_with(".md"));
    }
}
