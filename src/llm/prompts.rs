//! Prompt templates for profile extraction, resume review and technical assessment

use log::debug;

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub candidate_extraction: String,
    pub job_extraction: String,
    pub resume_review: String,
    pub technical_question: String,
    pub answer_grading: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            candidate_extraction: CANDIDATE_EXTRACTION_TEMPLATE.to_string(),
            job_extraction: JOB_EXTRACTION_TEMPLATE.to_string(),
            resume_review: RESUME_REVIEW_TEMPLATE.to_string(),
            technical_question: TECHNICAL_QUESTION_TEMPLATE.to_string(),
            answer_grading: ANSWER_GRADING_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_candidate_extraction(&self, resume_text: &str) -> String {
        debug!("Rendering candidate extraction prompt ({} chars of resume)", resume_text.len());
        self.candidate_extraction.replace("{resume}", resume_text)
    }

    pub fn render_job_extraction(&self, job_text: &str) -> String {
        debug!("Rendering job extraction prompt ({} chars of job text)", job_text.len());
        self.job_extraction.replace("{job}", job_text)
    }

    /// `candidate` is the extracted record as JSON, `job` the raw job text
    pub fn render_resume_review(&self, candidate: &str, job: &str) -> String {
        self.resume_review
            .replace("{resume}", candidate)
            .replace("{job}", job)
    }

    /// One short-answer question; `number` is 1-based
    pub fn render_technical_question(&self, tech_stack: &str, number: usize) -> String {
        self.technical_question
            .replace("{number}", &number.to_string())
            .replace("{tech_stack}", tech_stack)
    }

    pub fn render_answer_grading(&self, question: &str, answer: &str) -> String {
        self.answer_grading
            .replace("{question}", question)
            .replace("{answer}", answer)
    }
}

const CANDIDATE_EXTRACTION_TEMPLATE: &str = r#"You are an expert resume parser. Extract only the following details from the resume text below:
- Full Name
- Email Address
- Phone Number
- Years of Experience (a single number)
- Desired Position(s)
- Current Location
- Tech Stack (every language, framework, tool, software and library mentioned, including skills used in internships and projects, as one comma-separated string)

<RESUME>
{resume}
</RESUME>

Answer with a single JSON object whose keys are exactly: "Full Name", "Email Address", "Phone Number", "Years of Experience", "Desired Position(s)", "Current Location", "Tech Stack". Do not write anything else."#;

const JOB_EXTRACTION_TEMPLATE: &str = r#"Extract only the following details from the job description below:
- Years of Experience (a single number; 0 if not stated)
- Desired Position(s)
- Tech Stack (every language, framework, tool, software and library mentioned, as one comma-separated string)

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

Answer with a single JSON object whose keys are exactly: "Years of Experience", "Desired Position(s)", "Tech Stack". Do not write anything else."#;

const RESUME_REVIEW_TEMPLATE: &str = r#"You are an experienced technical hiring manager recruiting fresh graduates.
Review the candidate profile below against the job description. Keep in mind that fresh graduates usually have internship experience rather than full-time roles.

<CANDIDATE>
{resume}
</CANDIDATE>

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

Your answer must only contain these sections, each relating to the stated job requirements:
## Strengths
## Weaknesses
## Recommendations"#;

const TECHNICAL_QUESTION_TEMPLATE: &str = r#"You are an expert technical interviewer. This is question number {number}.
Ask one short-answer technical interview question about this tech stack to test understanding: {tech_stack}
Do not ask coding questions.
Output only the question without any additional text."#;

const ANSWER_GRADING_TEMPLATE: &str = r#"You are an expert technical interviewer.
Question: {question}
Candidate Answer: {answer}

Task:
1. Evaluate whether the candidate answered correctly. Give partial credit for partially correct answers.
2. Give no credit for incorrect or irrelevant answers.
3. Give a score from 0 to 100 as you would in an interview.
4. Provide 2-3 sentences of feedback about the answer, mentioning what was good and what could be improved.

Output JSON only:
{
  "score": <int 0-100>,
  "feedback": "..."
}"#;
