// All model prompt templates for the search pipeline.

/// Grounded search prompt. Replace `{resume_text}` before sending.
pub const SEARCH_PROMPT_TEMPLATE: &str = "Based on the following resume, search the web for 3-5 \
highly relevant job postings for software engineering or related roles. For each job posting found, \
extract and return the job title, company name, and a detailed summary of the key responsibilities \
and qualifications.

---RESUME---
{resume_text}";

/// Summarization prompt. Replace `{resume_text}` and `{job_descriptions}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"You are an expert career coach. Based on the user's resume and the following job descriptions, provide a concise summary.

Follow these instructions:
1. Create a main heading "Personalized Job Summary".
2. For each job, create a subheading like "Job Opportunity 1", "Job Opportunity 2", etc.
3. Under each job subheading, list the key responsibilities and required skills in bullet points.
4. After summarizing all jobs, create a final section with the heading "Overall Skill Alignment".
5. In this final section, provide a paragraph summarizing how the user's skills from their resume align with these roles and suggest 2-3 key areas they should emphasize in their applications.

Format the entire output in clean Markdown.

---USER RESUME---
{resume_text}

---JOB DESCRIPTIONS---
{job_descriptions}"#;

pub fn build_search_prompt(resume_text: &str) -> String {
    SEARCH_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}

pub fn build_summary_prompt(resume_text: &str, job_descriptions: &str) -> String {
    // Job text goes in first so a literal "{resume_text}" inside it is left alone.
    SUMMARY_PROMPT_TEMPLATE
        .replace("{job_descriptions}", job_descriptions)
        .replacen("{resume_text}", resume_text, 1)
}
