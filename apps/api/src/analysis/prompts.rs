// Prompt constants for resume analysis.
// Reuses the JSON-only system instruction from llm_client::prompts.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as ANALYSIS_SYSTEM;

/// Sections the classification rule counts. A resume needs at least two.
pub const RESUME_SECTIONS: [&str; 5] = ["education", "experience", "projects", "skills", "achievements"];

/// Analysis prompt template. Replace `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are ResumeAnalyzer, a meticulous technical resume reviewer.

First, determine if the INPUT RESUME TEXT is a professional resume.

A valid resume must contain AT LEAST TWO of these common sections:
- Education
- Experience (Work Experience, Internships)
- Projects
- Skills
- Achievements

A document is NOT a resume if it looks like: essays, articles, books, code dumps, receipts, invoices, transcripts, certificates, legal contracts, or random notes.
Ignore missing formatting, broken bullets, or hyperlinks caused by PDF parsing.

If the document does NOT qualify as a resume (fewer than two valid sections found), respond ONLY with strict JSON:
{
  "notResume": true,
  "message": "The uploaded file does not appear to be a resume (it does not include at least two standard sections). Please upload a valid resume."
}

If it IS a resume, complete the tasks below and respond ONLY with the resume-analysis JSON defined under OUTPUT FORMAT (no extra keys, no Markdown, no comments).

## TASKS (only if it is a resume)
1. Reorder and rewrite the resume draft:
   - Reconstruct sections: Education, Experience, Projects, Skills, Achievements.
   - Order entries chronologically (latest first).
   - Rewrite entries concisely.
   - Remove duplicates and irrelevant artifacts.
   - Do not fabricate facts that are not present in the input.

## ANALYSIS
Provide a score out of 100 as a string, e.g. "82/100".

Return the analysis in two separate fields without section titles:
- "issues": bullet points only (no heading), one per line, each starting with "- ".
- "improvements": bullet points only (no heading), one per line, each starting with "- ".

### Rules for issues
- Give a short title followed by a detailed explanation (3-4 sentences).
- Focus on clarity, relevance, missing achievements, weak descriptions, or missing technical details.
- Do NOT report problems caused by PDF parsing such as layout errors, broken bullets, or missing hyperlinks.

### Rules for improvements
- Give specific, actionable improvements with 2-3 sentence explanations.
- Name actions as plain words (e.g. Quantify results, Emphasize skills).
- Do NOT suggest fixes for formatting, layout, or hyperlinks.

## LATEX RESUME SNIPPETS
Generate LaTeX for each section (education, experience, projects, skills, achievements).
Escape reserved characters. Inside JSON strings every backslash must be written as \\.

## OUTPUT FORMAT (use EXACTLY this shape for valid resumes)
{
  "score": "string",
  "issues": "string with bullet points only",
  "improvements": "string with bullet points only",
  "latex": {
    "education": "string",
    "experience": "string",
    "projects": "string",
    "skills": "string",
    "achievements": "string"
  }
}

## INPUT RESUME TEXT
"""
{resume_text}
"""
"#;

/// Embeds extracted resume text into the analysis template.
pub fn build_analysis_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_trimmed_text_once() {
        let prompt = build_analysis_prompt("\n  Jane Doe\nEducation: BSc  \n");
        assert!(prompt.contains("\"\"\"\nJane Doe\nEducation: BSc\n\"\"\""));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_prompt_names_every_counted_section() {
        for section in RESUME_SECTIONS {
            assert!(
                ANALYSIS_PROMPT_TEMPLATE.contains(&format!("\"{section}\"")),
                "missing latex key {section}"
            );
        }
        assert!(ANALYSIS_PROMPT_TEMPLATE.contains("AT LEAST TWO"));
        assert!(ANALYSIS_PROMPT_TEMPLATE.contains("\"notResume\": true"));
    }
}
