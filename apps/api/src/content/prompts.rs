// Prompt constants for the resume optimization call.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{FACTUALITY_INSTRUCTION, JSON_ONLY_SYSTEM};

/// Persona line; `optimization_system()` appends the JSON-only rule.
const OPTIMIZATION_PERSONA: &str = "You are an expert resume writer and applicant-tracking-system \
    specialist. You tailor an existing resume to a target job description.";

/// Task description and output schema. Resume and job text are appended
/// after this block by `build_optimization_prompt`.
const OPTIMIZATION_INSTRUCTIONS: &str = r#"Tailor the resume below to the target job description.

Keep every piece of source information:
- Every job, project, education entry, and certification stays.
- Every skill stays; reorder skills so the most job-relevant come first.
- Companies, titles, dates, and institutions are copied exactly.

Improve:
- Write a new 2-3 sentence summary aimed at the target role. Its first sentence doubles as a tagline.
- Strengthen bullets with action verbs, job keywords where truthful, and quantified results already implied by the source.

Return a JSON object with this EXACT schema (omit optional fields you have no data for):
{
  "personalInfo": {
    "name": "Full Name",
    "email": "email@example.com",
    "phone": "+1234567890",
    "location": "City, Country",
    "linkedin": "linkedin.com/in/username (optional)",
    "github": "github.com/username (optional)",
    "portfolio": "example.com (optional)"
  },
  "summary": "Tailored professional summary",
  "skills": ["Most relevant skill", "Next skill"],
  "experience": [
    {
      "title": "Job Title",
      "company": "Company Name",
      "location": "City, Country (optional)",
      "duration": "Mon YYYY - Mon YYYY",
      "bullets": ["Achievement with a measurable result"]
    }
  ],
  "education": [
    {
      "degree": "Degree Name",
      "institution": "University Name",
      "location": "City, Country (optional)",
      "year": "YYYY",
      "gpa": "3.8/4.0 (optional)"
    }
  ],
  "projects": [
    {
      "name": "Project Name",
      "description": "One-line description",
      "technologies": ["Tech 1", "Tech 2"]
    }
  ],
  "certifications": ["Certification Name"]
}"#;

pub fn optimization_system() -> String {
    format!("{OPTIMIZATION_PERSONA} {JSON_ONLY_SYSTEM}")
}

/// Full user prompt. Inputs are appended verbatim, never substituted into
/// the instruction text.
pub fn build_optimization_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "{OPTIMIZATION_INSTRUCTIONS}\n\n{FACTUALITY_INSTRUCTION}\n\n---\n\nEXISTING RESUME:\n{resume_text}\n\n---\n\nTARGET JOB DESCRIPTION:\n{job_description}\n\n---\n\nReturn the optimized resume as the JSON object described above."
    )
}
