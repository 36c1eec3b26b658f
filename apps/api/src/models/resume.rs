//! Candidate profile data model.
//!
//! Two shapes of the same document live here:
//! - [`ResumeDraft`] is the wire form produced by the content source. Every
//!   field is optional and scalar fields accept numbers and booleans.
//! - [`CandidateDocument`] is the validated form the renderer consumes.
//!   Required fields are plain `String`s, optional ones are `Option<String>`,
//!   and optional sections are (possibly empty) vectors.

use serde::{Deserialize, Deserializer, Serialize};

use crate::render::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Wire form
// ────────────────────────────────────────────────────────────────────────────

/// A candidate document as it arrives over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfoDraft>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "scalar_list", skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceDraft>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationDraft>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectDraft>>,
    #[serde(default, deserialize_with = "scalar_list", skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfoDraft {
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceDraft {
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "scalar_list", skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationDraft {
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDraft {
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_list", skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
}

/// Any JSON scalar the content source may put where text is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text))
}

/// Null list items become empty strings so positions are never shifted.
fn scalar_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Option<Scalar>>>::deserialize(deserializer)?;
    Ok(items.map(|items| {
        items
            .into_iter()
            .map(|item| item.map(Scalar::into_text).unwrap_or_default())
            .collect()
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Validated form
// ────────────────────────────────────────────────────────────────────────────

/// Root of the render input. Immutable for the duration of a render.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateDocument {
    pub identity: Identity,
    pub summary: String,
    /// Relevance-ranked; rendered in this exact order.
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<Project>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub location: Option<String>,
    pub duration: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub location: Option<String>,
    pub year: String,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

fn required<T>(value: Option<T>, field: impl Into<String>) -> Result<T, RenderError> {
    value.ok_or_else(|| RenderError::MalformedDocument {
        field: field.into(),
    })
}

/// Blank optional values are treated as absent.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<ResumeDraft> for CandidateDocument {
    type Error = RenderError;

    /// Fails with `MalformedDocument` naming the first missing required field.
    fn try_from(draft: ResumeDraft) -> Result<Self, Self::Error> {
        let info = required(draft.personal_info, "personalInfo")?;
        let name = required(info.name, "personalInfo.name")?;
        if name.trim().is_empty() {
            return Err(RenderError::MalformedDocument {
                field: "personalInfo.name".to_string(),
            });
        }

        let identity = Identity {
            name,
            email: required(info.email, "personalInfo.email")?,
            phone: required(info.phone, "personalInfo.phone")?,
            location: required(info.location, "personalInfo.location")?,
            linkedin: optional(info.linkedin),
            github: optional(info.github),
            portfolio: optional(info.portfolio),
        };

        let summary = required(draft.summary, "summary")?;
        let skills = required(draft.skills, "skills")?;

        let experience = required(draft.experience, "experience")?
            .into_iter()
            .enumerate()
            .map(|(i, exp)| {
                Ok(ExperienceEntry {
                    company: required(exp.company, format!("experience[{i}].company"))?,
                    title: required(exp.title, format!("experience[{i}].title"))?,
                    location: optional(exp.location),
                    duration: required(exp.duration, format!("experience[{i}].duration"))?,
                    bullets: exp.bullets.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        let education = required(draft.education, "education")?
            .into_iter()
            .enumerate()
            .map(|(i, edu)| {
                Ok(EducationEntry {
                    institution: required(edu.institution, format!("education[{i}].institution"))?,
                    degree: required(edu.degree, format!("education[{i}].degree"))?,
                    location: optional(edu.location),
                    year: required(edu.year, format!("education[{i}].year"))?,
                    grade: optional(edu.gpa),
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        let projects = draft
            .projects
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, proj)| {
                Ok(Project {
                    name: required(proj.name, format!("projects[{i}].name"))?,
                    description: required(proj.description, format!("projects[{i}].description"))?,
                    technologies: proj.technologies.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        Ok(CandidateDocument {
            identity,
            summary,
            skills,
            experience,
            education,
            projects,
            certifications: draft.certifications.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_draft() -> serde_json::Value {
        json!({
            "personalInfo": {
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "+1 555 0100",
                "location": "Berlin",
                "linkedin": "linkedin.com/in/janedoe",
                "github": ""
            },
            "summary": "Builds reliable systems. Loves distributed consensus.",
            "skills": ["Go", "Rust", "C++"],
            "experience": [{
                "company": "Acme",
                "title": "Engineer",
                "duration": "2020-2022",
                "bullets": ["Shipped things", "Fixed things"]
            }],
            "education": [{
                "institution": "TU Berlin",
                "degree": "BSc CS",
                "year": 2019,
                "gpa": 3.8
            }]
        })
    }

    fn convert(value: serde_json::Value) -> Result<CandidateDocument, RenderError> {
        let draft: ResumeDraft = serde_json::from_value(value).unwrap();
        CandidateDocument::try_from(draft)
    }

    #[test]
    fn test_full_draft_converts() {
        let doc = convert(full_draft()).unwrap();
        assert_eq!(doc.identity.name, "Jane Doe");
        assert_eq!(doc.skills, vec!["Go", "Rust", "C++"]);
        assert_eq!(doc.experience[0].bullets.len(), 2);
        assert!(doc.projects.is_empty());
        assert!(doc.certifications.is_empty());
    }

    #[test]
    fn test_numeric_scalars_are_stringified() {
        let doc = convert(full_draft()).unwrap();
        assert_eq!(doc.education[0].year, "2019");
        assert_eq!(doc.education[0].grade.as_deref(), Some("3.8"));
    }

    #[test]
    fn test_blank_optional_handle_is_absent() {
        let doc = convert(full_draft()).unwrap();
        assert_eq!(
            doc.identity.linkedin.as_deref(),
            Some("linkedin.com/in/janedoe")
        );
        assert!(doc.identity.github.is_none(), "empty github must be absent");
        assert!(doc.identity.portfolio.is_none());
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let mut value = full_draft();
        value["personalInfo"]
            .as_object_mut()
            .unwrap()
            .remove("name");
        match convert(value) {
            Err(RenderError::MalformedDocument { field }) => {
                assert_eq!(field, "personalInfo.name")
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_name_is_malformed() {
        let mut value = full_draft();
        value["personalInfo"]["name"] = json!("   ");
        assert!(matches!(
            convert(value),
            Err(RenderError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_null_name_is_malformed() {
        let mut value = full_draft();
        value["personalInfo"]["name"] = serde_json::Value::Null;
        assert!(matches!(
            convert(value),
            Err(RenderError::MalformedDocument { field }) if field == "personalInfo.name"
        ));
    }

    #[test]
    fn test_missing_experience_field_names_index() {
        let mut value = full_draft();
        value["experience"][0]
            .as_object_mut()
            .unwrap()
            .remove("duration");
        match convert(value) {
            Err(RenderError::MalformedDocument { field }) => {
                assert_eq!(field, "experience[0].duration")
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_bullets_are_empty() {
        let mut value = full_draft();
        value["experience"][0]
            .as_object_mut()
            .unwrap()
            .remove("bullets");
        let doc = convert(value).unwrap();
        assert!(doc.experience[0].bullets.is_empty());
    }

    #[test]
    fn test_null_list_items_keep_positions() {
        let mut value = full_draft();
        value["skills"] = json!(["Go", null, 7]);
        let doc = convert(value).unwrap();
        assert_eq!(doc.skills, vec!["Go", "", "7"]);
    }

    #[test]
    fn test_draft_serializes_with_wire_names() {
        let draft: ResumeDraft = serde_json::from_value(full_draft()).unwrap();
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["personalInfo"]["name"], "Jane Doe");
        assert!(value.get("projects").is_none(), "absent sections are omitted");
    }
}
