// Multi-dialect LaTeX rendering engine.
// Pure and synchronous: one render is a function of (document, template id).
// No I/O happens here; skeletons and assets are owned by the registry.

pub mod dialect;
pub mod escape;
pub mod handlers;
pub mod sections;
pub mod substitute;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::resume::CandidateDocument;

pub use dialect::{Asset, DialectRegistry, StructuralClass, DEFAULT_TEMPLATE};

#[derive(Debug, Error)]
pub enum RenderError {
    /// The template id has no registered skeleton. Never compile after this.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// A structurally required field is missing. Optional fields never raise.
    #[error("Malformed document: required field '{field}' is missing")]
    MalformedDocument { field: String },

    /// A skeleton and the renderers disagree on the placeholder set.
    #[error(
        "Template '{template}' is inconsistent: unresolved placeholders [{}], never referenced [{}]",
        .unresolved.join(", "),
        .unused.join(", ")
    )]
    TemplateConsistency {
        template: String,
        unresolved: Vec<String>,
        unused: Vec<String>,
    },
}

/// Fully substituted LaTeX source plus the assets it compiles against.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub template_id: String,
    pub structural_class: StructuralClass,
    pub latex: String,
    #[serde(serialize_with = "asset_names")]
    pub assets: Vec<Asset>,
}

fn asset_names<S: serde::Serializer>(assets: &[Asset], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(assets.iter().map(|a| a.name.as_str()))
}

/// Renders `doc` with the skeleton registered under `template_id`.
///
/// Either returns a string with no placeholder left in it or fails;
/// there is no partial output.
pub fn render_resume(
    registry: &DialectRegistry,
    doc: &CandidateDocument,
    template_id: &str,
) -> Result<RenderedDocument, RenderError> {
    let profile = registry.resolve(template_id)?;

    if doc.identity.name.trim().is_empty() {
        return Err(RenderError::MalformedDocument {
            field: "personalInfo.name".to_string(),
        });
    }

    let class = profile.structural_class;
    let fragments = sections::render_sections(doc, class);
    let substituted = substitute::substitute(&profile.skeleton_source, &fragments);

    if !substituted.unresolved.is_empty() {
        return Err(RenderError::TemplateConsistency {
            template: profile.id.clone(),
            unresolved: substituted.unresolved,
            unused: vec![],
        });
    }

    debug!(
        "Rendered template {} ({:?}): {} bytes",
        profile.id,
        class,
        substituted.text.len()
    );

    Ok(RenderedDocument {
        template_id: profile.id.clone(),
        structural_class: class,
        latex: substituted.text,
        assets: profile.assets.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry, Identity, Project};

    const TEMPLATES: [&str; 3] = ["professional", "faangpath", "business_insider"];

    fn sample_document() -> CandidateDocument {
        CandidateDocument {
            identity: Identity {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+1 555 0100".to_string(),
                location: "Berlin".to_string(),
                linkedin: Some("https://www.linkedin.com/in/jdoe/".to_string()),
                github: Some("github.com/jdoe".to_string()),
                portfolio: None,
            },
            summary: "Builds reliable systems. Loves distributed consensus.".to_string(),
            skills: vec!["Go".to_string(), "Rust".to_string(), "C++".to_string()],
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                title: "Engineer".to_string(),
                location: None,
                duration: "2020-2022".to_string(),
                bullets: vec![
                    "Cut p99 latency by 40%".to_string(),
                    "Migrated 12 services to Rust".to_string(),
                ],
            }],
            education: vec![EducationEntry {
                institution: "TU Berlin".to_string(),
                degree: "BSc Computer Science".to_string(),
                location: Some("Berlin".to_string()),
                year: "2019".to_string(),
                grade: None,
            }],
            projects: vec![],
            certifications: vec![],
        }
    }

    fn registry() -> DialectRegistry {
        DialectRegistry::builtin().unwrap()
    }

    fn assert_no_placeholders(latex: &str) {
        let left = substitute::placeholder_names(latex);
        assert!(left.is_empty(), "unresolved placeholders: {left:?}");
    }

    #[test]
    fn test_every_template_renders_without_placeholders() {
        let registry = registry();
        for id in TEMPLATES {
            let rendered = render_resume(&registry, &sample_document(), id).unwrap();
            assert_no_placeholders(&rendered.latex);
            assert!(rendered.latex.contains("Jane Doe"), "{id}");
        }
    }

    #[test]
    fn test_unknown_template_fails_closed() {
        let err = render_resume(&registry(), &sample_document(), "modern").unwrap_err();
        assert!(matches!(err, RenderError::UnknownTemplate(id) if id == "modern"));
    }

    #[test]
    fn test_blank_name_is_malformed() {
        let mut doc = sample_document();
        doc.identity.name = String::new();
        let err = render_resume(&registry(), &doc, "professional").unwrap_err();
        assert!(matches!(err, RenderError::MalformedDocument { .. }));
    }

    #[test]
    fn test_empty_optional_sections_leave_no_heading() {
        let registry = registry();
        for id in TEMPLATES {
            let latex = render_resume(&registry, &sample_document(), id).unwrap().latex;
            assert!(!latex.contains("Projects"), "{id} leaked projects heading");
            assert!(!latex.contains("PROJECTS"), "{id} leaked projects comment");
            assert!(!latex.contains("Certifications"), "{id} leaked certifications heading");
            assert!(!latex.contains("Extra-Curricular"), "{id} leaked extra-curricular heading");
        }
    }

    #[test]
    fn test_populated_optional_sections_render_heading() {
        let mut doc = sample_document();
        doc.projects = vec![Project {
            name: "vitae".to_string(),
            description: "Resume renderer".to_string(),
            technologies: vec!["Rust".to_string()],
        }];
        doc.certifications = vec!["CKA".to_string()];

        let registry = registry();
        let baseline = render_resume(&registry, &doc, "professional").unwrap().latex;
        assert!(baseline.contains("\\section{Projects}"));
        assert!(baseline.contains("\\section{Certifications}"));

        let class_based = render_resume(&registry, &doc, "faangpath").unwrap().latex;
        assert!(class_based.contains("\\begin{rSection}{Projects}"));
        assert!(class_based.contains("\\begin{rSection}{Extra-Curricular Activities}"));

        let alternate = render_resume(&registry, &doc, "business_insider").unwrap().latex;
        assert!(alternate.contains("\\cvsection{Projects}"));
        assert!(alternate.contains("\\cvsection{Certifications}"));
    }

    #[test]
    fn test_reserved_characters_escaped_in_every_template() {
        const RAW: &str = r"\ & % $ # _ { } ~ ^";
        const ESCAPED: &str = r"\textbackslash{} \& \% \$ \# \_ \{ \} \textasciitilde{} \textasciicircum{}";
        let fields = [
            "summary",
            "company",
            "title",
            "duration",
            "institution",
            "degree",
            "certification",
            "project",
        ];
        let raw = |field: &str| format!("{field} {RAW}");

        let mut doc = sample_document();
        doc.summary = raw("summary");
        doc.experience[0].company = raw("company");
        doc.experience[0].title = raw("title");
        doc.experience[0].duration = raw("duration");
        doc.education[0].institution = raw("institution");
        doc.education[0].degree = raw("degree");
        doc.certifications = vec![raw("certification")];
        doc.projects = vec![Project {
            name: raw("project"),
            description: "Resume renderer".to_string(),
            technologies: vec![],
        }];

        let registry = registry();
        for id in TEMPLATES {
            let latex = render_resume(&registry, &doc, id).unwrap().latex;
            for field in fields {
                assert!(
                    latex.contains(&format!("{field} {ESCAPED}")),
                    "{id} did not escape {field}"
                );
                assert!(
                    !latex.contains(&format!("{field} {RAW}")),
                    "{id} left {field} raw"
                );
            }
            assert!(!latex.contains(r"\\&"), "{id} double-escaped");
            assert!(!latex.contains(r"\textbackslash\{\}"), "{id} re-escaped backslash");
        }
    }

    #[test]
    fn test_null_list_items_leave_no_partial_fragments() {
        let draft: crate::models::resume::ResumeDraft = serde_json::from_value(serde_json::json!({
            "personalInfo": {
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "1",
                "location": "Berlin"
            },
            "summary": "Builds systems.",
            "skills": ["Go", null, 7],
            "experience": [{
                "company": "Acme",
                "title": "Engineer",
                "duration": "2020",
                "bullets": [null, "Led team"]
            }],
            "education": [],
            "certifications": [null]
        }))
        .unwrap();
        let doc = CandidateDocument::try_from(draft).unwrap();

        let registry = registry();
        let baseline = render_resume(&registry, &doc, "professional").unwrap().latex;
        assert!(baseline.contains("Go $|$ 7"));
        assert!(!baseline.contains("$|$  $|$"));
        assert!(!baseline.contains("\\resumeItem{}"));
        assert!(!baseline.contains("Certifications"));

        let alternate = render_resume(&registry, &doc, "business_insider").unwrap().latex;
        assert!(!alternate.contains("\\cvtag{}"));
        assert!(!alternate.contains("\\linkedin"), "absent handle rendered a macro");
        assert!(!alternate.contains("\\github"), "absent handle rendered a macro");
    }

    #[test]
    fn test_skills_order_in_every_template() {
        let registry = registry();
        let expected = [
            ("professional", "Go $|$ Rust $|$ C++"),
            ("faangpath", "Go, Rust, C++"),
            ("business_insider", "\\cvtag{Go}\n\\cvtag{Rust}\n\\cvtag{C++}"),
        ];
        for (id, skills) in expected {
            let latex = render_resume(&registry, &sample_document(), id).unwrap().latex;
            assert!(latex.contains(skills), "{id} reordered skills");
        }
    }

    #[test]
    fn test_alternate_style_tagline_and_handles() {
        let rendered = render_resume(&registry(), &sample_document(), "business_insider").unwrap();
        assert!(rendered.latex.contains("\\tagline{Builds reliable systems}"));
        assert!(rendered.latex.contains("\\linkedin{jdoe}"));
        assert!(rendered.latex.contains("\\github{jdoe}"));
    }

    #[test]
    fn test_baseline_end_to_end_experience() {
        let rendered = render_resume(&registry(), &sample_document(), "professional").unwrap();
        assert_eq!(rendered.structural_class, StructuralClass::Baseline);
        assert!(rendered.latex.contains("{Acme}{2020-2022}"));
        assert!(rendered.latex.contains("\\resumeItem{Cut p99 latency by 40\\%}"));
        assert!(rendered.latex.contains("\\resumeItem{Migrated 12 services to Rust}"));
        assert_no_placeholders(&rendered.latex);
        assert!(rendered.assets.is_empty());
    }

    #[test]
    fn test_placeholder_lookalike_in_field_stays_literal() {
        let mut doc = sample_document();
        doc.summary = "{{NAME}}".to_string();
        let latex = render_resume(&registry(), &doc, "professional").unwrap().latex;
        assert!(latex.contains("\\{\\{NAME\\}\\}"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let registry = registry();
        for id in TEMPLATES {
            let first = render_resume(&registry, &sample_document(), id).unwrap();
            let second = render_resume(&registry, &sample_document(), id).unwrap();
            assert_eq!(first.latex, second.latex, "{id}");
        }
    }

    #[test]
    fn test_class_based_templates_carry_assets() {
        let registry = registry();
        let faang = render_resume(&registry, &sample_document(), "faangpath").unwrap();
        let names: Vec<_> = faang.assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["resume.cls"]);

        let json = serde_json::to_value(
            render_resume(&registry, &sample_document(), "business_insider").unwrap(),
        )
        .unwrap();
        assert_eq!(json["assets"], serde_json::json!(["resume.cls", "altacv.cls"]));
        assert_eq!(json["structuralClass"], "alternateStyle");
        assert_eq!(json["templateId"], "business_insider");
    }
}
