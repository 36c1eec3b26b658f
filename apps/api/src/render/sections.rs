//! Section renderers.
//!
//! Each renderer takes one section of the document plus the structural
//! class and returns the LaTeX fragment for that section's placeholder.
//! Every user string goes through `escape_latex` once; the surrounding
//! markup is literal. Optional sections render to the empty string,
//! heading included, when they have no items.

use std::collections::BTreeMap;

use crate::models::resume::{
    CandidateDocument, EducationEntry, ExperienceEntry, Identity, Project,
};
use crate::render::dialect::StructuralClass;
use crate::render::escape::{escape_latex, escape_opt};

/// Placeholder name → rendered fragment.
pub type Fragments = BTreeMap<&'static str, String>;

/// Renders every section the class's skeleton expects.
pub fn render_sections(doc: &CandidateDocument, class: StructuralClass) -> Fragments {
    let mut out = Fragments::new();

    render_identity(&doc.identity, class, &mut out);
    if class == StructuralClass::AlternateStyle {
        out.insert("TAGLINE", escape_latex(tagline(&doc.summary)));
    }
    out.insert("SUMMARY", escape_latex(&doc.summary));
    out.insert("SKILLS", render_skills(&doc.skills, class));
    out.insert("EXPERIENCE", render_experience(&doc.experience, class));
    out.insert("EDUCATION", render_education(&doc.education, class));

    let projects_key = match class {
        StructuralClass::Baseline => "PROJECTS_SECTION",
        StructuralClass::ClassBased | StructuralClass::AlternateStyle => "PROJECTS",
    };
    out.insert(projects_key, render_projects(&doc.projects, class));

    let certifications_key = match class {
        StructuralClass::Baseline | StructuralClass::ClassBased => "CERTIFICATIONS_SECTION",
        StructuralClass::AlternateStyle => "CERTIFICATIONS",
    };
    out.insert(
        certifications_key,
        render_certifications(&doc.certifications, class),
    );

    out
}

/// Empty-string policy for optional sections: no items, no markup at all.
fn optional_section<T>(items: &[T], render: impl FnOnce(&[T]) -> String) -> String {
    if items.is_empty() {
        String::new()
    } else {
        render(items)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Identity
// ────────────────────────────────────────────────────────────────────────────

fn render_identity(identity: &Identity, class: StructuralClass, out: &mut Fragments) {
    out.insert("NAME", escape_latex(&identity.name));
    out.insert("EMAIL", escape_latex(&identity.email));
    out.insert("PHONE", escape_latex(&identity.phone));
    out.insert("LOCATION", escape_latex(&identity.location));

    let linkedin = identity.linkedin.as_deref();
    let github = identity.github.as_deref();
    let portfolio = identity.portfolio.as_deref();

    match class {
        StructuralClass::AlternateStyle => {
            out.insert("LINKEDIN", handle_macro(linkedin, "linkedin"));
            out.insert("GITHUB", handle_macro(github, "github"));
        }
        StructuralClass::ClassBased => {
            out.insert("LINKEDIN", href(linkedin, "LinkedIn"));
            out.insert("GITHUB", href(github, "GitHub"));
            out.insert("PORTFOLIO", href(portfolio, "Portfolio"));
        }
        StructuralClass::Baseline => {
            out.insert("LINKEDIN_SECTION", separated_href(linkedin, "LinkedIn"));
            out.insert("GITHUB_SECTION", separated_href(github, "GitHub"));
            out.insert("PORTFOLIO_SECTION", separated_href(portfolio, "Portfolio"));
        }
    }
}

/// `\href{https://<target>}{<label>}` when the handle is present.
fn href(handle: Option<&str>, label: &str) -> String {
    match handle {
        Some(h) => format!(
            "\\href{{https://{}}}{{{label}}}",
            escape_latex(strip_scheme(h.trim()))
        ),
        None => String::new(),
    }
}

/// `\<macro>{<handle>}` when the handle is present, so no icon renders
/// without text.
fn handle_macro(url: Option<&str>, macro_name: &str) -> String {
    match url.map(network_handle).filter(|h| !h.is_empty()) {
        Some(handle) => format!("\\{macro_name}{{{}}}", escape_latex(handle)),
        None => String::new(),
    }
}

/// Baseline link with its leading separator, so the separator never dangles.
fn separated_href(handle: Option<&str>, label: &str) -> String {
    match handle {
        Some(_) => format!(" $|$ {}", href(handle, label)),
        None => String::new(),
    }
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Trailing handle of a profile URL, whatever the domain:
/// `https://www.linkedin.com/in/jdoe/?trk=x` → `jdoe`.
pub fn network_handle(url: &str) -> &str {
    let rest = strip_scheme(url.trim());
    let rest = rest
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or(rest);
    rest.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(rest)
}

/// Text before the first period of the summary.
pub fn tagline(summary: &str) -> &str {
    summary.split_once('.').map_or(summary, |(head, _)| head)
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

fn render_skills(skills: &[String], class: StructuralClass) -> String {
    match class {
        StructuralClass::AlternateStyle => present(skills)
            .map(|skill| format!("\\cvtag{{{}}}", escape_latex(skill)))
            .collect::<Vec<_>>()
            .join("\n"),
        StructuralClass::ClassBased => join_escaped(skills, ", "),
        StructuralClass::Baseline => join_escaped(skills, " $|$ "),
    }
}

/// List items that carry text. A `null` item arrives as `""` and renders
/// nothing, separator included.
fn present(items: &[String]) -> impl Iterator<Item = &str> {
    items
        .iter()
        .map(String::as_str)
        .filter(|item| !item.trim().is_empty())
}

fn join_escaped(items: &[String], separator: &str) -> String {
    present(items)
        .map(escape_latex)
        .collect::<Vec<_>>()
        .join(separator)
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

fn render_experience(entries: &[ExperienceEntry], class: StructuralClass) -> String {
    entries
        .iter()
        .map(|entry| experience_entry(entry, class))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn experience_entry(entry: &ExperienceEntry, class: StructuralClass) -> String {
    let company = escape_latex(&entry.company);
    let title = escape_latex(&entry.title);
    let duration = escape_latex(&entry.duration);
    let location = escape_opt(entry.location.as_deref());
    let bullets = bullet_items(&entry.bullets, class);

    match class {
        StructuralClass::AlternateStyle => {
            let mut out = format!("\\cvevent{{{title}}}{{{company}}}{{{duration}}}{{{location}}}");
            if !bullets.is_empty() {
                out.push_str(&format!("\n\\begin{{itemize}}\n{bullets}\n\\end{{itemize}}"));
            }
            out
        }
        StructuralClass::ClassBased => {
            let mut out = format!(
                "\\begin{{rSubsection}}{{{company}}}{{{duration}}}{{{title}}}{{{location}}}\n"
            );
            if !bullets.is_empty() {
                out.push_str(&bullets);
                out.push('\n');
            }
            out.push_str("\\end{rSubsection}");
            out
        }
        StructuralClass::Baseline => {
            let mut out = format!(
                "    \\resumeSubheading\n      {{{company}}}{{{duration}}}\n      {{{title}}}{{{location}}}"
            );
            if !bullets.is_empty() {
                out.push_str(&format!(
                    "\n      \\resumeItemListStart\n{bullets}\n      \\resumeItemListEnd"
                ));
            }
            out
        }
    }
}

/// Bullet lines for one entry. Text escaping is identical across classes;
/// only the item macro differs.
fn bullet_items(bullets: &[String], class: StructuralClass) -> String {
    present(bullets)
        .map(|bullet| match class {
            StructuralClass::Baseline => format!("      \\resumeItem{{{}}}", escape_latex(bullet)),
            StructuralClass::ClassBased | StructuralClass::AlternateStyle => {
                format!("      \\item {}", escape_latex(bullet))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

fn render_education(entries: &[EducationEntry], class: StructuralClass) -> String {
    entries
        .iter()
        .map(|entry| education_entry(entry, class))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn education_entry(entry: &EducationEntry, class: StructuralClass) -> String {
    let institution = escape_latex(&entry.institution);
    let degree = escape_latex(&entry.degree);
    let year = escape_latex(&entry.year);
    let location = escape_opt(entry.location.as_deref());
    let grade = entry.grade.as_deref().map(escape_latex);

    match class {
        StructuralClass::AlternateStyle => {
            format!("\\cvevent{{{degree}}}{{{institution}}}{{{year}}}{{{location}}}")
        }
        StructuralClass::ClassBased => {
            let mut out = format!("{{\\bf {degree}}}, {institution} \\hfill {{{year}}}");
            if let Some(grade) = grade {
                out.push_str(&format!(" \\\\ GPA: {grade}"));
            }
            out
        }
        StructuralClass::Baseline => {
            let grade = grade.map(|g| format!(" - GPA: {g}")).unwrap_or_default();
            format!(
                "    \\resumeSubheading\n      {{{institution}}}{{{year}}}\n      {{{degree}{grade}}}{{{location}}}"
            )
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

fn render_projects(projects: &[Project], class: StructuralClass) -> String {
    optional_section(projects, |projects| {
        let items = projects
            .iter()
            .map(|project| project_item(project, class))
            .collect::<Vec<_>>()
            .join("\n\n");

        match class {
            StructuralClass::AlternateStyle => format!("\\cvsection{{Projects}}\n{items}"),
            StructuralClass::ClassBased => format!(
                "\\begin{{rSection}}{{Projects}}\n\\begin{{itemize}}[leftmargin=*, label={{}}]\n{items}\n\\end{{itemize}}\n\\end{{rSection}}"
            ),
            StructuralClass::Baseline => format!(
                "%-----------PROJECTS-----------\n\\section{{Projects}}\n  \\resumeSubHeadingListStart\n{items}\n  \\resumeSubHeadingListEnd"
            ),
        }
    })
}

fn project_item(project: &Project, class: StructuralClass) -> String {
    let name = escape_latex(&project.name);
    let description = escape_latex(&project.description);
    let tech = join_escaped(&project.technologies, ", ");

    match class {
        StructuralClass::AlternateStyle => {
            let tech = if tech.is_empty() {
                String::new()
            } else {
                format!(" \\hfill \\textbf{{[{tech}]}}")
            };
            format!(
                "\\textbf{{{name}}}{tech}\n\\begin{{itemize}}\n  \\item {description}\n\\end{{itemize}}"
            )
        }
        StructuralClass::ClassBased => {
            let tech = if tech.is_empty() {
                String::new()
            } else {
                format!(" \\textit{{({tech})}}")
            };
            format!("\\item \\textbf{{{name}}}. {{{description}{tech}}}")
        }
        StructuralClass::Baseline => format!(
            "    \\resumeSubheading\n      {{{name}}}{{{tech}}}\n      {{{description}}}{{}}"
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Certifications
// ────────────────────────────────────────────────────────────────────────────

fn render_certifications(certifications: &[String], class: StructuralClass) -> String {
    let certifications: Vec<&str> = present(certifications).collect();
    optional_section(&certifications, |certifications| {
        let items = certifications
            .iter()
            .map(|cert| match class {
                StructuralClass::Baseline => format!("    \\resumeItem{{{}}}", escape_latex(cert)),
                StructuralClass::ClassBased | StructuralClass::AlternateStyle => {
                    format!("    \\item {}", escape_latex(cert))
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        match class {
            StructuralClass::AlternateStyle => format!(
                "\\cvsection{{Certifications}}\n\\begin{{itemize}}\n{items}\n\\end{{itemize}}"
            ),
            StructuralClass::ClassBased => format!(
                "\\begin{{rSection}}{{Extra-Curricular Activities}}\n\\begin{{itemize}}\n{items}\n\\end{{itemize}}\n\\end{{rSection}}"
            ),
            StructuralClass::Baseline => format!(
                "%-----------CERTIFICATIONS-----------\n\\section{{Certifications}}\n  \\resumeSubHeadingListStart\n{items}\n  \\resumeSubHeadingListEnd"
            ),
        }
    })
}
