//! Dialect registry: template id → skeleton, structural class, assets.
//!
//! The registry is built once at startup and shared read-only across
//! renders. Skeletons and class files ship embedded in the binary; an
//! optional override directory can replace any of them by file name.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::render::substitute::placeholder_names;
use crate::render::RenderError;

/// Template used when a request names none.
pub const DEFAULT_TEMPLATE: &str = "professional";

/// Templates that compile against a document class shipped alongside the source.
const CLASS_BASED_TEMPLATES: &[&str] = &["faangpath", "business_insider"];
/// The class-based template that follows the two-column CV grammar.
const ALTERNATE_STYLE_TEMPLATE: &str = "business_insider";

/// Which rendering branch every section renderer takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StructuralClass {
    Baseline,
    ClassBased,
    AlternateStyle,
}

const COMMON_PLACEHOLDERS: &[&str] = &[
    "NAME",
    "EMAIL",
    "PHONE",
    "LOCATION",
    "SUMMARY",
    "SKILLS",
    "EXPERIENCE",
    "EDUCATION",
];

impl StructuralClass {
    /// Resolves the class from identifier membership in the fixed sets.
    pub fn of(template_id: &str) -> Self {
        if template_id == ALTERNATE_STYLE_TEMPLATE {
            StructuralClass::AlternateStyle
        } else if CLASS_BASED_TEMPLATES.contains(&template_id) {
            StructuralClass::ClassBased
        } else {
            StructuralClass::Baseline
        }
    }

    /// Placeholders specific to this class, on top of the common set.
    fn own_placeholders(self) -> &'static [&'static str] {
        match self {
            StructuralClass::Baseline => &[
                "LINKEDIN_SECTION",
                "GITHUB_SECTION",
                "PORTFOLIO_SECTION",
                "PROJECTS_SECTION",
                "CERTIFICATIONS_SECTION",
            ],
            StructuralClass::ClassBased => &[
                "LINKEDIN",
                "GITHUB",
                "PORTFOLIO",
                "PROJECTS",
                "CERTIFICATIONS_SECTION",
            ],
            StructuralClass::AlternateStyle => {
                &["TAGLINE", "LINKEDIN", "GITHUB", "PROJECTS", "CERTIFICATIONS"]
            }
        }
    }

    /// Every placeholder the section renderers produce for this class.
    pub fn placeholders(self) -> impl Iterator<Item = &'static str> {
        COMMON_PLACEHOLDERS
            .iter()
            .chain(self.own_placeholders())
            .copied()
    }
}

/// A static file the compiler needs next to the generated source.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub contents: Arc<str>,
}

/// Per-template configuration, read-only for the duration of a render.
#[derive(Debug, Clone)]
pub struct DialectProfile {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub skeleton_source: String,
    pub structural_class: StructuralClass,
    pub assets: Vec<Asset>,
}

impl DialectProfile {
    pub fn asset_names(&self) -> Vec<String> {
        self.assets.iter().map(|a| a.name.clone()).collect()
    }
}

struct BuiltinDialect {
    id: &'static str,
    display_name: &'static str,
    description: &'static str,
    skeleton: &'static str,
    assets: &'static [&'static str],
}

const BUILTIN_DIALECTS: &[BuiltinDialect] = &[
    BuiltinDialect {
        id: "professional",
        display_name: "Professional",
        description: "Classic single-column layout with ruled section headings.",
        skeleton: include_str!("../../templates/professional.tex"),
        assets: &[],
    },
    BuiltinDialect {
        id: "faangpath",
        display_name: "Faangpath Style",
        description: "Optimized for Big Tech applications with a sharp header.",
        skeleton: include_str!("../../templates/faangpath.tex"),
        assets: &["resume.cls"],
    },
    BuiltinDialect {
        id: "business_insider",
        display_name: "Business Insider",
        description: "Modern layout preferred by top management firms.",
        skeleton: include_str!("../../templates/business_insider.tex"),
        assets: &["resume.cls", "altacv.cls"],
    },
];

const BUILTIN_ASSETS: &[(&str, &str)] = &[
    ("resume.cls", include_str!("../../templates/resume.cls")),
    ("altacv.cls", include_str!("../../templates/altacv.cls")),
];

/// Registered dialects keyed by template id.
#[derive(Debug, Clone)]
pub struct DialectRegistry {
    dialects: BTreeMap<String, DialectProfile>,
}

impl DialectRegistry {
    /// Registry over the embedded skeletons and class files.
    pub fn builtin() -> Result<Self, RenderError> {
        Self::assemble(|_| Ok(None))
    }

    /// Builtin registry with any `<id>.tex` or asset file found in
    /// `templates_dir` taking precedence over the embedded copy.
    pub fn load(templates_dir: Option<&Path>) -> Result<Self> {
        let Some(dir) = templates_dir else {
            return Ok(Self::builtin()?);
        };

        let registry = Self::assemble::<_, anyhow::Error>(|file_name| {
            let path = dir.join(file_name);
            if !path.is_file() {
                return Ok(None);
            }
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template file {}", path.display()))?;
            info!("Template override loaded: {}", path.display());
            Ok(Some(contents))
        })?;
        Ok(registry)
    }

    /// Builds every builtin dialect, asking `read_override` for a
    /// replacement of each file first, then validates the result.
    fn assemble<F, E>(mut read_override: F) -> Result<Self, E>
    where
        F: FnMut(&str) -> Result<Option<String>, E>,
        E: From<RenderError>,
    {
        let mut assets: BTreeMap<&str, Arc<str>> = BTreeMap::new();
        for &(name, contents) in BUILTIN_ASSETS {
            let contents = read_override(name)?.unwrap_or_else(|| contents.to_string());
            assets.insert(name, Arc::from(contents));
        }

        let mut dialects = BTreeMap::new();
        for builtin in BUILTIN_DIALECTS {
            let skeleton_source = read_override(&format!("{}.tex", builtin.id))?
                .unwrap_or_else(|| builtin.skeleton.to_string());
            let profile = DialectProfile {
                id: builtin.id.to_string(),
                display_name: builtin.display_name.to_string(),
                description: builtin.description.to_string(),
                skeleton_source,
                structural_class: StructuralClass::of(builtin.id),
                assets: builtin
                    .assets
                    .iter()
                    .map(|name| Asset {
                        name: name.to_string(),
                        contents: Arc::clone(&assets[name]),
                    })
                    .collect(),
            };
            check_consistency(&profile)?;
            dialects.insert(profile.id.clone(), profile);
        }

        Ok(Self { dialects })
    }

    /// Looks up a template id. Unregistered ids fail closed.
    pub fn resolve(&self, template_id: &str) -> Result<&DialectProfile, RenderError> {
        self.dialects
            .get(template_id)
            .ok_or_else(|| RenderError::UnknownTemplate(template_id.to_string()))
    }

    pub fn profiles(&self) -> impl Iterator<Item = &DialectProfile> {
        self.dialects.values()
    }
}

/// The skeleton must reference exactly the placeholders its class produces.
pub fn check_consistency(profile: &DialectProfile) -> Result<(), RenderError> {
    let referenced = placeholder_names(&profile.skeleton_source);
    let produced: BTreeSet<String> = profile
        .structural_class
        .placeholders()
        .map(str::to_string)
        .collect();

    let unresolved: Vec<String> = referenced.difference(&produced).cloned().collect();
    let unused: Vec<String> = produced.difference(&referenced).cloned().collect();

    if unresolved.is_empty() && unused.is_empty() {
        Ok(())
    } else {
        Err(RenderError::TemplateConsistency {
            template: profile.id.clone(),
            unresolved,
            unused,
        })
    }
}
