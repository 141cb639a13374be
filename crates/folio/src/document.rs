//! The portfolio document model.
//!
//! This module defines the single aggregate that holds all portfolio
//! content, mirroring the JSON shape of `portfolio.json`. Every struct
//! tolerates missing fields on deserialization so that hand-edited or
//! partially-migrated documents still import.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The bundled default document, embedded at build time.
const BUNDLED_JSON: &str = include_str!("../assets/portfolio.json");

/// The single aggregate holding all portfolio content.
///
/// Exactly one `PortfolioDocument` is live in memory per process; it is
/// replaced wholesale through [`crate::store::DocumentStore::write`], never
/// mutated in place by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioDocument {
    /// Hero/profile section.
    pub profile: Profile,
    /// About section.
    pub about: About,
    /// Skill categories, in display order.
    pub skills: Vec<SkillCategory>,
    /// Certifications, in display order.
    pub certifications: Vec<Certification>,
    /// Education entries, in display order.
    pub education: Vec<EducationEntry>,
    /// Experience entries, in display order.
    pub experience: Vec<ExperienceEntry>,
    /// Projects, in display order.
    pub projects: Vec<Project>,
    /// Contact details.
    pub contact: Contact,
}

/// Profile/hero section content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Headline title.
    pub title: String,
    /// Short introduction paragraph.
    pub description: String,
    /// One-line education summary.
    pub education: String,
    /// Profile image reference.
    pub image: String,
    /// Social links.
    pub social: SocialLinks,
    /// Phrases cycled by the typing animation, in order.
    pub typing_words: Vec<String>,
}

/// Social link set for the profile section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    /// GitHub profile URL.
    pub github: String,
    /// LinkedIn profile URL.
    pub linkedin: String,
    /// Email link (usually a `mailto:` URL).
    pub email: String,
    /// CV download link.
    pub cv: String,
}

/// About section content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    /// Section title.
    pub title: String,
    /// Section subtitle.
    pub subtitle: String,
    /// Body text.
    pub description: String,
    /// Section image reference.
    pub image: String,
}

/// A category of skills (e.g. "Languages", "Backend").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillCategory {
    /// Identifier, unique within `skills`.
    pub id: i64,
    /// Icon name.
    pub icon: String,
    /// Optional icon image URL (overrides `icon` when set).
    pub icon_url: String,
    /// Category title.
    pub title: String,
    /// Skill names in this category, in display order.
    pub skills: Vec<String>,
}

/// A certification entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
    /// Identifier, unique within `certifications`.
    pub id: i64,
    /// Icon name.
    pub icon: String,
    /// Provider logo reference.
    pub logo: String,
    /// Fallback logo reference.
    pub logo_fallback: String,
    /// Credential identifier issued by the provider.
    pub credential_id: String,
    /// Certification title.
    pub title: String,
    /// Issuing provider.
    pub provider: String,
    /// Issue date (free-form, e.g. "2023-06").
    pub date: String,
    /// Skills covered by this certification.
    pub skills: Vec<String>,
}

/// An education history entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    /// Identifier, unique within `education`.
    pub id: i64,
    /// Institution name.
    pub institution: String,
    /// Degree or programme description.
    pub degree: String,
    /// Attendance period (free-form, e.g. "2019 - 2023").
    pub period: String,
    /// Institution logo reference.
    pub logo: String,
}

/// A work experience entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    /// Identifier, unique within `experience`.
    pub id: i64,
    /// Role title.
    pub title: String,
    /// Company name.
    pub company: String,
    /// Employment duration (free-form).
    pub duration: String,
    /// Role description.
    pub description: String,
    /// Icon name.
    pub icon: String,
    /// Company logo reference.
    pub logo: String,
}

/// A portfolio project.
///
/// The `id` doubles as a routing key (parsed back from a URL fragment),
/// so it must stay numeric-comparable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    /// Identifier, unique within `projects`; used as a lookup/route key.
    pub id: i64,
    /// Category tag (e.g. "web", "mobile").
    pub category: String,
    /// Human-readable category label.
    pub category_label: String,
    /// Project title.
    pub title: String,
    /// Project description.
    pub description: String,
    /// Cover image reference.
    pub image: String,
    /// Technologies used, in display order.
    pub tech: Vec<String>,
    /// Source repository URL.
    pub github: String,
    /// Live deployment URL.
    pub live: String,
    /// Optional demo video URL.
    pub video: Option<String>,
    /// Project date (free-form, e.g. "2024-01").
    pub date: String,
}

/// Contact section content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Location string.
    pub location: String,
}

impl PortfolioDocument {
    /// Parse the bundled default document.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded asset is not valid JSON, which
    /// indicates a packaging defect.
    pub fn bundled() -> crate::error::Result<Self> {
        Ok(serde_json::from_str(BUNDLED_JSON)?)
    }

    /// Look up a project by its numeric id.
    #[must_use]
    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Generate a fresh entry id for the given array.
    ///
    /// Ids are the current unix time in milliseconds, bumped past the
    /// largest existing id so that rapid successive additions never
    /// collide within one array.
    #[must_use]
    pub fn fresh_id(existing: impl IntoIterator<Item = i64>) -> i64 {
        let candidate = Utc::now().timestamp_millis();
        match existing.into_iter().max() {
            Some(max) if max >= candidate => max + 1,
            _ => candidate,
        }
    }
}
