use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// An explicit `null` reads the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single entry of the projects section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkProject {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub featured: bool,
}

/// A single entry of the experience section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceJob {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

/// All editable copy of the site
///
/// The document is always total: every field has an empty default, so a stored
/// file that is missing keys (or an older file written before a key existed)
/// still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDocument {
    pub about: String,
    pub experience: String,
    pub work: String,
    pub contact: String,
    pub hero_greeting: String,
    pub hero_name: String,
    pub hero_subtitle: String,
    pub hero_description: String,
    #[serde(rename = "howIStarted")]
    pub how_i_started: String,
    pub my_goals: String,
    pub my_motivations: String,
    pub future_vision: String,
    pub skills: Vec<String>,
    pub work_projects: Vec<WorkProject>,
    pub experience_jobs: Vec<ExperienceJob>,
}

/// A document where every field may be missing
///
/// `None` means "not provided" and covers both an absent key and an explicit
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_greeting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_description: Option<String>,
    #[serde(rename = "howIStarted", skip_serializing_if = "Option::is_none")]
    pub how_i_started: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_motivations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future_vision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_projects: Option<Vec<WorkProject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_jobs: Option<Vec<ExperienceJob>>,
}

/// Keys of the scalar text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    About,
    Experience,
    Work,
    Contact,
    HeroGreeting,
    HeroName,
    HeroSubtitle,
    HeroDescription,
    HowIStarted,
    MyGoals,
    MyMotivations,
    FutureVision,
}

impl SectionKey {
    pub const ALL: [SectionKey; 12] = [
        SectionKey::About,
        SectionKey::Experience,
        SectionKey::Work,
        SectionKey::Contact,
        SectionKey::HeroGreeting,
        SectionKey::HeroName,
        SectionKey::HeroSubtitle,
        SectionKey::HeroDescription,
        SectionKey::HowIStarted,
        SectionKey::MyGoals,
        SectionKey::MyMotivations,
        SectionKey::FutureVision,
    ];

    /// The JSON key used in the stored document
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::About => "about",
            SectionKey::Experience => "experience",
            SectionKey::Work => "work",
            SectionKey::Contact => "contact",
            SectionKey::HeroGreeting => "heroGreeting",
            SectionKey::HeroName => "heroName",
            SectionKey::HeroSubtitle => "heroSubtitle",
            SectionKey::HeroDescription => "heroDescription",
            SectionKey::HowIStarted => "howIStarted",
            SectionKey::MyGoals => "myGoals",
            SectionKey::MyMotivations => "myMotivations",
            SectionKey::FutureVision => "futureVision",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown section key: {}", s))
    }
}

/// Partial update of a [`WorkProject`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub github: Option<String>,
    pub live: Option<String>,
    pub featured: Option<bool>,
}

impl WorkProject {
    pub fn apply(&mut self, patch: WorkProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(technologies) = patch.technologies {
            self.technologies = technologies;
        }
        if patch.github.is_some() {
            self.github = patch.github;
        }
        if patch.live.is_some() {
            self.live = patch.live;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
    }
}

/// Partial update of an [`ExperienceJob`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceJobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub period: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
}

impl ExperienceJob {
    pub fn apply(&mut self, patch: ExperienceJobPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(technologies) = patch.technologies {
            self.technologies = technologies;
        }
    }
}

impl ContentDocument {
    /// Build a full document: defaults first, then every provided field
    pub fn from_partial(partial: PartialContent) -> Self {
        let mut doc = ContentDocument::default();
        doc.overlay(partial);
        doc
    }

    /// Replace exactly the fields present in `partial`
    pub fn overlay(&mut self, partial: PartialContent) {
        fn put<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        put(&mut self.about, partial.about);
        put(&mut self.experience, partial.experience);
        put(&mut self.work, partial.work);
        put(&mut self.contact, partial.contact);
        put(&mut self.hero_greeting, partial.hero_greeting);
        put(&mut self.hero_name, partial.hero_name);
        put(&mut self.hero_subtitle, partial.hero_subtitle);
        put(&mut self.hero_description, partial.hero_description);
        put(&mut self.how_i_started, partial.how_i_started);
        put(&mut self.my_goals, partial.my_goals);
        put(&mut self.my_motivations, partial.my_motivations);
        put(&mut self.future_vision, partial.future_vision);
        put(&mut self.skills, partial.skills);
        put(&mut self.work_projects, partial.work_projects);
        put(&mut self.experience_jobs, partial.experience_jobs);
    }

    pub fn field(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::About => &self.about,
            SectionKey::Experience => &self.experience,
            SectionKey::Work => &self.work,
            SectionKey::Contact => &self.contact,
            SectionKey::HeroGreeting => &self.hero_greeting,
            SectionKey::HeroName => &self.hero_name,
            SectionKey::HeroSubtitle => &self.hero_subtitle,
            SectionKey::HeroDescription => &self.hero_description,
            SectionKey::HowIStarted => &self.how_i_started,
            SectionKey::MyGoals => &self.my_goals,
            SectionKey::MyMotivations => &self.my_motivations,
            SectionKey::FutureVision => &self.future_vision,
        }
    }

    pub fn field_mut(&mut self, key: SectionKey) -> &mut String {
        match key {
            SectionKey::About => &mut self.about,
            SectionKey::Experience => &mut self.experience,
            SectionKey::Work => &mut self.work,
            SectionKey::Contact => &mut self.contact,
            SectionKey::HeroGreeting => &mut self.hero_greeting,
            SectionKey::HeroName => &mut self.hero_name,
            SectionKey::HeroSubtitle => &mut self.hero_subtitle,
            SectionKey::HeroDescription => &mut self.hero_description,
            SectionKey::HowIStarted => &mut self.how_i_started,
            SectionKey::MyGoals => &mut self.my_goals,
            SectionKey::MyMotivations => &mut self.my_motivations,
            SectionKey::FutureVision => &mut self.future_vision,
        }
    }
}

impl From<ContentDocument> for PartialContent {
    fn from(doc: ContentDocument) -> Self {
        PartialContent {
            about: Some(doc.about),
            experience: Some(doc.experience),
            work: Some(doc.work),
            contact: Some(doc.contact),
            hero_greeting: Some(doc.hero_greeting),
            hero_name: Some(doc.hero_name),
            hero_subtitle: Some(doc.hero_subtitle),
            hero_description: Some(doc.hero_description),
            how_i_started: Some(doc.how_i_started),
            my_goals: Some(doc.my_goals),
            my_motivations: Some(doc.my_motivations),
            future_vision: Some(doc.future_vision),
            skills: Some(doc.skills),
            work_projects: Some(doc.work_projects),
            experience_jobs: Some(doc.experience_jobs),
        }
    }
}
