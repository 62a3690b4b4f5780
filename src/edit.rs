use std::time::{Duration, Instant};
use thiserror::Error;

use crate::content::{
    ContentDocument, ExperienceJob, ExperienceJobPatch, PartialContent, SectionKey, WorkProject,
    WorkProjectPatch,
};
use crate::store::{ContentError, ContentSource};

/// Consecutive wrong passwords allowed before the gate locks
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// How long the gate stays locked after too many wrong passwords
pub const LOCKOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Incorrect password")]
    WrongPassword,

    #[error("No edit password is configured")]
    NotConfigured,

    #[error("Too many attempts, try again in {}s", .retry_after.as_secs().max(1))]
    LockedOut { retry_after: Duration },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Where an edit session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Anonymous,
    ReadOnly,
    Editing,
}

/// Counts wrong passwords and locks the gate for a while after too many
#[derive(Debug, Clone, Default)]
struct AttemptGate {
    failures: u32,
    locked_until: Option<Instant>,
}

impl AttemptGate {
    fn check(&mut self, now: Instant) -> Result<(), EditError> {
        if let Some(until) = self.locked_until {
            if now < until {
                return Err(EditError::LockedOut {
                    retry_after: until - now,
                });
            }
            self.locked_until = None;
            self.failures = 0;
        }
        Ok(())
    }

    fn fail(&mut self, now: Instant) {
        self.failures += 1;
        if self.failures >= MAX_FAILED_ATTEMPTS {
            log::warn!("Edit password locked after {} failed attempts", self.failures);
            self.locked_until = Some(now + LOCKOUT);
        }
    }

    fn succeed(&mut self) {
        self.failures = 0;
        self.locked_until = None;
    }
}

/// In-memory editing state for one visitor
///
/// `editing` can only be true while `authenticated` is. The working copy is
/// never written anywhere until [`EditSession::save_all`].
#[derive(Debug, Clone)]
pub struct EditSession {
    secret: Option<String>,
    credential: Option<String>,
    authenticated: bool,
    editing: bool,
    content: ContentDocument,
    hydrated: bool,
    dirty: bool,
    gate: AttemptGate,
}

impl EditSession {
    /// Create an anonymous session holding the empty document
    ///
    /// # Arguments
    /// * `secret` - The configured edit password; `None` means nobody can log in
    pub fn new(secret: Option<String>) -> Self {
        EditSession {
            secret,
            credential: None,
            authenticated: false,
            editing: false,
            content: ContentDocument::default(),
            hydrated: false,
            dirty: false,
            gate: AttemptGate::default(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mode(&self) -> EditMode {
        match (self.authenticated, self.editing) {
            (true, true) => EditMode::Editing,
            (true, false) => EditMode::ReadOnly,
            _ => EditMode::Anonymous,
        }
    }

    pub fn content(&self) -> &ContentDocument {
        &self.content
    }

    /// Check a password and, on a match, enter edit mode straight away
    pub fn authenticate(&mut self, password: &str) -> Result<(), EditError> {
        self.authenticate_at(password, Instant::now())
    }

    pub fn authenticate_at(&mut self, password: &str, now: Instant) -> Result<(), EditError> {
        self.gate.check(now)?;

        let secret = self.secret.as_deref().ok_or(EditError::NotConfigured)?;
        if secret.is_empty() || !passwords_match(password, secret) {
            self.gate.fail(now);
            return Err(EditError::WrongPassword);
        }

        self.gate.succeed();
        self.authenticated = true;
        self.editing = true;
        self.credential = Some(password.to_string());
        log::info!("Edit session authenticated");
        Ok(())
    }

    /// Flip between read-only and editing; ignored while anonymous
    pub fn toggle_editing(&mut self) {
        if self.authenticated {
            self.editing = !self.editing;
        }
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.editing = false;
        self.credential = None;
    }

    /// Merge a fetched document into the working copy
    ///
    /// Only the first hydration of a session applies, and never after a local
    /// edit. Returns whether the content was taken.
    pub fn hydrate(&mut self, partial: PartialContent) -> bool {
        if self.hydrated || self.dirty {
            return false;
        }
        self.content.overlay(partial);
        self.hydrated = true;
        true
    }

    /// Fetch from `source` and hydrate
    pub async fn load(&mut self, source: &dyn ContentSource) -> Result<bool, ContentError> {
        let partial = source.fetch().await?;
        Ok(self.hydrate(partial))
    }

    /// Start over as a freshly loaded page would: anonymous, unhydrated,
    /// then load from `source`
    pub async fn reload(&mut self, source: &dyn ContentSource) -> Result<(), ContentError> {
        let secret = self.secret.take();
        let gate = std::mem::take(&mut self.gate);
        *self = EditSession::new(secret);
        self.gate = gate;
        self.load(source).await?;
        Ok(())
    }

    /// Publish the entire working copy, then reload
    pub async fn save_all(&mut self, source: &dyn ContentSource) -> Result<(), EditError> {
        if !self.authenticated {
            return Err(EditError::NotAuthenticated);
        }
        source
            .publish(&self.content, self.credential.as_deref())
            .await?;
        log::info!("Saved all content");
        self.reload(source).await?;
        Ok(())
    }

    /// Leave edit mode entirely and throw away unsaved changes
    pub async fn cancel(&mut self, source: &dyn ContentSource) -> Result<(), ContentError> {
        self.logout();
        self.reload(source).await
    }

    fn mutate(&mut self, f: impl FnOnce(&mut ContentDocument) -> bool) -> bool {
        if !self.editing {
            return false;
        }
        let changed = f(&mut self.content);
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn set_field(&mut self, key: SectionKey, value: impl Into<String>) -> bool {
        let value = value.into();
        self.mutate(|doc| {
            *doc.field_mut(key) = value;
            true
        })
    }

    pub fn add_skill(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        self.mutate(|doc| {
            doc.skills.push(skill);
            true
        })
    }

    pub fn update_skill(&mut self, index: usize, value: impl Into<String>) -> bool {
        let value = value.into();
        self.mutate(|doc| match doc.skills.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        })
    }

    pub fn remove_skill(&mut self, index: usize) -> bool {
        self.mutate(|doc| remove_at(&mut doc.skills, index))
    }

    pub fn add_work_project(&mut self, project: WorkProject) -> bool {
        self.mutate(|doc| {
            doc.work_projects.push(project);
            true
        })
    }

    pub fn update_work_project(&mut self, index: usize, patch: WorkProjectPatch) -> bool {
        self.mutate(|doc| match doc.work_projects.get_mut(index) {
            Some(project) => {
                project.apply(patch);
                true
            }
            None => false,
        })
    }

    pub fn remove_work_project(&mut self, index: usize) -> bool {
        self.mutate(|doc| remove_at(&mut doc.work_projects, index))
    }

    pub fn add_experience_job(&mut self, job: ExperienceJob) -> bool {
        self.mutate(|doc| {
            doc.experience_jobs.push(job);
            true
        })
    }

    pub fn update_experience_job(&mut self, index: usize, patch: ExperienceJobPatch) -> bool {
        self.mutate(|doc| match doc.experience_jobs.get_mut(index) {
            Some(job) => {
                job.apply(patch);
                true
            }
            None => false,
        })
    }

    pub fn remove_experience_job(&mut self, index: usize) -> bool {
        self.mutate(|doc| remove_at(&mut doc.experience_jobs, index))
    }
}

/// Compare a supplied password with the expected one
///
/// Runs over every byte of `expected` whatever the input, so timing does not
/// reveal how long a matching prefix was.
pub fn passwords_match(supplied: &str, expected: &str) -> bool {
    let supplied = supplied.as_bytes();
    let expected = expected.as_bytes();

    let mut diff = supplied.len() ^ expected.len();
    for (i, &byte) in expected.iter().enumerate() {
        let other = supplied.get(i).copied().unwrap_or(0);
        diff |= (byte ^ other) as usize;
    }
    diff == 0
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        false
    }
}
