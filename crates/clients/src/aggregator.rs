//! Collaborator data aggregator.

use common::{SkillSnapshot, UserId};

use crate::error::Result;
use crate::profile::{ProfileClient, ProfileSummary};
use crate::skills::{SkillEntry, SkillsClient};

/// Profile and skill data gathered for one collaborator.
#[derive(Debug, Clone)]
pub struct CollaboratorData {
    pub profile: ProfileSummary,
    pub skills: Vec<SkillEntry>,
}

impl CollaboratorData {
    /// The skill recorded when linking this collaborator to a project.
    ///
    /// Policy: exactly the first entry in the order the skills service
    /// returned, or the fallback snapshot when the list is empty. The
    /// ordering is the skills service's contract and is not re-sorted
    /// here.
    pub fn skill_snapshot(&self) -> SkillSnapshot {
        self.skills
            .first()
            .map(|s| SkillSnapshot::new(s.name.clone(), s.proficiency.clone()))
            .unwrap_or_else(SkillSnapshot::fallback)
    }
}

/// Gathers a collaborator's profile and skills from their owning services.
///
/// Pure read; both sub-fetches report their own not-found conditions
/// distinctly and transport failures separately from those.
#[derive(Clone)]
pub struct CollaboratorAggregator<P, S> {
    profile: P,
    skills: S,
}

impl<P, S> CollaboratorAggregator<P, S>
where
    P: ProfileClient,
    S: SkillsClient,
{
    /// Creates an aggregator over the two read services.
    pub fn new(profile: P, skills: S) -> Self {
        Self { profile, skills }
    }

    /// Fetches profile and skills for the user.
    pub async fn fetch_collaborator(&self, user_id: UserId) -> Result<CollaboratorData> {
        let profile = self.profile.fetch_profile(user_id).await?;
        let skills = self.skills.fetch_skills(user_id).await?;
        Ok(CollaboratorData { profile, skills })
    }
}
