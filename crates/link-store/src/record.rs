use chrono::{DateTime, Utc};
use common::{ProjectId, SkillSnapshot, UserId};
use serde::{Deserialize, Serialize};

/// A confirmed link between a collaborator and a project.
///
/// The skill fields are a snapshot taken at link time and are never
/// synchronized with later skill changes. Records are created and
/// deleted, never updated; relinking after an unlink produces a new row
/// with a fresh id, timestamp, and snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: i64,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub skill_name: String,
    pub skill_level: String,
    pub created_at: DateTime<Utc>,
}

impl LinkRecord {
    /// Returns the skill snapshot stored on this record.
    pub fn skill(&self) -> SkillSnapshot {
        SkillSnapshot::new(self.skill_name.clone(), self.skill_level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serialization_roundtrip() {
        let record = LinkRecord {
            id: 1,
            project_id: ProjectId::new(101),
            user_id: UserId::new(7),
            skill_name: "Go".to_string(),
            skill_level: "advanced".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: LinkRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn skill_accessor() {
        let record = LinkRecord {
            id: 1,
            project_id: ProjectId::new(101),
            user_id: UserId::new(7),
            skill_name: "Go".to_string(),
            skill_level: "advanced".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(record.skill(), SkillSnapshot::new("Go", "advanced"));
    }
}
