use chrono::{DateTime, Utc};
use clients::SkillEntry;
use common::{ProjectId, UserId};
use serde::Serialize;

/// Largest allowed directory page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A link row for a user, decorated with the project's display title.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedLink {
    pub link_id: i64,
    pub project_id: ProjectId,
    pub project_title: String,
    pub skill_name: String,
    pub skill_level: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate view of one collaborator across the read services.
///
/// `full_name`, `availability`, and `skills` are `None` when the owning
/// service could not be reached or had no data; the entry itself is
/// still returned.
#[derive(Debug, Clone, Serialize)]
pub struct CollaboratorView {
    pub user_id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub availability: Option<String>,
    pub skills: Option<Vec<SkillEntry>>,
}

/// One page of the collaborator directory.
#[derive(Debug, Clone, Serialize)]
pub struct CollaboratorPage {
    pub page: u32,
    pub page_size: u32,
    pub collaborators: Vec<CollaboratorView>,
}

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Clamps raw pagination input into the safe range: page >= 1,
    /// page size in 1..=[`MAX_PAGE_SIZE`], defaulting to
    /// [`DEFAULT_PAGE_SIZE`] when absent.
    pub fn clamped(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// Key used to look up a single collaborator.
#[derive(Debug, Clone)]
pub enum SearchKey {
    Id(UserId),
    Email(String),
}

/// Placeholder title used when the registry lookup fails.
pub(crate) fn placeholder_title(project_id: ProjectId) -> String {
    format!("Project {project_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let page = PageRequest::clamped(None, None);
        assert_eq!(page, PageRequest { page: 1, page_size: DEFAULT_PAGE_SIZE });
    }

    #[test]
    fn pagination_clamps_to_safe_range() {
        let page = PageRequest::clamped(Some(0), Some(0));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);

        let page = PageRequest::clamped(Some(3), Some(5000));
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn placeholder_title_includes_id() {
        assert_eq!(placeholder_title(ProjectId::new(42)), "Project 42");
    }
}
