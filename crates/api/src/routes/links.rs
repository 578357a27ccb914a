//! Linking saga and link listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use clients::{IdentityClient, ProfileClient, RegistryClient, SkillsClient};
use common::{ProjectId, UserId};
use link_store::{LinkMetrics, LinkRecord, LinkStore};
use queries::{EnrichedLink, QueryService};
use saga::LinkCoordinator;
use serde::Serialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<P, S, I, R, L>
where
    P: ProfileClient,
    S: SkillsClient,
    I: IdentityClient,
    R: RegistryClient,
    L: LinkStore,
{
    pub coordinator: LinkCoordinator<P, S, I, R, L>,
    pub queries: QueryService<P, S, I, R, L>,
}

// -- Response types --

#[derive(Serialize)]
pub struct LinkedResponse {
    pub message: &'static str,
    pub link_id: i64,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub skill_name: String,
    pub skill_level: String,
}

#[derive(Serialize)]
pub struct UnlinkedResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ProjectCollaboratorsResponse {
    pub project_id: ProjectId,
    pub collaborators: Vec<LinkRecord>,
}

#[derive(Serialize)]
pub struct UserProjectsResponse {
    pub user_id: UserId,
    pub projects: Vec<EnrichedLink>,
}

// -- Handlers --

/// POST /projects/:project_id/collaborators/:user_id — run the linking saga.
#[tracing::instrument(skip(state))]
pub async fn link<P, S, I, R, L>(
    State(state): State<Arc<AppState<P, S, I, R, L>>>,
    Path((project_id, user_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<LinkedResponse>), ApiError>
where
    P: ProfileClient + 'static,
    S: SkillsClient + 'static,
    I: IdentityClient + 'static,
    R: RegistryClient + 'static,
    L: LinkStore + 'static,
{
    let result = state
        .coordinator
        .link(ProjectId::new(project_id), UserId::new(user_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkedResponse {
            message: "collaborator linked",
            link_id: result.link_id,
            project_id: result.project_id,
            user_id: result.user_id,
            skill_name: result.skill_name,
            skill_level: result.skill_level,
        }),
    ))
}

/// DELETE /projects/:project_id/collaborators/:user_id — remove the local link.
#[tracing::instrument(skip(state))]
pub async fn unlink<P, S, I, R, L>(
    State(state): State<Arc<AppState<P, S, I, R, L>>>,
    Path((project_id, user_id)): Path<(i64, i64)>,
) -> Result<Json<UnlinkedResponse>, ApiError>
where
    P: ProfileClient + 'static,
    S: SkillsClient + 'static,
    I: IdentityClient + 'static,
    R: RegistryClient + 'static,
    L: LinkStore + 'static,
{
    state
        .coordinator
        .unlink(ProjectId::new(project_id), UserId::new(user_id))
        .await?;

    Ok(Json(UnlinkedResponse {
        message: "collaborator unlinked",
    }))
}

/// GET /projects/:project_id/collaborators — list a project's links.
#[tracing::instrument(skip(state))]
pub async fn project_collaborators<P, S, I, R, L>(
    State(state): State<Arc<AppState<P, S, I, R, L>>>,
    Path(project_id): Path<i64>,
) -> Result<Json<ProjectCollaboratorsResponse>, ApiError>
where
    P: ProfileClient + 'static,
    S: SkillsClient + 'static,
    I: IdentityClient + 'static,
    R: RegistryClient + 'static,
    L: LinkStore + 'static,
{
    let project_id = ProjectId::new(project_id);
    let collaborators = state.queries.list_project_collaborators(project_id).await?;

    Ok(Json(ProjectCollaboratorsResponse {
        project_id,
        collaborators,
    }))
}

/// GET /collaborators/:user_id/projects — list a user's projects with titles.
#[tracing::instrument(skip(state))]
pub async fn user_projects<P, S, I, R, L>(
    State(state): State<Arc<AppState<P, S, I, R, L>>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserProjectsResponse>, ApiError>
where
    P: ProfileClient + 'static,
    S: SkillsClient + 'static,
    I: IdentityClient + 'static,
    R: RegistryClient + 'static,
    L: LinkStore + 'static,
{
    let user_id = UserId::new(user_id);
    let projects = state.queries.list_user_projects(user_id).await?;

    Ok(Json(UserProjectsResponse { user_id, projects }))
}

/// GET /links/metrics — aggregate counts over the link mirror.
#[tracing::instrument(skip(state))]
pub async fn link_metrics<P, S, I, R, L>(
    State(state): State<Arc<AppState<P, S, I, R, L>>>,
) -> Result<Json<LinkMetrics>, ApiError>
where
    P: ProfileClient + 'static,
    S: SkillsClient + 'static,
    I: IdentityClient + 'static,
    R: RegistryClient + 'static,
    L: LinkStore + 'static,
{
    let metrics = state.queries.link_metrics().await?;
    Ok(Json(metrics))
}
