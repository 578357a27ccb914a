//! Collaborator directory and search endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use clients::{IdentityClient, ProfileClient, RegistryClient, SkillsClient};
use common::UserId;
use link_store::LinkStore;
use queries::{CollaboratorPage, CollaboratorView, PageRequest, SearchKey};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::links::AppState;

#[derive(Debug, Deserialize)]
pub struct DirectoryParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub email: Option<String>,
    pub user_id: Option<i64>,
}

/// GET /collaborators — paged directory with best-effort enrichment.
#[tracing::instrument(skip(state))]
pub async fn directory<P, S, I, R, L>(
    State(state): State<Arc<AppState<P, S, I, R, L>>>,
    Query(params): Query<DirectoryParams>,
) -> Result<Json<CollaboratorPage>, ApiError>
where
    P: ProfileClient + 'static,
    S: SkillsClient + 'static,
    I: IdentityClient + 'static,
    R: RegistryClient + 'static,
    L: LinkStore + 'static,
{
    let page = PageRequest::clamped(params.page, params.page_size);
    let result = state.queries.list_collaborators(page).await?;
    Ok(Json(result))
}

/// GET /collaborators/search?email=|user_id= — look up one collaborator.
#[tracing::instrument(skip(state))]
pub async fn search<P, S, I, R, L>(
    State(state): State<Arc<AppState<P, S, I, R, L>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<CollaboratorView>, ApiError>
where
    P: ProfileClient + 'static,
    S: SkillsClient + 'static,
    I: IdentityClient + 'static,
    R: RegistryClient + 'static,
    L: LinkStore + 'static,
{
    let key = match (params.email, params.user_id) {
        (Some(email), _) => SearchKey::Email(email),
        (None, Some(user_id)) => SearchKey::Id(UserId::new(user_id)),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "either email or user_id is required".to_string(),
            ));
        }
    };

    let view = state.queries.search_collaborator(key).await?;
    Ok(Json(view))
}
