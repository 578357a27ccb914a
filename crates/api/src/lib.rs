//! HTTP API server with observability for the collaborator linking service.
//!
//! Exposes the linking saga and the read-side queries over REST, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use clients::{
    HttpIdentityClient, HttpProfileClient, HttpRegistryClient, HttpSkillsClient,
    IdentityClient, InMemoryIdentityClient, InMemoryProfileClient, InMemoryRegistryClient,
    InMemorySkillsClient, ProfileClient, RegistryClient, SkillsClient,
};
use link_store::{InMemoryLinkStore, LinkStore};
use metrics_exporter_prometheus::PrometheusHandle;
use queries::QueryService;
use saga::LinkCoordinator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::links::AppState;

/// Application state wired to the real HTTP clients.
pub type HttpAppState<L> =
    AppState<HttpProfileClient, HttpSkillsClient, HttpIdentityClient, HttpRegistryClient, L>;

/// Application state wired entirely to in-memory doubles.
pub type InMemoryAppState = AppState<
    InMemoryProfileClient,
    InMemorySkillsClient,
    InMemoryIdentityClient,
    InMemoryRegistryClient,
    InMemoryLinkStore,
>;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<P, S, I, R, L>(
    state: Arc<AppState<P, S, I, R, L>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    P: ProfileClient + 'static,
    S: SkillsClient + 'static,
    I: IdentityClient + 'static,
    R: RegistryClient + 'static,
    L: LinkStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route(
            "/projects/{project_id}/collaborators/{user_id}",
            post(routes::links::link::<P, S, I, R, L>)
                .delete(routes::links::unlink::<P, S, I, R, L>),
        )
        .route(
            "/projects/{project_id}/collaborators",
            get(routes::links::project_collaborators::<P, S, I, R, L>),
        )
        .route(
            "/collaborators/{user_id}/projects",
            get(routes::links::user_projects::<P, S, I, R, L>),
        )
        .route(
            "/collaborators",
            get(routes::collaborators::directory::<P, S, I, R, L>),
        )
        .route(
            "/collaborators/search",
            get(routes::collaborators::search::<P, S, I, R, L>),
        )
        .route(
            "/links/metrics",
            get(routes::links::link_metrics::<P, S, I, R, L>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state backed by the real HTTP clients, with
/// base URLs taken from the configuration.
pub fn create_http_state<L>(config: &Config, store: L) -> Arc<HttpAppState<L>>
where
    L: LinkStore + Clone + 'static,
{
    let http = reqwest::Client::new();

    let profile = HttpProfileClient::new(http.clone(), config.profile_service_url.clone());
    let skills = HttpSkillsClient::new(http.clone(), config.skills_service_url.clone());
    let identity = HttpIdentityClient::new(http.clone(), config.identity_service_url.clone());
    let registry = HttpRegistryClient::new(http, config.registry_url.clone());

    let coordinator = LinkCoordinator::new(
        profile.clone(),
        skills.clone(),
        identity.clone(),
        registry.clone(),
        store.clone(),
    );
    let queries = QueryService::new(profile, skills, identity, registry, store);

    Arc::new(AppState {
        coordinator,
        queries,
    })
}

/// Handles to the in-memory doubles behind [`create_in_memory_state`],
/// used by tests to seed data and inject failures.
pub struct InMemoryServices {
    pub profile: InMemoryProfileClient,
    pub skills: InMemorySkillsClient,
    pub identity: InMemoryIdentityClient,
    pub registry: InMemoryRegistryClient,
    pub store: InMemoryLinkStore,
}

/// Creates application state wired entirely to in-memory doubles.
pub fn create_in_memory_state() -> (Arc<InMemoryAppState>, InMemoryServices) {
    let services = InMemoryServices {
        profile: InMemoryProfileClient::new(),
        skills: InMemorySkillsClient::new(),
        identity: InMemoryIdentityClient::new(),
        registry: InMemoryRegistryClient::new(),
        store: InMemoryLinkStore::new(),
    };

    let coordinator = LinkCoordinator::new(
        services.profile.clone(),
        services.skills.clone(),
        services.identity.clone(),
        services.registry.clone(),
        services.store.clone(),
    );
    let queries = QueryService::new(
        services.profile.clone(),
        services.skills.clone(),
        services.identity.clone(),
        services.registry.clone(),
        services.store.clone(),
    );

    let state = Arc::new(AppState {
        coordinator,
        queries,
    });

    (state, services)
}
