//! HTTP transport for MCP server.
//!
//! JSON-RPC over `POST {mcp.path}`, guarded by the bearer middleware, plus the
//! unauthenticated plumbing routes an OAuth-capable MCP client expects.

use crate::error::McpError;
use crate::middleware::require_bearer;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, error_codes};
use crate::server::McpServer;
use axum::{
    Json, Router,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use memgate_auth::{CredentialContext, TokenVerifier};
use memgate_core::{IdentityConfig, McpConfig};
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Well-known path of the OAuth authorization server metadata.
pub const DISCOVERY_PATH: &str = "/.well-known/oauth-authorization-server";

/// HTTP transport handler state.
pub struct HttpTransportState {
    server: Arc<McpServer>,
    verifier: Arc<TokenVerifier>,
    discovery: Value,
    landing_url: Option<String>,
}

impl HttpTransportState {
    /// Create a new HTTP transport state.
    pub fn new(
        server: Arc<McpServer>,
        verifier: Arc<TokenVerifier>,
        identity: &IdentityConfig,
        mcp: &McpConfig,
    ) -> Self {
        Self {
            server,
            verifier,
            discovery: discovery_document(identity),
            landing_url: mcp
                .landing_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
        }
    }

    /// The token verifier used by the bearer middleware.
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }
}

/// OAuth authorization server metadata pointing at the identity provider.
pub fn discovery_document(identity: &IdentityConfig) -> Value {
    let client_url = identity.client_url.trim_end_matches('/');
    json!({
        "issuer": identity.project_id,
        "authorization_endpoint": format!("{client_url}/oauth/authorize"),
        "token_endpoint": identity.endpoint_url("oauth2/token"),
        "registration_endpoint": identity.endpoint_url("oauth2/register"),
        "scopes_supported": ["openid", "profile", "email", "offline_access"],
        "response_types_supported": ["code"],
        "response_modes_supported": ["query"],
        "grant_types_supported": ["authorization_code", "refresh_token"],
        "token_endpoint_auth_methods_supported": ["none"],
        "code_challenge_methods_supported": ["S256"],
    })
}

/// Create the HTTP router for MCP.
pub fn create_router(state: Arc<HttpTransportState>, mcp_path: &str) -> Router {
    let protected = Router::new()
        .route(mcp_path, post(handle_mcp_post))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let mut public = Router::new()
        .route("/health", get(handle_health))
        .route(DISCOVERY_PATH, get(handle_discovery));
    if state.landing_url.is_some() {
        public = public.route("/", get(handle_landing));
    }

    protected
        .merge(public)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle POST requests to the MCP path (JSON-RPC over HTTP).
///
/// The bearer middleware has already attached the caller's context; it is read
/// once here and passed down explicitly.
async fn handle_mcp_post(State(state): State<Arc<HttpTransportState>>, req: Request) -> Response {
    let credentials = req.extensions().get::<CredentialContext>().cloned();

    let request = match Json::<JsonRpcRequest>::from_request(req, &()).await {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected JSON-RPC body");
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    rejection.body_text(),
                )),
            )
                .into_response();
        }
    };

    let is_notification = request.is_notification();
    let response = state
        .server
        .handle_request(request, credentials.as_ref())
        .await;

    if is_notification {
        return StatusCode::ACCEPTED.into_response();
    }
    Json(response).into_response()
}

/// Handle health check requests.
async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": 200, "message": "ok" }))
}

async fn handle_discovery(State(state): State<Arc<HttpTransportState>>) -> impl IntoResponse {
    Json(state.discovery.clone())
}

async fn handle_landing(State(state): State<Arc<HttpTransportState>>) -> Response {
    match &state.landing_url {
        Some(url) => (StatusCode::FOUND, [(header::LOCATION, url.clone())]).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    bind_address: String,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(bind_address: impl Into<String>, router: Router) -> Self {
        Self {
            bind_address: bind_address.into(),
            router,
        }
    }

    /// Run the HTTP server until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), McpError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(&self.bind_address)
            .await
            .map_err(|e| {
                McpError::StartupFailed(format!("Failed to bind to {}: {}", self.bind_address, e))
            })?;

        tracing::info!(address = %self.bind_address, "MCP HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
