//! HTTP boundary: routing, validation and error translation

use std::sync::Arc;

use axum::{
  body::Bytes,
  extract::State,
  http::{header, HeaderValue, Method, StatusCode},
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use log::{debug, info, error};
use tower_http::cors::{Any, CorsLayer};

use crate::error::Error;
use crate::failover::{self, CredentialPool};
use crate::providers::PromptProvider;
use crate::request::{ErrorResponse, GenerationRequest, NormalizedPromptSet};
use crate::{catalog, normalize, template};

pub const GENERATE_PATH: &str = "/api/generate-prompt";
pub const TOOLS_PATH: &str = "/api/all-tools-schema";
pub const SYSTEM_PATH: &str = "/api/video-prompt-system";

/// Shared, read-only state for every request
#[derive(Clone)]
pub struct AppState
{   provider: Arc<dyn PromptProvider>
  , pool: Arc<CredentialPool>
}

impl AppState
{   pub fn new(
      provider: Arc<dyn PromptProvider>
    , pool: Arc<CredentialPool>
    ) -> Self
    {   AppState { provider, pool }
    }
}

impl IntoResponse for Error
{   fn into_response(self) -> Response
    {   match self
        {   Error::InvalidRequest(msg) => {
              (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg)))
                .into_response()
            }
          , other => {
              error!("Generation failed: {}", other);
              let body = ErrorResponse::new("Failed to generate prompt")
                .with_message(other.to_string());
              (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
                .into_response()
            }
        }
    }
}

/// Build the application router.
///
/// OPTIONS on every route is answered by the CORS layer: 200, empty
/// body, allowed verbs listed. It never reaches a handler.
pub fn build_router(state: AppState) -> Router
{   let generate = Router::new()
      .route(
        GENERATE_PATH,
        post(generate_prompt).fallback(method_not_allowed),
      )
      .layer(cors_layer(&[Method::POST, Method::OPTIONS]))
      .with_state(state);

    let catalogs = Router::new()
      .route(
        TOOLS_PATH,
        get(all_tools_schema).fallback(method_not_allowed),
      )
      .route(
        SYSTEM_PATH,
        get(video_prompt_system).fallback(method_not_allowed),
      )
      .layer(cors_layer(&[Method::GET, Method::OPTIONS]));

    generate
      .merge(catalogs)
      .route("/health", get(health_check))
}

fn cors_layer(methods: &[Method]) -> CorsLayer
{   CorsLayer::new()
      .allow_origin(Any)
      .allow_methods(methods.to_vec())
      .allow_headers([header::CONTENT_TYPE])
}

async fn method_not_allowed() -> Response
{   (
      StatusCode::METHOD_NOT_ALLOWED,
      Json(ErrorResponse::new("Method not allowed")),
    ).into_response()
}

async fn generate_prompt(
  State(state): State<AppState>
, body: Bytes
) -> Result<Json<NormalizedPromptSet>, Error>
{   let request: GenerationRequest = serde_json::from_slice(&body)
      .map_err(|e| {
        debug!("Rejecting body: {}", e);
        Error::InvalidRequest("User message is required".to_string())
      })?;
    let message = request.validated_message()?;
    let mode = request.mode_or_default();
    info!("Generating prompts (mode: {})", mode);

    let instruction = template::build_instruction(message, Some(mode));
    let dispatched = failover::dispatch(
      state.provider.as_ref(),
      &state.pool,
      &instruction,
    ).await?;
    info!(
      "Upstream answered with credential #{} ({})",
      dispatched.credential_index, dispatched.credential_hint
    );

    Ok(Json(normalize::normalize(&dispatched.response)))
}

async fn all_tools_schema() -> Response
{   json_body(catalog::all_tools_schema())
}

async fn video_prompt_system() -> Response
{   json_body(catalog::video_prompt_system())
}

fn json_body(body: &'static str) -> Response
{   (
      [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
      body,
    ).into_response()
}

async fn health_check() -> impl IntoResponse
{   (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}
