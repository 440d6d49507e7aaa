//! HTTP API: routes, handlers and the CORS layer.

use crate::service::{AppState, MoveResponse, ServiceError};
use axum::{
    Json, Router,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use derive_more::{Display, From};
use minimax_tictactoe::{Board, GameStatus, RuleEngine, SearchNode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

/// Body of `/api/move` and `/api/explain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardRequest {
    /// Board to act on, as nine `"x"`/`"o"`/`"v"` tokens.
    pub board: Board,
}

/// Error rendered as a JSON body.
#[derive(Debug, Display, From)]
pub enum ApiError {
    /// The request body could not be decoded into a board.
    #[display("invalid request: {}", _0)]
    InvalidRequest(JsonRejection),

    /// The engine could not produce an answer.
    #[display("{}", _0)]
    Service(ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, status): (StatusCode, &'static str) = match &self {
            ApiError::InvalidRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "error"),
            ApiError::Service(ServiceError::Timeout { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "error")
            }
            ApiError::Service(ServiceError::Rules(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GameStatus::BackendError.into(),
            ),
            ApiError::Service(ServiceError::Join(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "error"),
        };
        if code.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }
        let body = json!({ "status": status, "error": self.to_string() });
        (code, Json(body)).into_response()
    }
}

/// Builds the router over `state`.
pub fn router<R>(state: AppState<R>) -> Router
where
    R: RuleEngine + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/move", post(make_move::<R>))
        .route("/api/explain", post(explain::<R>))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

#[instrument]
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Tic-tac-toe minimax server running." }))
}

#[instrument]
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Computes the AI's reply.
///
/// Finished games are echoed with their status. A rule engine failure is
/// reported in-band as `error_backend_prolog` with the submitted board, the
/// way clients already handle an unavailable engine.
#[instrument(skip_all)]
async fn make_move<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<BoardRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError>
where
    R: RuleEngine + Send + Sync + 'static,
{
    let Json(BoardRequest { board }) = payload?;
    info!(board = %board, "Board received");

    match state.run(move |service| service.play(&board)).await {
        Ok(response) => Ok(Json(response)),
        Err(ServiceError::Rules(err)) => {
            error!(error = %err, board = %board, "Move search failed, reporting backend error");
            Ok(Json(MoveResponse::new(board, GameStatus::BackendError)))
        }
        Err(err) => Err(err.into()),
    }
}

/// Returns the explanation tree for the AI's next decision.
#[instrument(skip_all)]
async fn explain<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<BoardRequest>, JsonRejection>,
) -> Result<Json<SearchNode>, ApiError>
where
    R: RuleEngine + Send + Sync + 'static,
{
    let Json(BoardRequest { board }) = payload?;
    info!(board = %board, depth = state.service().explain_depth(), "Explanation requested");

    let root = state.run(move |service| service.explain(&board)).await?;
    debug!(nodes = root.node_count(), "Explanation ready");
    Ok(Json(root))
}

/// Permissive CORS: any origin, method and header, credentials allowed.
async fn cors(req: Request, next: Next) -> Response {
    let origin = req.headers().get(header::ORIGIN).cloned();
    let requested_method = req
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_METHOD)
        .cloned();
    let requested_headers = req
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned();

    if req.method() == Method::OPTIONS && requested_method.is_some() {
        debug!(uri = %req.uri(), "Answering CORS preflight");
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        allow_origin(headers, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            requested_method.unwrap_or(HeaderValue::from_static("GET, POST, OPTIONS")),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            requested_headers.unwrap_or(HeaderValue::from_static("*")),
        );
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("600"));
        return response;
    }

    let mut response = next.run(req).await;
    allow_origin(response.headers_mut(), origin);
    response
}

fn allow_origin(headers: &mut HeaderMap, origin: Option<HeaderValue>) {
    // Credentials forbid a literal `*`, so a present origin is echoed back.
    match origin {
        Some(origin) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
        None => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        }
    }
}
