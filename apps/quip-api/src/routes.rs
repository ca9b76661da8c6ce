use std::collections::HashMap;

use axum::{
	Json, Router,
	extract::{
		Path, Query, Request, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use quip_service::{
	CaptionItem, ClearHistoryResponse, CreateCaptionRequest, CreateTaxonomyRequest,
	DeleteHistoryResponse, Error as ServiceError, GenerateRequest, HistoryItem, HistoryList,
	ListResponse, PlatformList, RewriteRequest, RewriteResponse, SearchResponse, SetActiveRequest,
	StatRequest, StatResponse, TaxonomyItem, TaxonomyList,
};

use crate::state::AppState;

pub const HEADER_SESSION_ID: &str = "x-quip-session-id";

type Params = Result<Query<HashMap<String, String>>, QueryRejection>;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/captions", get(list_captions))
		.route("/v1/captions/stats", post(record_stat))
		.route("/v1/captions/{id}", get(get_caption))
		.route("/v1/search", get(search))
		.route("/v1/categories", get(list_categories))
		.route("/v1/moods", get(list_moods))
		.route("/v1/platforms", get(list_platforms))
		.route("/v1/rewrite", post(rewrite))
		.route("/v1/generate", post(generate))
		.route("/v1/history", get(list_history).delete(clear_history))
		.route("/v1/history/{id}", get(get_history).delete(delete_history))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/categories", post(create_category))
		.route("/v1/admin/moods", post(create_mood))
		.route("/v1/admin/captions", post(create_caption))
		.route("/v1/admin/captions/{id}/active", post(set_caption_active))
		.layer(middleware::from_fn_with_state(state.clone(), require_admin_token))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_captions(
	State(state): State<AppState>,
	params: Params,
) -> Result<Json<ListResponse>, ApiError> {
	let Query(params) = params.map_err(query_error)?;
	let response = state.service.list_captions(&params).await?;

	Ok(Json(response))
}

async fn get_caption(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<CaptionItem>, ApiError> {
	let response = state.service.get_caption(&id).await?;

	Ok(Json(response))
}

async fn record_stat(
	State(state): State<AppState>,
	payload: Result<Json<StatRequest>, JsonRejection>,
) -> Result<Json<StatResponse>, ApiError> {
	let Json(payload) = payload.map_err(json_body_error)?;
	let response = state.service.record_stat(payload).await?;

	Ok(Json(response))
}

async fn search(
	State(state): State<AppState>,
	params: Params,
) -> Result<Json<SearchResponse>, ApiError> {
	let Query(params) = params.map_err(query_error)?;
	let response = state.service.search(&params).await?;

	Ok(Json(response))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<TaxonomyList>, ApiError> {
	Ok(Json(state.service.list_categories().await?))
}

async fn list_moods(State(state): State<AppState>) -> Result<Json<TaxonomyList>, ApiError> {
	Ok(Json(state.service.list_moods().await?))
}

async fn list_platforms(State(state): State<AppState>) -> Json<PlatformList> {
	Json(state.service.list_platforms())
}

async fn rewrite(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<RewriteRequest>, JsonRejection>,
) -> Result<Json<RewriteResponse>, ApiError> {
	let session_id = session_id(&headers)?;
	let Json(payload) = payload.map_err(json_body_error)?;
	let response = state.service.rewrite(&session_id, payload).await?;

	Ok(Json(response))
}

async fn generate(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<RewriteResponse>, ApiError> {
	let session_id = session_id(&headers)?;
	let Json(payload) = payload.map_err(json_body_error)?;
	let response = state.service.generate(&session_id, payload).await?;

	Ok(Json(response))
}

async fn list_history(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<HistoryList>, ApiError> {
	let session_id = session_id(&headers)?;

	Ok(Json(state.service.list_history(&session_id).await?))
}

async fn clear_history(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
	let session_id = session_id(&headers)?;

	Ok(Json(state.service.clear_history(&session_id).await?))
}

async fn get_history(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<Json<HistoryItem>, ApiError> {
	let session_id = session_id(&headers)?;

	Ok(Json(state.service.get_history(&session_id, &id).await?))
}

async fn delete_history(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<Json<DeleteHistoryResponse>, ApiError> {
	let session_id = session_id(&headers)?;

	Ok(Json(state.service.delete_history(&session_id, &id).await?))
}

async fn create_category(
	State(state): State<AppState>,
	payload: Result<Json<CreateTaxonomyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaxonomyItem>), ApiError> {
	let Json(payload) = payload.map_err(json_body_error)?;
	let response = state.service.create_category(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn create_mood(
	State(state): State<AppState>,
	payload: Result<Json<CreateTaxonomyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaxonomyItem>), ApiError> {
	let Json(payload) = payload.map_err(json_body_error)?;
	let response = state.service.create_mood(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn create_caption(
	State(state): State<AppState>,
	payload: Result<Json<CreateCaptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CaptionItem>), ApiError> {
	let Json(payload) = payload.map_err(json_body_error)?;
	let response = state.service.create_caption(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn set_caption_active(
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<SetActiveRequest>, JsonRejection>,
) -> Result<Json<CaptionItem>, ApiError> {
	let Json(payload) = payload.map_err(json_body_error)?;
	let response = state.service.set_caption_active(&id, payload).await?;

	Ok(Json(response))
}

async fn require_admin_token(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Result<Response, ApiError> {
	if let Some(expected) = state.admin_token() {
		let presented = request
			.headers()
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix("Bearer "))
			.map(str::trim);

		if presented != Some(expected) {
			return Err(json_error(
				StatusCode::UNAUTHORIZED,
				"UNAUTHORIZED",
				"A valid admin bearer token is required.",
				None,
			));
		}
	}

	Ok(next.run(request).await)
}

fn session_id(headers: &HeaderMap) -> Result<String, ApiError> {
	let raw = headers
		.get(HEADER_SESSION_ID)
		.map(|value| value.to_str())
		.transpose()
		.map_err(|_| {
			json_error(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				format!("{HEADER_SESSION_ID} must be visible ASCII."),
				Some(vec![format!("$.headers.{HEADER_SESSION_ID}")]),
			)
		})?
		.map(str::trim)
		.filter(|value| !value.is_empty());
	let Some(raw) = raw else {
		return Err(json_error(
			StatusCode::BAD_REQUEST,
			"INVALID_REQUEST",
			format!("{HEADER_SESSION_ID} header is required."),
			Some(vec![format!("$.headers.{HEADER_SESSION_ID}")]),
		));
	};

	Ok(raw.to_string())
}

fn json_body_error(err: JsonRejection) -> ApiError {
	json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
}

fn query_error(err: QueryRejection) -> ApiError {
	json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn error_code(&self) -> &str {
		&self.error_code
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "CONFLICT", message, None),
			ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Rewrite backend failure.");

				json_error(
					StatusCode::BAD_GATEWAY,
					"UPSTREAM_ERROR",
					"The rewrite backend failed. Try again later.",
					None,
				)
			},
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"Internal error.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
