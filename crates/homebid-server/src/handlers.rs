//! HTTP request handlers
//!
//! Offer CRUD, multipart text extraction, one-shot generation from
//! uploaded files, and conversational update turns. All routes except
//! `/health` and `/session/establish` require a bearer session token.

use crate::error::ApiError;
use crate::session::SessionManager;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use homebid_agent::{EditSession, UpdateAgent};
use homebid_domain::chat::SESSION_GREETING;
use homebid_domain::traits::{OfferPatch, OfferStore};
use homebid_domain::{Offer, OfferId, ToolInvocation, TranscriptEntry, UploadedFile};
use homebid_extractor::{extract, IncomingFile, MAX_FILE_SIZE};
use homebid_rewriter::Rewriter;
use homebid_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Offer persistence
    pub store: Arc<Mutex<SqliteStore>>,
    /// Session token operations
    pub session_manager: Arc<SessionManager>,
    /// One-shot document rewrites
    pub rewriter: Rewriter,
    /// Conversational update turns
    pub agent: UpdateAgent,
}

/// Session establishment request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstablishSessionRequest {
    /// User id from the identity provider
    pub user_id: String,
}

/// Session establishment response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Bearer token for subsequent requests
    pub token: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
}

/// Offer creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    /// Client the offer is drafted for
    pub client_name: String,
    /// Property / client address
    pub client_address: String,
}

/// Offer save request; omitted fields keep their stored values
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferRequest {
    /// Offer id
    pub id: String,
    /// Replacement markdown content
    pub content: Option<String>,
    /// Replacement client name
    pub client_name: Option<String>,
    /// Replacement client address
    pub client_address: Option<String>,
}

/// Text extraction response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    /// Extracted plain text
    pub text: String,
    /// Original filename
    pub file_name: String,
}

/// One-shot generation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// The document being edited
    pub current_offer: String,
    /// Extracted text of every uploaded file, in upload order
    pub file_contents: Vec<UploadedFile>,
}

/// One-shot generation response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// The replacement document
    pub updated_offer: String,
}

/// One message in a chat request
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    /// "user", "assistant", or "system"
    pub role: String,
    /// Message text
    pub content: String,
}

/// Chat turn request
///
/// The client owns the session: it sends the full message history and the
/// current document with every turn, and the server replays them into a
/// fresh `EditSession`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The document being edited
    pub current_offer: String,
    /// Conversation so far, ending with the new user message
    pub messages: Vec<IncomingMessage>,
}

/// Chat turn response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// The assistant's closing text
    pub message: String,
    /// Replacement document, present when a rewrite was applied this turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_offer: Option<String>,
    /// Capability invocations recorded this turn, applied or not
    pub tool_invocations: Vec<ToolInvocation>,
    /// Model steps consumed
    pub steps: usize,
}

/// Resolve the current user from the Authorization header
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = value.strip_prefix("Bearer ").ok_or(ApiError::Unauthenticated)?;

    let claims = state
        .session_manager
        .validate_token(token)
        .map_err(|_| ApiError::Unauthenticated)?;

    Ok(claims.user_id)
}

fn parse_offer_id(raw: &str) -> Result<OfferId, ApiError> {
    OfferId::from_string(raw).map_err(ApiError::Validation)
}

/// POST /session/establish - Exchange a user id for a session token
async fn establish_session(
    State(state): State<AppState>,
    Json(request): Json<EstablishSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::Validation("Missing required field: userId".to_string()));
    }

    let token = state.session_manager.generate_token(&request.user_id)?;
    Ok(Json(SessionResponse { token }))
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
    })
}

/// GET /offers - All offers owned by the authenticated user
async fn list_offers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Offer>>, ApiError> {
    let user_id = authenticate(&state, &headers)?;

    let store = state
        .store
        .lock()
        .map_err(|e| ApiError::Internal(format!("Store lock error: {}", e)))?;
    let offers = store.list_by_owner(&user_id)?;

    Ok(Json(offers))
}

/// POST /offers - Create a new offer with empty content
async fn create_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<Offer>), ApiError> {
    let user_id = authenticate(&state, &headers)?;

    if request.client_name.trim().is_empty() || request.client_address.trim().is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }

    let mut store = state
        .store
        .lock()
        .map_err(|e| ApiError::Internal(format!("Store lock error: {}", e)))?;
    let offer = store.create(&user_id, &request.client_name, &request.client_address)?;

    info!("Created offer {} for user {}", offer.id, user_id);
    Ok((StatusCode::CREATED, Json(offer)))
}

/// PATCH /offers - Save an offer
///
/// Overwrites by id with no version check; concurrent saves are
/// last-write-wins.
async fn update_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateOfferRequest>,
) -> Result<Json<Offer>, ApiError> {
    authenticate(&state, &headers)?;

    let id = parse_offer_id(&request.id)?;
    let patch = OfferPatch {
        content: request.content,
        client_name: request.client_name,
        client_address: request.client_address,
    };

    let mut store = state
        .store
        .lock()
        .map_err(|e| ApiError::Internal(format!("Store lock error: {}", e)))?;
    let offer = store.update_content(id, patch)?;

    info!("Saved offer {}", offer.id);
    Ok(Json(offer))
}

/// GET /offers/:id - Fetch one offer
async fn get_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Offer>, ApiError> {
    authenticate(&state, &headers)?;

    let id = parse_offer_id(&id)?;
    let store = state
        .store
        .lock()
        .map_err(|e| ApiError::Internal(format!("Store lock error: {}", e)))?;

    store
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Offer not found: {}", id)))
}

/// POST /extract-text - Extract plain text from one uploaded file
///
/// The 5 MiB cap lives in the extractor; the request body limit is set
/// above it so oversized files reach the extractor and come back as a
/// proper `TooLarge` error instead of a connection-level rejection.
async fn extract_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    authenticate(&state, &headers)?;

    let mut file: Option<IncomingFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("upload").to_string();
            let declared_type = field.content_type().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?
                .to_vec();

            file = Some(IncomingFile::new(name, declared_type, bytes));
        }
    }

    let file = file.ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;

    info!("Extracting '{}' ({} bytes)", file.name, file.size());
    let text = extract(&file)?;

    Ok(Json(ExtractResponse {
        text,
        file_name: file.name,
    }))
}

/// POST /offers/generate - One-shot rewrite from uploaded file contents
async fn generate_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    authenticate(&state, &headers)?;

    if request.file_contents.is_empty() {
        return Err(ApiError::Validation("No file contents provided".to_string()));
    }

    let updated_offer = state
        .rewriter
        .merge_files(&request.current_offer, &request.file_contents)
        .await?;

    Ok(Json(GenerateResponse { updated_offer }))
}

/// POST /chat - Run one conversational update turn
async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    authenticate(&state, &headers)?;

    let (prior, last) = match request.messages.split_last() {
        Some((last, prior)) if last.role == "user" => (prior, last),
        _ => {
            return Err(ApiError::Validation(
                "Chat request must end with a user message".to_string(),
            ))
        }
    };

    // Rebuild the session from the client-held history. The seed entries
    // are added by EditSession::new, so system lines and the opening
    // greeting are not replayed.
    let mut session = EditSession::new(request.current_offer.clone());
    for message in prior {
        match message.role.as_str() {
            "user" => session.push_entry(TranscriptEntry::user(message.content.clone())),
            "assistant" if message.content != SESSION_GREETING => {
                session.push_entry(TranscriptEntry::assistant(message.content.clone()))
            }
            _ => {}
        }
    }

    let transcript_before = session.transcript().len();
    let outcome = state.agent.run_turn(&mut session, &last.content).await?;

    let tool_invocations: Vec<ToolInvocation> = session.transcript()[transcript_before..]
        .iter()
        .filter_map(|entry| entry.tool_call.clone())
        .collect();

    Ok(Json(ChatResponse {
        message: outcome.reply,
        updated_offer: outcome.updated_document,
        tool_invocations,
        steps: outcome.steps_used,
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/session/establish", post(establish_session))
        .route("/health", get(health_check))
        .route("/offers", get(list_offers).post(create_offer).patch(update_offer))
        .route("/offers/:id", get(get_offer))
        .route("/offers/generate", post(generate_offer))
        .route("/extract-text", post(extract_text))
        .route("/chat", post(chat))
        .layer(DefaultBodyLimit::max(2 * MAX_FILE_SIZE))
        .with_state(state)
}
