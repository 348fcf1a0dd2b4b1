//! Booking session route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::booking::models::CustomerInfo;
use crate::error::{AppError, Result};
use crate::pricing::responses::EstimateResponse;
use crate::render::RenderMode;
use crate::AppState;

use super::requests::{
    AddAddOnRequest, SelectDateRequest, SelectLengthRequest, SelectServiceRequest,
    SelectSizeRequest, SelectTimeRequest,
};
use super::responses::{AddOnToggleResponse, SessionResponse};
use super::session::{Advanced, BookingSession};
use super::submission::BookingRequest;
use super::wizard::{StepNotReady, WizardStep};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create))
        .route("/api/bookings/:id", get(show).delete(abandon))
        .route("/api/bookings/:id/service", put(select_service))
        .route("/api/bookings/:id/size", put(select_size))
        .route("/api/bookings/:id/length", put(select_length))
        .route("/api/bookings/:id/addons", post(add_add_on))
        .route("/api/bookings/:id/addons/:add_on_id", delete(remove_add_on))
        .route("/api/bookings/:id/date", put(select_date))
        .route("/api/bookings/:id/time", put(select_time))
        .route("/api/bookings/:id/contact", put(set_contact))
        .route("/api/bookings/:id/advance", post(advance))
        .route("/api/bookings/:id/retreat", post(retreat))
        .route("/api/bookings/:id/step/:step", post(go_to))
        .route("/api/bookings/:id/reset", post(reset))
        .route("/api/bookings/:id/cancel", post(cancel))
        .route("/api/bookings/:id/deposit", post(record_deposit))
        .route("/api/bookings/:id/complete", post(complete))
}

async fn load(state: &AppState, id: Uuid) -> Result<BookingSession> {
    state
        .cache
        .session(id)
        .await
        .ok_or(AppError::SessionNotFound(id))
}

/// Snapshot without touching the stored session
fn snapshot(state: &AppState, session: &BookingSession, mode: RenderMode) -> Result<SessionResponse> {
    let estimate =
        EstimateResponse::from_outcome(session.estimate(&state.catalog), state.catalog.currency())?;
    Ok(SessionResponse::new(session, estimate, mode))
}

/// Recover stale selections, store the session and build its snapshot.
///
/// The session is stored before the estimate is rendered, so a pricing
/// failure is reported without losing the change that was just made.
async fn save(
    state: &AppState,
    mut session: BookingSession,
    mode: RenderMode,
) -> Result<SessionResponse> {
    let (outcome, recovered) = match session.refresh(&state.catalog) {
        Ok((result, step)) => (Ok(result), step),
        Err(e) => (Err(e), None),
    };
    state.cache.save(session.clone()).await;
    let estimate = EstimateResponse::from_outcome(outcome, state.catalog.currency())?;

    let mut response = SessionResponse::new(&session, estimate, mode);
    response.recovered_step = recovered;
    Ok(response)
}

/// Start a new booking
async fn create(
    State(state): State<AppState>,
    mode: RenderMode,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let session = BookingSession::new();
    info!("Booking session started: {}", session.id);
    let response = save(&state, session, mode).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
) -> Result<Json<SessionResponse>> {
    let session = load(&state, id).await?;
    Ok(Json(snapshot(&state, &session, mode)?))
}

/// Drop the session without submitting
async fn abandon(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    load(&state, id).await?;
    state.cache.discard(id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn select_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
    Json(request): Json<SelectServiceRequest>,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.select_service(&state.catalog, &request.service_id)?;
    Ok(Json(save(&state, session, mode).await?))
}

async fn select_size(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
    Json(request): Json<SelectSizeRequest>,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.select_size(&state.catalog, request.size)?;
    Ok(Json(save(&state, session, mode).await?))
}

async fn select_length(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
    Json(request): Json<SelectLengthRequest>,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.select_length(&state.catalog, request.length)?;
    Ok(Json(save(&state, session, mode).await?))
}

async fn add_add_on(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
    Json(request): Json<AddAddOnRequest>,
) -> Result<Json<AddOnToggleResponse>> {
    let mut session = load(&state, id).await?;
    let changed = session.add_add_on(&state.catalog, &request.add_on_id)?;
    let session = save(&state, session, mode).await?;
    Ok(Json(AddOnToggleResponse { changed, session }))
}

async fn remove_add_on(
    State(state): State<AppState>,
    Path((id, add_on_id)): Path<(Uuid, String)>,
    mode: RenderMode,
) -> Result<Json<AddOnToggleResponse>> {
    let mut session = load(&state, id).await?;
    let changed = session.remove_add_on(&add_on_id)?;
    let session = save(&state, session, mode).await?;
    Ok(Json(AddOnToggleResponse { changed, session }))
}

async fn select_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
    Json(request): Json<SelectDateRequest>,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.select_date(request.date, Utc::now().date_naive())?;
    Ok(Json(save(&state, session, mode).await?))
}

async fn select_time(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
    Json(request): Json<SelectTimeRequest>,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.select_time(&request.time)?;
    Ok(Json(save(&state, session, mode).await?))
}

async fn set_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
    Json(request): Json<CustomerInfo>,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.set_contact(request)?;
    Ok(Json(save(&state, session, mode).await?))
}

/// Advance the wizard; passing the contact step submits the booking
async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;

    match session.advance(&state.catalog)? {
        Advanced::Moved(_) => Ok(Json(save(&state, session, mode).await?)),
        Advanced::ReadyToSubmit(request) => {
            if !state.cache.begin_submission(id).await {
                return Err(AppError::SubmissionInProgress(id));
            }
            let submitted = submit(&state, session, request, mode).await;
            state.cache.end_submission(id).await;
            Ok(Json(submitted?))
        }
    }
}

/// Hand off the booking and store the submitted session while holding the
/// session's submission claim
async fn submit(
    state: &AppState,
    mut session: BookingSession,
    request: BookingRequest,
    mode: RenderMode,
) -> Result<SessionResponse> {
    // A request that raced this one may have finished before the claim was taken
    if load(state, session.id).await?.wizard.is_submitted() {
        return Err(StepNotReady::AlreadySubmitted.into());
    }

    let request_id = state.submitter.submit(&request).await?;
    session.mark_submitted()?;
    info!(
        "Booking session {} submitted via {} (request {})",
        session.id,
        state.submitter.name(),
        request_id
    );

    let mut response = save(state, session, mode).await?;
    response.request_id = Some(request_id);
    Ok(response)
}

async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.retreat();
    Ok(Json(save(&state, session, mode).await?))
}

/// Jump back to an earlier step (progress bar navigation)
async fn go_to(
    State(state): State<AppState>,
    Path((id, step)): Path<(Uuid, u8)>,
    mode: RenderMode,
) -> Result<Json<SessionResponse>> {
    let step = WizardStep::from_number(step)
        .ok_or_else(|| AppError::BadRequest(format!("no such step: {step}")))?;
    let mut session = load(&state, id).await?;
    session.go_to(step)?;
    Ok(Json(save(&state, session, mode).await?))
}

async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.reset();
    info!("Booking session reset: {}", id);
    Ok(Json(save(&state, session, mode).await?))
}

async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.cancel()?;
    info!("Booking session cancelled: {}", id);
    Ok(Json(save(&state, session, mode).await?))
}

async fn record_deposit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.record_deposit()?;
    info!("Deposit recorded for booking session {}", id);
    Ok(Json(save(&state, session, mode).await?))
}

async fn complete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mode: RenderMode,
) -> Result<Json<SessionResponse>> {
    let mut session = load(&state, id).await?;
    session.complete()?;
    Ok(Json(save(&state, session, mode).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{read_json, send, test_state};
    use axum::http::StatusCode;
    use axum::Router;
    use serde_json::{json, Value};

    async fn start(app: &Router) -> String {
        let (status, body) = read_json(send(app, "POST", "/api/bookings", None).await).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn call(app: &Router, method: &str, uri: String, body: Option<Value>) -> (StatusCode, Value) {
        read_json(send(app, method, &uri, body).await).await
    }

    async fn ok(app: &Router, method: &str, uri: String, body: Option<Value>) -> Value {
        let (status, body) = call(app, method, uri, body).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }

    #[tokio::test]
    async fn test_new_session_snapshot() {
        let app = crate::app(test_state());
        let id = start(&app).await;

        let body = ok(&app, "GET", format!("/api/bookings/{id}"), None).await;
        assert_eq!(body["status"], "draft");
        assert_eq!(body["wizard"]["step_number"], 1);
        assert_eq!(body["wizard"]["step"], "service");
        assert_eq!(body["wizard"]["total_steps"], 7);
        assert_eq!(body["estimate"]["status"], "incomplete");
        assert_eq!(body["render_mode"], "desktop");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = crate::app(test_state());
        let (status, body) = call(&app, "GET", format!("/api/bookings/{}", Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_type"], "session_not_found");
    }

    #[tokio::test]
    async fn test_abandoned_session_is_gone() {
        let app = crate::app(test_state());
        let id = start(&app).await;

        let response = send(&app, "DELETE", &format!("/api/bookings/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "GET", format!("/api/bookings/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_advance_without_service_reports_field() {
        let app = crate::app(test_state());
        let id = start(&app).await;

        let (status, body) = call(&app, "POST", format!("/api/bookings/{id}/advance"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "step_not_ready");
        assert_eq!(body["details"]["reason"], "incomplete");
        assert_eq!(body["details"]["step"], "service");
        assert_eq!(body["details"]["issues"][0]["field"], "service");
        assert_eq!(body["details"]["issues"][0]["problem"], "missing");
    }

    #[tokio::test]
    async fn test_forward_jump_rejected() {
        let app = crate::app(test_state());
        let id = start(&app).await;

        let (status, body) = call(&app, "POST", format!("/api/bookings/{id}/step/4"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["reason"], "skip");

        let (status, _) = call(&app, "POST", format!("/api/bookings/{id}/step/9"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// Fill in every step up to and including the contact details
    async fn walk_to_contact(app: &Router, base: &str) {
        let date = (Utc::now().date_naive() + chrono::Days::new(3)).to_string();
        let steps = [
            ("PUT", "service", Some(json!({ "service_id": "cornrows" }))),
            ("POST", "advance", None),
            ("PUT", "size", Some(json!({ "size": "medium" }))),
            ("POST", "advance", None),
            ("PUT", "length", Some(json!({ "length": "shoulder" }))),
            ("POST", "advance", None),
            ("POST", "advance", None),
            ("PUT", "date", Some(json!({ "date": date }))),
            ("POST", "advance", None),
            ("PUT", "time", Some(json!({ "time": "14:00" }))),
            ("POST", "advance", None),
            (
                "PUT",
                "contact",
                Some(json!({
                    "name": "Kofi Asante",
                    "phone": "024 555 0199",
                    "email": "kofi@example.com"
                })),
            ),
        ];
        for (method, path, body) in steps {
            ok(app, method, format!("{base}/{path}"), body).await;
        }
    }

    #[tokio::test]
    async fn test_draft_cannot_be_completed() {
        let app = crate::app(test_state());
        let id = start(&app).await;

        let (status, body) = call(&app, "POST", format!("/api/bookings/{id}/complete"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_type"], "invalid_transition");

        let body = ok(&app, "GET", format!("/api/bookings/{id}"), None).await;
        assert_eq!(body["status"], "draft");
    }

    #[tokio::test]
    async fn test_concurrent_submission_is_rejected() {
        let state = test_state();
        let app = crate::app(state.clone());
        let id = start(&app).await;
        let base = format!("/api/bookings/{id}");
        walk_to_contact(&app, &base).await;

        let session_id: Uuid = id.parse().unwrap();
        assert!(state.cache.begin_submission(session_id).await);
        let (status, body) = call(&app, "POST", format!("{base}/advance"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_type"], "submission_in_progress");

        let body = ok(&app, "GET", base.clone(), None).await;
        assert_eq!(body["status"], "draft");
        assert_eq!(body["wizard"]["step"], "contact");

        state.cache.end_submission(session_id).await;
        let body = ok(&app, "POST", format!("{base}/advance"), None).await;
        assert_eq!(body["status"], "pending_deposit");

        // The claim is released once the hand-off is done
        let (status, body) = call(&app, "POST", format!("{base}/advance"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["reason"], "already_submitted");
    }

    #[tokio::test]
    async fn test_selection_kept_when_pricing_fails() {
        let state = AppState::new(
            crate::test_support::oversized_catalog(),
            crate::cache::AppCache::default(),
            crate::booking::Submitter::Log,
        );
        let app = crate::app(state.clone());
        let id = start(&app).await;
        let base = format!("/api/bookings/{id}");

        ok(&app, "PUT", format!("{base}/service"), Some(json!({ "service_id": "cornrows" }))).await;
        ok(&app, "PUT", format!("{base}/size"), Some(json!({ "size": "medium" }))).await;
        let (status, body) =
            call(&app, "PUT", format!("{base}/length"), Some(json!({ "length": "waist" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "invalid_selection");

        let stored = state.cache.session(id.parse().unwrap()).await.unwrap();
        assert_eq!(
            stored.booking.selected_length,
            Some(crate::catalog::LengthKey::Waist)
        );
    }

    #[tokio::test]
    async fn test_full_booking_flow() {
        let app = crate::app(test_state());
        let id = start(&app).await;
        let base = format!("/api/bookings/{id}");
        let date = (Utc::now().date_naive() + chrono::Days::new(7)).to_string();

        ok(&app, "PUT", format!("{base}/service"), Some(json!({ "service_id": "knotless-braids" }))).await;
        ok(&app, "POST", format!("{base}/advance"), None).await;
        ok(&app, "PUT", format!("{base}/size"), Some(json!({ "size": "jumbo" }))).await;
        ok(&app, "POST", format!("{base}/advance"), None).await;
        let body = ok(&app, "PUT", format!("{base}/length"), Some(json!({ "length": "waist" }))).await;
        assert_eq!(body["estimate"]["total_price"]["amount"], "210.00");
        ok(&app, "POST", format!("{base}/advance"), None).await;

        let body = ok(&app, "POST", format!("{base}/addons"), Some(json!({ "add_on_id": "beads" }))).await;
        assert_eq!(body["changed"], true);
        let body = ok(&app, "POST", format!("{base}/addons"), Some(json!({ "add_on_id": "beads" }))).await;
        assert_eq!(body["changed"], false);
        assert_eq!(body["estimate"]["total_price"]["amount"], "220.00");
        ok(&app, "POST", format!("{base}/advance"), None).await;

        ok(&app, "PUT", format!("{base}/date"), Some(json!({ "date": date }))).await;
        ok(&app, "POST", format!("{base}/advance"), None).await;
        ok(&app, "PUT", format!("{base}/time"), Some(json!({ "time": "9:30 AM" }))).await;
        let body = ok(&app, "POST", format!("{base}/advance"), None).await;
        assert_eq!(body["wizard"]["step"], "contact");

        ok(
            &app,
            "PUT",
            format!("{base}/contact"),
            Some(json!({
                "name": "Abena Owusu",
                "whatsapp": "+233 20 111 2222",
                "email": "abena@example.com",
                "special_requests": "Ends dipped in hot water please"
            })),
        )
        .await;

        let body = ok(&app, "POST", format!("{base}/advance"), None).await;
        assert_eq!(body["status"], "pending_deposit");
        assert_eq!(body["wizard"]["submitted"], true);
        assert!(body["request_id"].is_string());
        assert_eq!(body["estimate"]["deposit"]["amount"], "66.00");

        let (status, body) = call(&app, "PUT", format!("{base}/time"), Some(json!({ "time": "11:00" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_type"], "booking_locked");

        let body = ok(&app, "POST", format!("{base}/deposit"), None).await;
        assert_eq!(body["status"], "confirmed");
        assert_eq!(body["deposit_paid"], true);

        let body = ok(&app, "POST", format!("{base}/complete"), None).await;
        assert_eq!(body["status"], "completed");

        let (status, body) = call(&app, "POST", format!("{base}/cancel"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_type"], "invalid_transition");
    }

    #[tokio::test]
    async fn test_changing_service_recovers_stale_size() {
        let app = crate::app(test_state());
        let id = start(&app).await;
        let base = format!("/api/bookings/{id}");

        ok(&app, "PUT", format!("{base}/service"), Some(json!({ "service_id": "box-braids" }))).await;
        ok(&app, "POST", format!("{base}/advance"), None).await;
        ok(&app, "PUT", format!("{base}/size"), Some(json!({ "size": "small" }))).await;
        ok(&app, "POST", format!("{base}/advance"), None).await;
        ok(&app, "PUT", format!("{base}/length"), Some(json!({ "length": "waist" }))).await;
        ok(&app, "POST", format!("{base}/step/1"), None).await;

        let body = ok(&app, "PUT", format!("{base}/service"), Some(json!({ "service_id": "faux-locs" }))).await;
        assert_eq!(body["recovered_step"], "size");
        assert_eq!(body["selection"]["selected_size"], Value::Null);
        assert_eq!(body["selection"]["selected_length"], "waist");
        assert_eq!(body["wizard"]["step_number"], 1);
        assert_eq!(body["estimate"]["status"], "incomplete");
    }

    #[tokio::test]
    async fn test_retreat_and_reset() {
        let app = crate::app(test_state());
        let id = start(&app).await;
        let base = format!("/api/bookings/{id}");

        ok(&app, "PUT", format!("{base}/service"), Some(json!({ "service_id": "cornrows" }))).await;
        ok(&app, "POST", format!("{base}/advance"), None).await;
        let body = ok(&app, "POST", format!("{base}/retreat"), None).await;
        assert_eq!(body["wizard"]["step_number"], 1);
        assert_eq!(body["selection"]["selected_service"], "cornrows");

        let body = ok(&app, "POST", format!("{base}/reset"), None).await;
        assert_eq!(body["selection"]["selected_service"], Value::Null);
        assert_eq!(body["status"], "draft");
    }

    #[tokio::test]
    async fn test_mobile_render_mode() {
        let app = crate::app(test_state());
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/bookings")
            .header("user-agent", "Mozilla/5.0 (Linux; Android 14) Mobile Safari/537.36")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["render_mode"], "mobile");
    }
}
