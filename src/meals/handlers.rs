use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        CreateMealScheduleRequest, MealScheduleEnvelope, MealScheduleResponse, MessageResponse,
        StatsResponse, UpdateMealScheduleRequest,
    },
    repo_types::MealScheduleEntry,
    services::{validate_create, validate_update, MealStats},
};
use crate::{auth::CurrentUser, error::ApiError, state::AppState};

pub fn meal_schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-schedules", get(list_entries).post(create_entry))
        .route("/meal-schedules/stats", get(stats))
        .route(
            "/meal-schedules/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

type EntryId = WithRejection<Path<Uuid>, ApiError>;

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateMealScheduleRequest>, ApiError>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<MealScheduleResponse>), ApiError> {
    let new = validate_create(payload)?;
    let entry = MealScheduleEntry::insert(&state.db, user.id, &new).await?;

    info!(entry_id = %entry.id, on_plan = entry.is_on_plan, "meal schedule entry created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/meal-schedules/{}", entry.id))],
        Json(entry.into()),
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MealScheduleEnvelope<Vec<MealScheduleResponse>>>, ApiError> {
    let entries = MealScheduleEntry::list_by_user(&state.db, user.id).await?;
    Ok(Json(MealScheduleEnvelope {
        meal_schedule: entries.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): EntryId,
) -> Result<Json<MealScheduleEnvelope<MealScheduleResponse>>, ApiError> {
    match MealScheduleEntry::find_by_id(&state.db, id).await? {
        Some(entry) if entry.user_id == user.id => Ok(Json(MealScheduleEnvelope {
            meal_schedule: entry.into(),
        })),
        Some(_) => {
            warn!(%id, "read of another user's meal schedule entry");
            Err(ApiError::not_found("Meal schedule not found"))
        }
        None => Err(ApiError::not_found("Meal schedule not found")),
    }
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): EntryId,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateMealScheduleRequest>, ApiError>,
) -> Result<Json<MealScheduleResponse>, ApiError> {
    let changes = validate_update(payload)?;
    ensure_owner(&state, id, user.id).await?;

    // The row can vanish between the ownership check and the update.
    match MealScheduleEntry::update(&state.db, id, user.id, &changes).await? {
        Some(entry) => {
            info!(%id, "meal schedule entry updated");
            Ok(Json(entry.into()))
        }
        None => Err(ApiError::not_found("Meal schedule not found")),
    }
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): EntryId,
) -> Result<Json<MessageResponse>, ApiError> {
    ensure_owner(&state, id, user.id).await?;

    if !MealScheduleEntry::delete(&state.db, id, user.id).await? {
        return Err(ApiError::not_found("Meal schedule not found"));
    }

    info!(%id, "meal schedule entry deleted");
    Ok(Json(MessageResponse {
        message: "Meal schedule deleted",
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<StatsResponse>, ApiError> {
    let flags = MealScheduleEntry::on_plan_flags(&state.db, user.id).await?;
    Ok(Json(MealStats::from_flags(flags).into()))
}

/// 404 when the entry is missing, 401 when it belongs to someone else.
async fn ensure_owner(state: &AppState, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    let Some(entry) = MealScheduleEntry::find_by_id(&state.db, id).await? else {
        return Err(ApiError::not_found("Meal schedule not found"));
    };
    if entry.user_id != user_id {
        warn!(%id, owner_id = %entry.user_id, "mutation of another user's meal schedule entry");
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}
