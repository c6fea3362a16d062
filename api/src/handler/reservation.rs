use crate::{
    extractor::{AuthorizedUser, JsonBody, PathParam},
    model::{
        reservation::{
            CreateReservationRequest, ReservationEnvelope, ReservationResponse,
            UpdateReservationStatusRequest,
        },
        SuccessResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use kernel::model::{
    id::ReservationId,
    reservation::{
        event::{CancelReservation, CreateReservation, UpdateReservationStatus},
        schedule::TimeSpan,
        ReservationStatus,
    },
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

#[tracing::instrument(skip(user, registry, req), fields(user_id = %user.id()))]
pub async fn create_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): JsonBody<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationEnvelope>)> {
    let span = TimeSpan::new(req.data_inicio, req.data_fim)?;
    let create_reservation = CreateReservation::new(req.id_espaco, span, user.user);

    registry
        .reservation_repository()
        .create(create_reservation)
        .await
        .map(|reservation| (StatusCode::CREATED, Json(reservation.into())))
}

pub async fn show_reservation_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let repository = registry.reservation_repository();
    // síndico は condominium 全体、それ以外は自分の予約のみ
    let reservations = match (user.is_administrator(), user.user.condominium_id) {
        (true, Some(condominium_id)) => repository.find_by_condominium_id(condominium_id).await?,
        _ => repository.find_by_user_id(user.id()).await?,
    };

    Ok(Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}

pub async fn show_reservation(
    user: AuthorizedUser,
    WithRejection(Path(reservation_id), _): PathParam<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    let not_found =
        || AppError::EntityNotFound(format!("reservation ({reservation_id}) was not found"));

    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(not_found)?;

    if reservation.reserved_by == user.id() {
        return Ok(Json(reservation.into()));
    }

    // 他人の予約は、そのスペースを管理する síndico にのみ見せる
    let space = registry
        .space_repository()
        .find_by_id(reservation.space_id)
        .await?;
    match space {
        Some(space) if user.user.administers(space.condominium_id) => {
            Ok(Json(reservation.into()))
        }
        _ => Err(not_found()),
    }
}

#[tracing::instrument(skip(user, registry, req), fields(user_id = %user.id()))]
pub async fn update_reservation_status(
    user: AuthorizedUser,
    WithRejection(Path(reservation_id), _): PathParam<ReservationId>,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): JsonBody<UpdateReservationStatusRequest>,
) -> AppResult<Json<ReservationEnvelope>> {
    if !user.is_administrator() {
        return Err(AppError::ForbiddenOperation(
            "only administrators can change reservation status".into(),
        ));
    }

    let status = match req.status.parse::<ReservationStatus>() {
        Ok(status) if status != ReservationStatus::Pending => status,
        _ => {
            return Err(AppError::InvalidState(format!(
                "status must be confirmada or cancelada, got {}",
                req.status
            )))
        }
    };

    let update_status = UpdateReservationStatus::new(reservation_id, status, user.user);
    registry
        .reservation_repository()
        .update_status(update_status)
        .await
        .map(ReservationEnvelope::from)
        .map(Json)
}

#[tracing::instrument(skip(user, registry), fields(user_id = %user.id()))]
pub async fn cancel_reservation(
    user: AuthorizedUser,
    WithRejection(Path(reservation_id), _): PathParam<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SuccessResponse>> {
    let cancel_reservation = CancelReservation::new(reservation_id, user.user);
    registry
        .reservation_repository()
        .cancel(cancel_reservation)
        .await
        .map(|_| Json(SuccessResponse::ok()))
}
