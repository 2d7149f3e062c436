//! Public client-facing endpoints: the salon booking page, slot availability
//! and booking creation. No authentication; these are the tenant's public
//! surface, reached via the salon's link.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::availability::{available_slots, mark_booked, sao_paulo_today};
use crate::booking::{self, is_valid_date, BookingChannel};
use crate::error::ApiError;
use crate::models::*;
use crate::AppState;

// ── GET /api/salons/{salon_id} ──

/// Everything the public booking page needs in one response: salon info,
/// active professionals and services, who performs what, and whether the
/// salon currently accepts bookings. `owner_id` is never exposed.
pub async fn public_salon(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
) -> Result<Json<ApiResponse<PublicSalonResponse>>, ApiError> {
    let salon = sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = ?")
        .bind(salon_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound("salon"))?;

    let subscription_active: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM subscriptions WHERE owner_id = ? AND status = 'active'",
    )
    .bind(&salon.owner_id)
    .fetch_one(&state.db)
    .await?;

    let professionals = sqlx::query_as::<_, Professional>(
        "SELECT * FROM professionals WHERE salon_id = ? AND is_active = 1 ORDER BY name",
    )
    .bind(salon_id)
    .fetch_all(&state.db)
    .await?;

    let services = sqlx::query_as::<_, Service>(
        "SELECT * FROM services WHERE salon_id = ? AND is_active = 1 ORDER BY category, name",
    )
    .bind(salon_id)
    .fetch_all(&state.db)
    .await?;

    let professional_services = sqlx::query_as::<_, ProfessionalServiceLink>(
        "SELECT ps.professional_id, ps.service_id
         FROM professional_services ps
         JOIN professionals p ON p.id = ps.professional_id
         WHERE p.salon_id = ?",
    )
    .bind(salon_id)
    .fetch_all(&state.db)
    .await?;

    let response = PublicSalonResponse {
        salon: PublicSalon {
            id: salon.id,
            name: salon.name.clone(),
            slug: salon.slug.clone(),
            working_days: salon.working_day_set(),
            opening_hours: Hours {
                start: salon.opening_start.clone(),
                end: salon.opening_end.clone(),
            },
        },
        professionals: professionals
            .into_iter()
            .map(|p| {
                let available_days = p.available_day_set();
                PublicProfessional {
                    id: p.id,
                    name: p.name,
                    specialty: p.specialty,
                    available_days,
                    available_hours: Hours {
                        start: p.available_start,
                        end: p.available_end,
                    },
                }
            })
            .collect(),
        services,
        professional_services,
        subscription_active,
    };

    Ok(Json(ApiResponse::success(response)))
}

// ── GET /api/salons/{salon_id}/availability ──

/// Slot availability for one professional on one date. Past dates and closed
/// days return an empty slot list, not an error.
pub async fn availability(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, ApiError> {
    if !is_valid_date(&query.date) {
        return Err(ApiError::Validation(
            "date must be in YYYY-MM-DD format".into(),
        ));
    }

    let salon = sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = ?")
        .bind(salon_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound("salon"))?;

    let professional = sqlx::query_as::<_, Professional>(
        "SELECT * FROM professionals WHERE id = ? AND salon_id = ? AND is_active = 1",
    )
    .bind(query.professional_id)
    .bind(salon_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound("professional"))?;

    // Past dates never offer slots; the string formats make this a plain
    // lexicographic comparison
    if query.date < sao_paulo_today() {
        return Ok(Json(ApiResponse::success(AvailabilityResponse {
            date: query.date,
            slots: Vec::new(),
        })));
    }

    let slots = available_slots(
        &salon.working_day_set(),
        (&salon.opening_start, &salon.opening_end),
        &professional.available_day_set(),
        (&professional.available_start, &professional.available_end),
        &query.date,
    );

    let occupied: HashSet<String> = sqlx::query_scalar::<_, String>(
        "SELECT time FROM appointments
         WHERE professional_id = ? AND date = ? AND status != 'cancelled'",
    )
    .bind(professional.id)
    .bind(&query.date)
    .fetch_all(&state.db)
    .await?
    .into_iter()
    .collect();

    Ok(Json(ApiResponse::success(AvailabilityResponse {
        date: query.date,
        slots: mark_booked(slots, &occupied),
    })))
}

// ── POST /api/appointments ──

/// Client self-service booking.
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentCreated>>), ApiError> {
    let status = booking::default_status_for(
        BookingChannel::ClientSelfService,
        state.client_booking_status,
    );

    let appointment = booking::create_appointment(
        &state.db,
        booking::BookingRequest {
            salon_id: req.salon_id,
            professional_id: req.professional_id,
            service_id: req.service_id,
            date: req.date,
            time: req.time,
            client_name: req.client_name,
            client_phone: req.client_phone,
        },
        status,
    )
    .await?;

    tracing::info!(
        salon_id = appointment.salon_id,
        professional_id = appointment.professional_id,
        date = %appointment.date,
        time = %appointment.time,
        "appointment created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AppointmentCreated {
            id: appointment.id,
            date: appointment.date,
            time: appointment.time,
            status: appointment.status,
        })),
    ))
}
