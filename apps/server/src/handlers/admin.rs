//! Owner/admin endpoints: salon setup and settings, professional and service
//! management, the appointment list and the status lifecycle actions.
//!
//! Every query is scoped by salon_id from the path; an id that belongs to
//! another salon behaves exactly like one that does not exist.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::booking::{self, validate_day_set, validate_hours, BookingChannel};
use crate::error::ApiError;
use crate::lifecycle::AppointmentStatus;
use crate::models::*;
use crate::AppState;

// ── Salons ──

/// POST /api/salons — create the owner's salon. One salon per owner.
pub async fn create_salon(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSalonRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Salon>>), ApiError> {
    if req.owner_id.trim().is_empty() {
        return Err(ApiError::Validation("owner_id is required".into()));
    }
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".into()));
    }
    let slug = req.slug.trim().to_lowercase();
    if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ApiError::Validation(
            "slug must contain only letters, digits and hyphens".into(),
        ));
    }

    let working_days = req.working_days.unwrap_or_else(|| vec![1, 2, 3, 4, 5]);
    validate_day_set(&working_days)?;
    let hours = req.opening_hours.unwrap_or(Hours {
        start: "09:00".into(),
        end: "18:00".into(),
    });
    validate_hours(&hours.start, &hours.end)?;

    let insert = sqlx::query(
        "INSERT INTO salons (owner_id, name, slug, working_days, opening_start, opening_end)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(req.owner_id.trim())
    .bind(name)
    .bind(&slug)
    .bind(day_set_to_json(&working_days))
    .bind(&hours.start)
    .bind(&hours.end)
    .execute(&state.db)
    .await;

    let id = match insert {
        Ok(result) => result.last_insert_rowid(),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(ApiError::AlreadyExists("salon"));
        }
        Err(e) => return Err(ApiError::Database(e)),
    };

    let salon = sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(salon))))
}

/// PUT /api/salons/{id}/settings — partial update of name, days and hours.
pub async fn update_salon_settings(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
    Json(req): Json<UpdateSalonSettingsRequest>,
) -> Result<Json<ApiResponse<Salon>>, ApiError> {
    let salon = sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = ?")
        .bind(salon_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound("salon"))?;

    let name = match req.name {
        Some(n) => {
            let n = n.trim().to_string();
            if n.is_empty() {
                return Err(ApiError::Validation("name cannot be empty".into()));
            }
            n
        }
        None => salon.name,
    };

    let working_days = match req.working_days {
        Some(days) => {
            validate_day_set(&days)?;
            day_set_to_json(&days)
        }
        None => salon.working_days,
    };

    let (start, end) = match req.opening_hours {
        Some(h) => {
            validate_hours(&h.start, &h.end)?;
            (h.start, h.end)
        }
        None => (salon.opening_start, salon.opening_end),
    };

    sqlx::query(
        "UPDATE salons SET name = ?, working_days = ?, opening_start = ?, opening_end = ?
         WHERE id = ?",
    )
    .bind(&name)
    .bind(&working_days)
    .bind(&start)
    .bind(&end)
    .bind(salon_id)
    .execute(&state.db)
    .await?;

    let updated = sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = ?")
        .bind(salon_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

// ── Professionals ──

/// GET /api/salons/{id}/professionals — all of them, active or not.
pub async fn list_professionals(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Professional>>>, ApiError> {
    let professionals = sqlx::query_as::<_, Professional>(
        "SELECT * FROM professionals WHERE salon_id = ? ORDER BY name",
    )
    .bind(salon_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::success(professionals)))
}

/// POST /api/salons/{id}/professionals
pub async fn create_professional(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
    Json(req): Json<CreateProfessionalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Professional>>), ApiError> {
    salon_exists(&state, salon_id).await?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".into()));
    }
    validate_day_set(&req.available_days)?;
    validate_hours(&req.available_hours.start, &req.available_hours.end)?;

    let id = sqlx::query(
        "INSERT INTO professionals (salon_id, name, specialty, available_days, available_start, available_end)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(salon_id)
    .bind(name)
    .bind(req.specialty.as_deref().unwrap_or(""))
    .bind(day_set_to_json(&req.available_days))
    .bind(&req.available_hours.start)
    .bind(&req.available_hours.end)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    let professional = sqlx::query_as::<_, Professional>("SELECT * FROM professionals WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(professional))))
}

/// PUT /api/salons/{id}/professionals/{prof_id}
pub async fn update_professional(
    State(state): State<Arc<AppState>>,
    Path((salon_id, prof_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateProfessionalRequest>,
) -> Result<Json<ApiResponse<Professional>>, ApiError> {
    let current = sqlx::query_as::<_, Professional>(
        "SELECT * FROM professionals WHERE id = ? AND salon_id = ?",
    )
    .bind(prof_id)
    .bind(salon_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound("professional"))?;

    let name = match req.name {
        Some(n) => {
            let n = n.trim().to_string();
            if n.is_empty() {
                return Err(ApiError::Validation("name cannot be empty".into()));
            }
            n
        }
        None => current.name,
    };
    let specialty = req.specialty.unwrap_or(current.specialty);
    let available_days = match req.available_days {
        Some(days) => {
            validate_day_set(&days)?;
            day_set_to_json(&days)
        }
        None => current.available_days,
    };
    let (start, end) = match req.available_hours {
        Some(h) => {
            validate_hours(&h.start, &h.end)?;
            (h.start, h.end)
        }
        None => (current.available_start, current.available_end),
    };
    let is_active = req.is_active.unwrap_or(current.is_active);

    sqlx::query(
        "UPDATE professionals
         SET name = ?, specialty = ?, available_days = ?, available_start = ?, available_end = ?, is_active = ?
         WHERE id = ? AND salon_id = ?",
    )
    .bind(&name)
    .bind(&specialty)
    .bind(&available_days)
    .bind(&start)
    .bind(&end)
    .bind(is_active)
    .bind(prof_id)
    .bind(salon_id)
    .execute(&state.db)
    .await?;

    let updated = sqlx::query_as::<_, Professional>("SELECT * FROM professionals WHERE id = ?")
        .bind(prof_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/salons/{id}/professionals/{prof_id} — soft delete. History
/// stays intact; the professional just stops being bookable.
pub async fn deactivate_professional(
    State(state): State<Arc<AppState>>,
    Path((salon_id, prof_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let result = sqlx::query("UPDATE professionals SET is_active = 0 WHERE id = ? AND salon_id = ?")
        .bind(prof_id)
        .bind(salon_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("professional"));
    }
    Ok(Json(ApiResponse::success(())))
}

/// PUT /api/salons/{id}/professionals/{prof_id}/services — replace the set
/// of services this professional performs. All ids must belong to the salon.
pub async fn set_professional_services(
    State(state): State<Arc<AppState>>,
    Path((salon_id, prof_id)): Path<(i64, i64)>,
    Json(req): Json<SetProfessionalServicesRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let exists: bool =
        sqlx::query_scalar("SELECT COUNT(*) > 0 FROM professionals WHERE id = ? AND salon_id = ?")
            .bind(prof_id)
            .bind(salon_id)
            .fetch_one(&state.db)
            .await?;
    if !exists {
        return Err(ApiError::NotFound("professional"));
    }

    for service_id in &req.service_ids {
        let valid: bool =
            sqlx::query_scalar("SELECT COUNT(*) > 0 FROM services WHERE id = ? AND salon_id = ?")
                .bind(service_id)
                .bind(salon_id)
                .fetch_one(&state.db)
                .await?;
        if !valid {
            return Err(ApiError::NotFound("service"));
        }
    }

    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM professional_services WHERE professional_id = ?")
        .bind(prof_id)
        .execute(&mut *tx)
        .await?;
    for service_id in &req.service_ids {
        sqlx::query("INSERT INTO professional_services (professional_id, service_id) VALUES (?, ?)")
            .bind(prof_id)
            .bind(service_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(Json(ApiResponse::success(())))
}

// ── Services ──

/// GET /api/salons/{id}/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Service>>>, ApiError> {
    let services = sqlx::query_as::<_, Service>(
        "SELECT * FROM services WHERE salon_id = ? ORDER BY category, name",
    )
    .bind(salon_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::success(services)))
}

/// POST /api/salons/{id}/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Service>>), ApiError> {
    salon_exists(&state, salon_id).await?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".into()));
    }
    if req.price < 0 {
        return Err(ApiError::Validation("price cannot be negative".into()));
    }
    if req.duration_min <= 0 {
        return Err(ApiError::Validation("duration_min must be positive".into()));
    }

    let id = sqlx::query(
        "INSERT INTO services (salon_id, name, price, duration_min, category)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(salon_id)
    .bind(name)
    .bind(req.price)
    .bind(req.duration_min)
    .bind(req.category.as_deref().unwrap_or("Geral"))
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(service))))
}

/// PUT /api/salons/{id}/services/{svc_id}
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path((salon_id, svc_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<Service>>, ApiError> {
    let current =
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ? AND salon_id = ?")
            .bind(svc_id)
            .bind(salon_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(ApiError::NotFound("service"))?;

    let name = match req.name {
        Some(n) => {
            let n = n.trim().to_string();
            if n.is_empty() {
                return Err(ApiError::Validation("name cannot be empty".into()));
            }
            n
        }
        None => current.name,
    };
    let price = req.price.unwrap_or(current.price);
    if price < 0 {
        return Err(ApiError::Validation("price cannot be negative".into()));
    }
    let duration_min = req.duration_min.unwrap_or(current.duration_min);
    if duration_min <= 0 {
        return Err(ApiError::Validation("duration_min must be positive".into()));
    }
    let category = req.category.unwrap_or(current.category);
    let is_active = req.is_active.unwrap_or(current.is_active);

    sqlx::query(
        "UPDATE services SET name = ?, price = ?, duration_min = ?, category = ?, is_active = ?
         WHERE id = ? AND salon_id = ?",
    )
    .bind(&name)
    .bind(price)
    .bind(duration_min)
    .bind(&category)
    .bind(is_active)
    .bind(svc_id)
    .bind(salon_id)
    .execute(&state.db)
    .await?;

    let updated = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
        .bind(svc_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/salons/{id}/services/{svc_id} — soft delete.
pub async fn deactivate_service(
    State(state): State<Arc<AppState>>,
    Path((salon_id, svc_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let result = sqlx::query("UPDATE services SET is_active = 0 WHERE id = ? AND salon_id = ?")
        .bind(svc_id)
        .bind(salon_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("service"));
    }
    Ok(Json(ApiResponse::success(())))
}

// ── Appointments ──

/// GET /api/salons/{id}/appointments — filter by exact date, range, status.
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<ApiResponse<Vec<Appointment>>>, ApiError> {
    if let Some(status) = &query.status {
        if AppointmentStatus::parse(status).is_none() {
            return Err(ApiError::Validation("unknown status filter".into()));
        }
    }

    let mut sql = String::from("SELECT * FROM appointments WHERE salon_id = ?");
    if query.date.is_some() {
        sql.push_str(" AND date = ?");
    }
    if query.from.is_some() {
        sql.push_str(" AND date >= ?");
    }
    if query.to.is_some() {
        sql.push_str(" AND date <= ?");
    }
    if query.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    sql.push_str(" ORDER BY date, time");

    let mut q = sqlx::query_as::<_, Appointment>(&sql).bind(salon_id);
    if let Some(date) = &query.date {
        q = q.bind(date);
    }
    if let Some(from) = &query.from {
        q = q.bind(from);
    }
    if let Some(to) = &query.to {
        q = q.bind(to);
    }
    if let Some(status) = &query.status {
        q = q.bind(status);
    }

    let appointments = q.fetch_all(&state.db).await?;
    Ok(Json(ApiResponse::success(appointments)))
}

/// POST /api/salons/{id}/appointments — staff-entered booking, starts
/// pending. Same transaction as the client channel, including the conflict
/// check.
pub async fn create_staff_appointment(
    State(state): State<Arc<AppState>>,
    Path(salon_id): Path<i64>,
    Json(req): Json<StaffAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentCreated>>), ApiError> {
    let status = booking::default_status_for(BookingChannel::Staff, state.client_booking_status);

    let appointment = booking::create_appointment(
        &state.db,
        booking::BookingRequest {
            salon_id,
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

/// Shared lifecycle transition. Already-at-target is a no-op success so
/// retried requests stay safe; anything else off the legal path is a
/// conflict.
async fn transition_appointment(
    state: &AppState,
    salon_id: i64,
    appointment_id: i64,
    target: AppointmentStatus,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment =
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ? AND salon_id = ?")
            .bind(appointment_id)
            .bind(salon_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(ApiError::NotFound("appointment"))?;

    let current = AppointmentStatus::parse(&appointment.status)
        .ok_or_else(|| ApiError::Validation("appointment has an unknown status".into()))?;

    if current == target {
        return Ok(Json(ApiResponse::success(appointment)));
    }
    if !current.can_transition_to(target) {
        return Err(ApiError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    sqlx::query("UPDATE appointments SET status = ? WHERE id = ? AND salon_id = ?")
        .bind(target.as_str())
        .bind(appointment_id)
        .bind(salon_id)
        .execute(&state.db)
        .await?;

    tracing::info!(
        appointment_id,
        from = %current,
        to = %target,
        "appointment status changed"
    );

    let updated = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
        .bind(appointment_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// POST /api/salons/{id}/appointments/{appt_id}/confirm
pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    Path((salon_id, appointment_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    transition_appointment(&state, salon_id, appointment_id, AppointmentStatus::Confirmed).await
}

/// POST /api/salons/{id}/appointments/{appt_id}/cancel
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path((salon_id, appointment_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    transition_appointment(&state, salon_id, appointment_id, AppointmentStatus::Cancelled).await
}

/// POST /api/salons/{id}/appointments/{appt_id}/complete
pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Path((salon_id, appointment_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    transition_appointment(&state, salon_id, appointment_id, AppointmentStatus::Completed).await
}

/// DELETE /api/salons/{id}/appointments/{appt_id} — hard delete, removes the
/// record entirely (unlike cancellation, which keeps history).
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path((salon_id, appointment_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = ? AND salon_id = ?")
        .bind(appointment_id)
        .bind(salon_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("appointment"));
    }
    Ok(Json(ApiResponse::success(())))
}

// ── Helpers ──

async fn salon_exists(state: &AppState, salon_id: i64) -> Result<(), ApiError> {
    let exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM salons WHERE id = ?")
        .bind(salon_id)
        .fetch_one(&state.db)
        .await?;
    if !exists {
        return Err(ApiError::NotFound("salon"));
    }
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::time::Instant;

    async fn test_state() -> Arc<AppState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        Arc::new(AppState {
            db: pool,
            started_at: Instant::now(),
            client_booking_status: AppointmentStatus::Confirmed,
        })
    }

    /// One salon with one pending appointment; returns (salon_id, appt_id).
    async fn seed_appointment(state: &AppState, status: &str) -> (i64, i64) {
        let salon_id = sqlx::query(
            "INSERT INTO salons (owner_id, name, slug) VALUES ('owner-1', 'Studio', 'studio')",
        )
        .execute(&state.db)
        .await
        .unwrap()
        .last_insert_rowid();

        let prof_id = sqlx::query("INSERT INTO professionals (salon_id, name) VALUES (?, 'Ana')")
            .bind(salon_id)
            .execute(&state.db)
            .await
            .unwrap()
            .last_insert_rowid();

        let appt_id = sqlx::query(
            "INSERT INTO appointments
                 (salon_id, professional_id, date, time, status, client_name, client_phone)
             VALUES (?, ?, '2026-03-02', '10:00', ?, 'Maria', '11988887777')",
        )
        .bind(salon_id)
        .bind(prof_id)
        .bind(status)
        .execute(&state.db)
        .await
        .unwrap()
        .last_insert_rowid();

        (salon_id, appt_id)
    }

    #[tokio::test]
    async fn test_transition_pending_to_confirmed() {
        let state = test_state().await;
        let (salon, appt) = seed_appointment(&state, "pending").await;

        let result = transition_appointment(&state, salon, appt, AppointmentStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(result.0.data.as_ref().unwrap().status, "confirmed");
    }

    #[tokio::test]
    async fn test_transition_is_idempotent() {
        let state = test_state().await;
        let (salon, appt) = seed_appointment(&state, "confirmed").await;

        // Re-applying the current status succeeds without touching the row
        let result = transition_appointment(&state, salon, appt, AppointmentStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(result.0.data.as_ref().unwrap().status, "confirmed");
    }

    #[tokio::test]
    async fn test_transition_from_terminal_is_conflict() {
        let state = test_state().await;
        let (salon, appt) = seed_appointment(&state, "cancelled").await;

        let result =
            transition_appointment(&state, salon, appt, AppointmentStatus::Confirmed).await;
        assert!(matches!(result, Err(ApiError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_transition_skipping_confirmation_is_conflict() {
        let state = test_state().await;
        let (salon, appt) = seed_appointment(&state, "pending").await;

        let result =
            transition_appointment(&state, salon, appt, AppointmentStatus::Completed).await;
        assert!(matches!(result, Err(ApiError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_transition_scoped_to_salon() {
        let state = test_state().await;
        let (_salon, appt) = seed_appointment(&state, "pending").await;

        let result = transition_appointment(&state, 999, appt, AppointmentStatus::Confirmed).await;
        assert!(matches!(result, Err(ApiError::NotFound("appointment"))));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let state = test_state().await;
        let (salon, appt) = seed_appointment(&state, "pending").await;

        delete_appointment(State(state.clone()), Path((salon, appt)))
            .await
            .unwrap();
        let second = delete_appointment(State(state), Path((salon, appt))).await;
        assert!(matches!(second, Err(ApiError::NotFound("appointment"))));
    }
}
