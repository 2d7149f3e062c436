//! Professional-facing views: the day/range agenda and a revenue summary.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::availability::sao_paulo_today;
use crate::booking::is_valid_date;
use crate::error::ApiError;
use crate::models::*;
use crate::AppState;

fn validate_range(from: &Option<String>, to: &Option<String>) -> Result<(), ApiError> {
    for date in [from, to].into_iter().flatten() {
        if !is_valid_date(date) {
            return Err(ApiError::Validation(
                "date must be in YYYY-MM-DD format".into(),
            ));
        }
    }
    Ok(())
}

async fn professional_exists(state: &AppState, id: i64) -> Result<(), ApiError> {
    let exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM professionals WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await?;
    if !exists {
        return Err(ApiError::NotFound("professional"));
    }
    Ok(())
}

// ── GET /api/professionals/{id}/agenda ──

/// Appointments for one professional, joined with service details, ordered
/// by date and time. Defaults to today when no range is given.
pub async fn agenda(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<i64>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<ApiResponse<Vec<AgendaEntry>>>, ApiError> {
    validate_range(&query.from, &query.to)?;
    professional_exists(&state, professional_id).await?;

    let today = sao_paulo_today();
    let from = query.from.unwrap_or_else(|| today.clone());
    let to = query.to.unwrap_or(today);

    let entries = sqlx::query_as::<_, AgendaEntry>(
        "SELECT a.id, a.date, a.time, a.status, a.client_name,
                s.name AS service_name, s.price AS service_price
         FROM appointments a
         LEFT JOIN services s ON s.id = a.service_id
         WHERE a.professional_id = ? AND a.date >= ? AND a.date <= ?
         ORDER BY a.date, a.time",
    )
    .bind(professional_id)
    .bind(&from)
    .bind(&to)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::success(entries)))
}

// ── GET /api/professionals/{id}/revenue ──

/// Revenue over a date range. Only confirmed and completed appointments
/// count; pending and cancelled ones never contribute.
pub async fn revenue(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<i64>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<ApiResponse<RevenueReport>>, ApiError> {
    validate_range(&query.from, &query.to)?;
    professional_exists(&state, professional_id).await?;

    let today = sao_paulo_today();
    let from = query.from.unwrap_or_else(|| today.clone());
    let to = query.to.unwrap_or(today);

    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT s.name, s.price
         FROM appointments a
         JOIN services s ON s.id = a.service_id
         WHERE a.professional_id = ? AND a.date >= ? AND a.date <= ?
           AND a.status IN ('confirmed', 'completed')",
    )
    .bind(professional_id)
    .bind(&from)
    .bind(&to)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::success(build_revenue_report(rows))))
}

/// Aggregate (service name, price) pairs into per-service counts and totals,
/// sorted by revenue descending.
pub fn build_revenue_report(rows: Vec<(String, i64)>) -> RevenueReport {
    let appointment_count = rows.len() as i64;
    let mut by_service: HashMap<String, (i64, i64)> = HashMap::new();
    let mut total_revenue = 0;

    for (name, price) in rows {
        total_revenue += price;
        let entry = by_service.entry(name).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += price;
    }

    let mut services: Vec<ServiceRevenue> = by_service
        .into_iter()
        .map(|(name, (count, revenue))| ServiceRevenue {
            name,
            count,
            revenue,
        })
        .collect();
    services.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.name.cmp(&b.name)));

    RevenueReport {
        total_revenue,
        appointment_count,
        services,
    }
}

// ── Tests ──
