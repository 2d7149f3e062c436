mod availability;
mod booking;
mod db;
mod error;
mod handlers;
mod lifecycle;
mod models;
mod rate_limit;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lifecycle::AppointmentStatus;
use rate_limit::{
    rate_limit_admin, rate_limit_agenda, rate_limit_booking, rate_limit_public, RateLimiter,
};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub started_at: Instant,
    /// Status a client self-service booking starts in. Staff-entered
    /// bookings always start pending.
    pub client_booking_status: AppointmentStatus,
}

/// Rate limit cleanup interval (seconds).
const RATE_LIMIT_CLEANUP_SECS: u64 = 300;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:belagenda.db?mode=rwc".into());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let public_origin = std::env::var("PUBLIC_ORIGIN").unwrap_or_default();

    // Client bookings default to confirmed; set CLIENT_BOOKING_STATUS=pending
    // for salons that want to approve every booking manually
    let client_booking_status = match std::env::var("CLIENT_BOOKING_STATUS").as_deref() {
        Ok("pending") => AppointmentStatus::Pending,
        _ => AppointmentStatus::Confirmed,
    };

    // ── Tracing ──
    let env_filter = EnvFilter::from_default_env().add_directive("info".parse()?);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── Database ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    db::run_migrations(&pool).await?;

    let state = Arc::new(AppState {
        db: pool,
        started_at: Instant::now(),
        client_booking_status,
    });

    // ── Rate limiter + periodic cleanup ──
    let rate_limiter = RateLimiter::new();
    let cleanup_limiter = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(RATE_LIMIT_CLEANUP_SECS));
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup();
        }
    });

    // ── CORS: whitelist PUBLIC_ORIGIN when configured, otherwise allow any ──
    let cors = if !public_origin.is_empty() {
        let origins: Vec<axum::http::HeaderValue> = vec![
            public_origin
                .parse()
                .map_err(|_| anyhow::anyhow!("PUBLIC_ORIGIN must be a valid origin"))?,
            "http://localhost:5173".parse()?, // Vite dev server
        ];
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // ── Router (groups with per-group rate limits) ──

    // 1. No-limit: health check
    let no_limit_routes = Router::new().route("/api/health", get(handlers::health::health));

    // 2. Public: salon page + availability (60 req/min)
    let public_routes = Router::new()
        .route("/api/salons/{salon_id}", get(handlers::client::public_salon))
        .route(
            "/api/salons/{salon_id}/availability",
            get(handlers::client::availability),
        )
        .layer(from_fn_with_state(rate_limiter.clone(), rate_limit_public));

    // 3. Booking creation: strictest limit (5 req/5min)
    let booking_routes = Router::new()
        .route(
            "/api/appointments",
            post(handlers::client::create_appointment),
        )
        .layer(from_fn_with_state(rate_limiter.clone(), rate_limit_booking));

    // 4. Professional views (30 req/min)
    let agenda_routes = Router::new()
        .route(
            "/api/professionals/{id}/agenda",
            get(handlers::professional::agenda),
        )
        .route(
            "/api/professionals/{id}/revenue",
            get(handlers::professional::revenue),
        )
        .layer(from_fn_with_state(rate_limiter.clone(), rate_limit_agenda));

    // 5. Admin: salon management + appointment lifecycle (120 req/min)
    let admin_routes = Router::new()
        .route("/api/salons", post(handlers::admin::create_salon))
        .route(
            "/api/salons/{salon_id}/settings",
            put(handlers::admin::update_salon_settings),
        )
        .route(
            "/api/salons/{salon_id}/professionals",
            get(handlers::admin::list_professionals),
        )
        .route(
            "/api/salons/{salon_id}/professionals",
            post(handlers::admin::create_professional),
        )
        .route(
            "/api/salons/{salon_id}/professionals/{prof_id}",
            put(handlers::admin::update_professional),
        )
        .route(
            "/api/salons/{salon_id}/professionals/{prof_id}",
            delete(handlers::admin::deactivate_professional),
        )
        .route(
            "/api/salons/{salon_id}/professionals/{prof_id}/services",
            put(handlers::admin::set_professional_services),
        )
        .route(
            "/api/salons/{salon_id}/services",
            get(handlers::admin::list_services),
        )
        .route(
            "/api/salons/{salon_id}/services",
            post(handlers::admin::create_service),
        )
        .route(
            "/api/salons/{salon_id}/services/{svc_id}",
            put(handlers::admin::update_service),
        )
        .route(
            "/api/salons/{salon_id}/services/{svc_id}",
            delete(handlers::admin::deactivate_service),
        )
        .route(
            "/api/salons/{salon_id}/appointments",
            get(handlers::admin::list_appointments),
        )
        .route(
            "/api/salons/{salon_id}/appointments",
            post(handlers::admin::create_staff_appointment),
        )
        .route(
            "/api/salons/{salon_id}/appointments/{appt_id}/confirm",
            post(handlers::admin::confirm_appointment),
        )
        .route(
            "/api/salons/{salon_id}/appointments/{appt_id}/cancel",
            post(handlers::admin::cancel_appointment),
        )
        .route(
            "/api/salons/{salon_id}/appointments/{appt_id}/complete",
            post(handlers::admin::complete_appointment),
        )
        .route(
            "/api/salons/{salon_id}/appointments/{appt_id}",
            delete(handlers::admin::delete_appointment),
        )
        .layer(from_fn_with_state(rate_limiter.clone(), rate_limit_admin));

    let app = Router::new()
        .merge(no_limit_routes)
        .merge(public_routes)
        .merge(booking_routes)
        .merge(agenda_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    tracing::info!("BelAgenda server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
