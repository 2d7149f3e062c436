//! Booking transaction: the only path that creates an appointment.
//!
//! Preconditions are checked in order, failing fast: structural validation,
//! salon existence, owner subscription, tenant-scoped professional/service
//! lookups, authoritative conflict check, insert. The partial unique index on
//! appointments(professional_id, date, time) WHERE status != 'cancelled'
//! backs the check-then-insert pair, so a lost race surfaces as a uniqueness
//! violation and is reported as the same conflict outcome.

use sqlx::SqlitePool;

use crate::availability::sao_paulo_now;
use crate::error::ApiError;
use crate::lifecycle::AppointmentStatus;
use crate::models::Appointment;

/// Who initiates the booking decides the default status: client self-service
/// bookings are confirmed immediately (no manual confirmation step), staff
/// entries start pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingChannel {
    ClientSelfService,
    Staff,
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub salon_id: i64,
    pub professional_id: i64,
    pub service_id: i64,
    pub date: String,
    pub time: String,
    pub client_name: String,
    pub client_phone: String,
}

/// Structurally valid, normalized booking input (name trimmed, phone reduced
/// to digits).
#[derive(Debug)]
struct ValidBooking {
    salon_id: i64,
    professional_id: i64,
    service_id: i64,
    date: String,
    time: String,
    client_name: String,
    client_phone: String,
}

// ── Validation ──

pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn is_valid_date(date: &str) -> bool {
    date.len() == 10 && chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Zero-padded 24-hour "HH:MM".
pub fn is_valid_time(time: &str) -> bool {
    let bytes = time.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let hour = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    let minute = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
    hour < 24 && minute < 60
}

fn validate(req: &BookingRequest) -> Result<ValidBooking, ApiError> {
    if req.salon_id <= 0 {
        return Err(ApiError::Validation("salon_id is required".into()));
    }
    if req.professional_id <= 0 {
        return Err(ApiError::Validation("professional_id is required".into()));
    }
    if req.service_id <= 0 {
        return Err(ApiError::Validation("service_id is required".into()));
    }
    if !is_valid_date(&req.date) {
        return Err(ApiError::Validation(
            "date must be in YYYY-MM-DD format".into(),
        ));
    }
    if !is_valid_time(&req.time) {
        return Err(ApiError::Validation("time must be in HH:MM format".into()));
    }

    let client_name = req.client_name.trim().to_string();
    if client_name.len() < 2 {
        return Err(ApiError::Validation(
            "client_name must have at least 2 characters".into(),
        ));
    }
    if client_name.len() > 100 {
        return Err(ApiError::Validation(
            "client_name must be less than 100 characters".into(),
        ));
    }

    // Brazilian local/mobile numbers: 10 or 11 digits after stripping
    let client_phone = normalize_phone(&req.client_phone);
    if client_phone.len() < 10 || client_phone.len() > 11 {
        return Err(ApiError::Validation(
            "client_phone must be a valid Brazilian phone number".into(),
        ));
    }

    Ok(ValidBooking {
        salon_id: req.salon_id,
        professional_id: req.professional_id,
        service_id: req.service_id,
        date: req.date.clone(),
        time: req.time.clone(),
        client_name,
        client_phone,
    })
}

// ── Shared config validators (salon/professional settings) ──

pub fn validate_day_set(days: &[u8]) -> Result<(), ApiError> {
    if days.iter().any(|d| *d > 6) {
        return Err(ApiError::Validation(
            "working days must be weekday numbers 0-6".into(),
        ));
    }
    Ok(())
}

pub fn validate_hours(start: &str, end: &str) -> Result<(), ApiError> {
    if !is_valid_time(start) || !is_valid_time(end) {
        return Err(ApiError::Validation("hours must be in HH:MM format".into()));
    }
    if start >= end {
        return Err(ApiError::Validation("start must be before end".into()));
    }
    Ok(())
}

// ── Transaction ──

/// Create an appointment. Single row insert, no cascading writes; any failure
/// leaves the store untouched.
pub async fn create_appointment(
    db: &SqlitePool,
    req: BookingRequest,
    default_status: AppointmentStatus,
) -> Result<Appointment, ApiError> {
    let input = validate(&req)?;

    // Tenant existence
    let salon = sqlx::query_as::<_, (i64, String)>("SELECT id, owner_id FROM salons WHERE id = ?")
        .bind(input.salon_id)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::NotFound("salon"))?;

    // Entitlement: the owner must hold an active subscription
    let subscription_status: Option<String> =
        sqlx::query_scalar("SELECT status FROM subscriptions WHERE owner_id = ?")
            .bind(&salon.1)
            .fetch_optional(db)
            .await?;
    if subscription_status.as_deref() != Some("active") {
        return Err(ApiError::SubscriptionInactive);
    }

    // Referential scoping: ids must resolve inside THIS salon and be active.
    // A professional belonging to another salon is "not found", never booked.
    let professional: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM professionals WHERE id = ? AND salon_id = ? AND is_active = 1",
    )
    .bind(input.professional_id)
    .bind(input.salon_id)
    .fetch_optional(db)
    .await?;
    if professional.is_none() {
        return Err(ApiError::NotFound("professional"));
    }

    let service: Option<i64> =
        sqlx::query_scalar("SELECT id FROM services WHERE id = ? AND salon_id = ? AND is_active = 1")
            .bind(input.service_id)
            .bind(input.salon_id)
            .fetch_optional(db)
            .await?;
    if service.is_none() {
        return Err(ApiError::NotFound("service"));
    }

    // Authoritative conflict check against persisted state
    let taken: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM appointments
         WHERE professional_id = ? AND date = ? AND time = ? AND status != 'cancelled'",
    )
    .bind(input.professional_id)
    .bind(&input.date)
    .bind(&input.time)
    .fetch_one(db)
    .await?;
    if taken {
        return Err(ApiError::SlotTaken);
    }

    // Insert. Two requests can pass the check above concurrently; the partial
    // unique index decides the winner and the loser gets the conflict outcome.
    let created_at = sao_paulo_now().format("%Y-%m-%d %H:%M:%S").to_string();
    let insert = sqlx::query(
        "INSERT INTO appointments
             (salon_id, professional_id, service_id, date, time, status, client_name, client_phone, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(input.salon_id)
    .bind(input.professional_id)
    .bind(input.service_id)
    .bind(&input.date)
    .bind(&input.time)
    .bind(default_status.as_str())
    .bind(&input.client_name)
    .bind(&input.client_phone)
    .bind(&created_at)
    .execute(db)
    .await;

    let id = match insert {
        Ok(result) => result.last_insert_rowid(),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(ApiError::SlotTaken);
        }
        Err(e) => return Err(ApiError::Database(e)),
    };

    let appointment = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
        .bind(id)
        .fetch_one(db)
        .await?;

    Ok(appointment)
}

/// Default status for a booking channel, with the client-side default
/// configurable (`CLIENT_BOOKING_STATUS`).
pub fn default_status_for(channel: BookingChannel, client_default: AppointmentStatus) -> AppointmentStatus {
    match channel {
        BookingChannel::ClientSelfService => client_default,
        BookingChannel::Staff => AppointmentStatus::Pending,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    fn request(salon: i64, professional: i64, service: i64, time: &str) -> BookingRequest {
        BookingRequest {
            salon_id: salon,
            professional_id: professional,
            service_id: service,
            date: "2026-03-02".into(), // a Monday
            time: time.into(),
            client_name: "Maria Silva".into(),
            client_phone: "(11) 98888-7777".into(),
        }
    }

    // ── Pure validation ──

    #[test]
    fn test_normalize_phone_strips_formatting() {
        assert_eq!(normalize_phone("(11) 98888-7777"), "11988887777");
        assert_eq!(normalize_phone("11 2345 6789"), "1123456789");
    }

    #[test]
    fn test_phone_too_short_rejected() {
        let mut req = request(1, 1, 1, "10:00");
        req.client_phone = "123".into();
        assert!(matches!(validate(&req), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_phone_ten_and_eleven_digits_accepted() {
        let mut req = request(1, 1, 1, "10:00");
        req.client_phone = "1123456789".into();
        assert!(validate(&req).is_ok());
        req.client_phone = "11988887777".into();
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_name_length_bounds() {
        let mut req = request(1, 1, 1, "10:00");
        req.client_name = " A ".into(); // one char after trim
        assert!(matches!(validate(&req), Err(ApiError::Validation(_))));
        req.client_name = "x".repeat(101);
        assert!(matches!(validate(&req), Err(ApiError::Validation(_))));
        req.client_name = "Jo".into();
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_date_format_enforced() {
        let mut req = request(1, 1, 1, "10:00");
        req.date = "02/03/2026".into();
        assert!(matches!(validate(&req), Err(ApiError::Validation(_))));
        req.date = "2026-02-30".into(); // not a real day
        assert!(matches!(validate(&req), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_time_format_enforced() {
        assert!(is_valid_time("09:30"));
        assert!(is_valid_time("00:00"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("09:60"));
        assert!(!is_valid_time("9:30"));
        assert!(!is_valid_time("09-30"));
        assert!(!is_valid_time("garbage"));
    }

    #[test]
    fn test_ids_must_be_positive() {
        assert!(matches!(
            validate(&request(0, 1, 1, "10:00")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate(&request(1, -5, 1, "10:00")),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_channel_defaults() {
        assert_eq!(
            default_status_for(BookingChannel::ClientSelfService, AppointmentStatus::Confirmed),
            AppointmentStatus::Confirmed
        );
        assert_eq!(
            default_status_for(BookingChannel::Staff, AppointmentStatus::Confirmed),
            AppointmentStatus::Pending
        );
    }

    #[test]
    fn test_validate_hours() {
        assert!(validate_hours("09:00", "18:00").is_ok());
        assert!(validate_hours("18:00", "09:00").is_err());
        assert!(validate_hours("09:00", "09:00").is_err());
        assert!(validate_hours("9am", "18:00").is_err());
    }

    #[test]
    fn test_validate_day_set() {
        assert!(validate_day_set(&[0, 1, 6]).is_ok());
        assert!(validate_day_set(&[7]).is_err());
    }

    // ── Transactional properties (in-memory SQLite) ──

    async fn test_pool() -> SqlitePool {
        // One connection: each connection to :memory: is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        pool
    }

    /// Seed one active salon (Mon–Sat 09:00–18:00) with an active
    /// subscription, one professional and one service. Returns their ids.
    async fn seed_salon(pool: &SqlitePool, owner: &str, slug: &str) -> (i64, i64, i64) {
        let salon_id = sqlx::query(
            "INSERT INTO salons (owner_id, name, slug, working_days, opening_start, opening_end)
             VALUES (?, 'Studio Bela', ?, '[1,2,3,4,5,6]', '09:00', '18:00')",
        )
        .bind(owner)
        .bind(slug)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();

        sqlx::query("INSERT INTO subscriptions (owner_id, status) VALUES (?, 'active')")
            .bind(owner)
            .execute(pool)
            .await
            .unwrap();

        let professional_id = sqlx::query(
            "INSERT INTO professionals (salon_id, name, available_days, available_start, available_end)
             VALUES (?, 'Ana', '[1,2,3,4,5]', '10:00', '19:00')",
        )
        .bind(salon_id)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();

        let service_id = sqlx::query(
            "INSERT INTO services (salon_id, name, price, duration_min) VALUES (?, 'Corte', 8000, 30)",
        )
        .bind(salon_id)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();

        sqlx::query("INSERT INTO professional_services (professional_id, service_id) VALUES (?, ?)")
            .bind(professional_id)
            .bind(service_id)
            .execute(pool)
            .await
            .unwrap();

        (salon_id, professional_id, service_id)
    }

    #[tokio::test]
    async fn test_booking_succeeds_and_normalizes_phone() {
        let pool = test_pool().await;
        let (salon, prof, service) = seed_salon(&pool, "owner-1", "studio-bela").await;

        let appt = create_appointment(
            &pool,
            request(salon, prof, service, "10:00"),
            AppointmentStatus::Confirmed,
        )
        .await
        .unwrap();

        assert_eq!(appt.status, "confirmed");
        assert_eq!(appt.client_phone, "11988887777");
        assert_eq!(appt.client_name, "Maria Silva");
        assert_eq!(appt.date, "2026-03-02");
        assert_eq!(appt.time, "10:00");
    }

    #[tokio::test]
    async fn test_double_booking_is_conflict() {
        let pool = test_pool().await;
        let (salon, prof, service) = seed_salon(&pool, "owner-1", "studio-bela").await;

        create_appointment(
            &pool,
            request(salon, prof, service, "10:00"),
            AppointmentStatus::Confirmed,
        )
        .await
        .unwrap();

        let second = create_appointment(
            &pool,
            request(salon, prof, service, "10:00"),
            AppointmentStatus::Confirmed,
        )
        .await;
        assert!(matches!(second, Err(ApiError::SlotTaken)));
    }

    #[tokio::test]
    async fn test_cancellation_frees_the_slot() {
        let pool = test_pool().await;
        let (salon, prof, service) = seed_salon(&pool, "owner-1", "studio-bela").await;

        let appt = create_appointment(
            &pool,
            request(salon, prof, service, "11:00"),
            AppointmentStatus::Confirmed,
        )
        .await
        .unwrap();

        sqlx::query("UPDATE appointments SET status = 'cancelled' WHERE id = ?")
            .bind(appt.id)
            .execute(&pool)
            .await
            .unwrap();

        let rebooked = create_appointment(
            &pool,
            request(salon, prof, service, "11:00"),
            AppointmentStatus::Confirmed,
        )
        .await;
        assert!(rebooked.is_ok());
    }

    #[tokio::test]
    async fn test_cross_tenant_professional_is_not_found() {
        let pool = test_pool().await;
        let (_salon_a, prof_a, _svc_a) = seed_salon(&pool, "owner-a", "salon-a").await;
        let (salon_b, _prof_b, svc_b) = seed_salon(&pool, "owner-b", "salon-b").await;

        // Professional from salon A booked against salon B
        let result = create_appointment(
            &pool,
            request(salon_b, prof_a, svc_b, "10:00"),
            AppointmentStatus::Confirmed,
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound("professional"))));
    }

    #[tokio::test]
    async fn test_inactive_subscription_is_refused() {
        let pool = test_pool().await;
        let (salon, prof, service) = seed_salon(&pool, "owner-1", "studio-bela").await;

        sqlx::query("UPDATE subscriptions SET status = 'past_due' WHERE owner_id = 'owner-1'")
            .execute(&pool)
            .await
            .unwrap();

        let result = create_appointment(
            &pool,
            request(salon, prof, service, "10:00"),
            AppointmentStatus::Confirmed,
        )
        .await;
        assert!(matches!(result, Err(ApiError::SubscriptionInactive)));
    }

    #[tokio::test]
    async fn test_inactive_professional_is_not_found() {
        let pool = test_pool().await;
        let (salon, prof, service) = seed_salon(&pool, "owner-1", "studio-bela").await;

        sqlx::query("UPDATE professionals SET is_active = 0 WHERE id = ?")
            .bind(prof)
            .execute(&pool)
            .await
            .unwrap();

        let result = create_appointment(
            &pool,
            request(salon, prof, service, "10:00"),
            AppointmentStatus::Confirmed,
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound("professional"))));
    }

    #[tokio::test]
    async fn test_unknown_salon_is_not_found() {
        let pool = test_pool().await;
        let result = create_appointment(
            &pool,
            request(999, 1, 1, "10:00"),
            AppointmentStatus::Confirmed,
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound("salon"))));
    }

    #[tokio::test]
    async fn test_unique_index_backs_the_race() {
        let pool = test_pool().await;
        let (salon, prof, service) = seed_salon(&pool, "owner-1", "studio-bela").await;

        create_appointment(
            &pool,
            request(salon, prof, service, "14:00"),
            AppointmentStatus::Confirmed,
        )
        .await
        .unwrap();

        // Bypass the pre-check and insert directly, as a racing process would
        let raw = sqlx::query(
            "INSERT INTO appointments
                 (salon_id, professional_id, service_id, date, time, status, client_name, client_phone)
             VALUES (?, ?, ?, '2026-03-02', '14:00', 'confirmed', 'Racer', '11911112222')",
        )
        .bind(salon)
        .bind(prof)
        .bind(service)
        .execute(&pool)
        .await;

        match raw {
            Err(sqlx::Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_bookings_exactly_one_wins() {
        let pool = test_pool().await;
        let (salon, prof, service) = seed_salon(&pool, "owner-1", "studio-bela").await;

        let (a, b) = tokio::join!(
            create_appointment(
                &pool,
                request(salon, prof, service, "15:00"),
                AppointmentStatus::Confirmed,
            ),
            create_appointment(
                &pool,
                request(salon, prof, service, "15:00"),
                AppointmentStatus::Confirmed,
            )
        );

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1);

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments
             WHERE professional_id = ? AND date = '2026-03-02' AND time = '15:00'
               AND status != 'cancelled'",
        )
        .bind(prof)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn test_staff_channel_defaults_to_pending() {
        let pool = test_pool().await;
        let (salon, prof, service) = seed_salon(&pool, "owner-1", "studio-bela").await;

        let appt = create_appointment(
            &pool,
            request(salon, prof, service, "16:00"),
            default_status_for(BookingChannel::Staff, AppointmentStatus::Confirmed),
        )
        .await
        .unwrap();
        assert_eq!(appt.status, "pending");
    }
}
