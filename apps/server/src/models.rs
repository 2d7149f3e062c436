use serde::{Deserialize, Serialize};

// ── Database models ──

/// Tenant root. `working_days` holds a JSON array of weekday numbers
/// (0 = Sunday .. 6 = Saturday) in a TEXT column.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Salon {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub slug: String,
    pub working_days: String,
    pub opening_start: String,
    pub opening_end: String,
    pub created_at: String,
}

impl Salon {
    pub fn working_day_set(&self) -> Vec<u8> {
        parse_day_set(&self.working_days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Professional {
    pub id: i64,
    pub salon_id: i64,
    pub name: String,
    pub specialty: String,
    pub available_days: String,
    pub available_start: String,
    pub available_end: String,
    pub is_active: bool,
    pub created_at: String,
}

impl Professional {
    pub fn available_day_set(&self) -> Vec<u8> {
        parse_day_set(&self.available_days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub id: i64,
    pub salon_id: i64,
    pub name: String,
    pub price: i64,
    pub duration_min: i64,
    pub category: String,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Appointment {
    pub id: i64,
    pub salon_id: i64,
    pub professional_id: i64,
    pub service_id: Option<i64>,
    pub date: String,
    pub time: String,
    pub status: String,
    pub client_name: String,
    pub client_phone: String,
    pub created_at: String,
}

/// Weekday sets are persisted as JSON arrays; a malformed value reads as
/// empty, which renders as "closed" rather than an error.
pub fn parse_day_set(json: &str) -> Vec<u8> {
    serde_json::from_str(json).unwrap_or_default()
}

pub fn day_set_to_json(days: &[u8]) -> String {
    serde_json::to_string(days).unwrap_or_else(|_| "[]".into())
}

// ── API request/response types ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub salon_id: i64,
    pub professional_id: i64,
    pub service_id: i64,
    pub date: String,
    pub time: String,
    pub client_name: String,
    pub client_phone: String,
}

/// Staff-channel booking: the salon comes from the URL path.
#[derive(Debug, Deserialize)]
pub struct StaffAppointmentRequest {
    pub professional_id: i64,
    pub service_id: i64,
    pub date: String,
    pub time: String,
    pub client_name: String,
    pub client_phone: String,
}

#[derive(Debug, Serialize)]
pub struct AppointmentCreated {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub professional_id: i64,
    pub date: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SlotStatus {
    pub time: String,
    pub booked: bool,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub date: String,
    pub slots: Vec<SlotStatus>,
}

// Public salon page payload. Never exposes owner_id.

#[derive(Debug, Serialize)]
pub struct PublicSalon {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub working_days: Vec<u8>,
    pub opening_hours: Hours,
}

#[derive(Debug, Serialize)]
pub struct PublicProfessional {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub available_days: Vec<u8>,
    pub available_hours: Hours,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProfessionalServiceLink {
    pub professional_id: i64,
    pub service_id: i64,
}

#[derive(Debug, Serialize)]
pub struct PublicSalonResponse {
    pub salon: PublicSalon,
    pub professionals: Vec<PublicProfessional>,
    pub services: Vec<Service>,
    pub professional_services: Vec<ProfessionalServiceLink>,
    pub subscription_active: bool,
}

// Owner/admin CRUD

#[derive(Debug, Deserialize)]
pub struct CreateSalonRequest {
    pub owner_id: String,
    pub name: String,
    pub slug: String,
    pub working_days: Option<Vec<u8>>,
    pub opening_hours: Option<Hours>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSalonSettingsRequest {
    pub name: Option<String>,
    pub working_days: Option<Vec<u8>>,
    pub opening_hours: Option<Hours>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfessionalRequest {
    pub name: String,
    pub specialty: Option<String>,
    pub available_days: Vec<u8>,
    pub available_hours: Hours,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfessionalRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub available_days: Option<Vec<u8>>,
    pub available_hours: Option<Hours>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SetProfessionalServicesRequest {
    pub service_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub price: i64,
    pub duration_min: i64,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub duration_min: Option<i64>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
}

// Professional's own views

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AgendaEntry {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub status: String,
    pub client_name: String,
    pub service_name: Option<String>,
    pub service_price: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ServiceRevenue {
    pub name: String,
    pub count: i64,
    pub revenue: i64,
}

#[derive(Debug, Serialize)]
pub struct RevenueReport {
    pub total_revenue: i64,
    pub appointment_count: i64,
    pub services: Vec<ServiceRevenue>,
}

// ── Response envelope ──

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
