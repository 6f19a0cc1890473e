//! Modelos de datos tal como los ve el cliente.
//!
//! El almacenamiento autoritativo es el servidor; aquí solo están las formas
//! JSON (nombres `camelCase` en el cable) que envía y recibe la API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::local_time::parse_timestamp;

/// Acepta RFC 3339 y también fechas sin zona (`2024-06-01T10:00:00`),
/// que el servidor envía en algunos perfiles; estas se toman como UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("fecha inválida: {}", raw)))
}

/// Credencial persistida localmente: token + id de usuario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Respuesta de `/login` y `/register`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Servicio del spa (procedimiento)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Franja horaria de un empleado.
///
/// `start_time` se conserva como texto: la validación del formato ocurre al
/// confirmar la cita, no al recibir el horario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub id: i64,
    #[serde(default)]
    pub employee_id: Option<i64>,
    pub start_time: String,
    #[serde(default)]
    pub is_booked: bool,
}

/// Subconjunto del procedimiento embebido en una cita
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureSummary {
    pub id: i64,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub date: DateTime<Utc>,
    pub procedure: ProcedureSummary,
    pub employee: EmployeeSummary,
    /// Bandera del servidor. La vista de perfil no confía en ella y calcula
    /// el estado comparando `date` con el momento actual.
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub total_orders_amount: Option<i64>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

/// Cuerpo de `POST /appointment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub user_id: i64,
    pub procedure_id: i64,
    pub employee_id: i64,
    /// Marca de tiempo absoluta RFC 3339 (`2024-06-01T13:00:00Z`)
    pub date: String,
}

/// Cuerpo de `POST /schedule/book`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlot {
    pub schedule_id: i64,
}

/// Cuerpo de `POST /review`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_id: i64,
    pub procedure_id: i64,
    pub rating: Rating,
    pub comment: String,
}

/// Valoración de 1 a 5 estrellas
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(value)
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
