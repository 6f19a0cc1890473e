//! # Perfil del usuario
//!
//! Cálculos sobre el perfil descargado: orden cronológico de las citas, gasto
//! total, descuento de fidelidad y elegibilidad para dejar reseña. Incluye el
//! estado de los formularios de reseña de la pantalla de perfil.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::str::FromStr;

use crate::api::middleware::ErrorLogExt;
use crate::api::ApiClient;
use crate::db::{Appointment, NewReview, Profile, Rating};
use crate::local_time::{format_date, format_time};
use crate::notice::Notice;

/// Tramos de descuento: (gasto mínimo inclusivo, porcentaje), de mayor a menor
pub const LOYALTY_TIERS: [(i64, u8); 3] = [(200_000, 20), (100_000, 15), (50_000, 10)];

/// Qué citas cuentan para el gasto total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpendPolicy {
    /// Todas las citas del perfil, pasadas o futuras
    #[default]
    All,
    /// Solo las citas cuya fecha ya pasó
    CompletedOnly,
}

impl FromStr for SpendPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SpendPolicy::All),
            "completed" => Ok(SpendPolicy::CompletedOnly),
            other => Err(other.to_string()),
        }
    }
}

/// Citas ordenadas por fecha ascendente, sin modificar la lista original.
/// El orden es estable para citas con la misma fecha.
pub fn sort_by_date(appointments: &[Appointment]) -> Vec<&Appointment> {
    let mut sorted: Vec<&Appointment> = appointments.iter().collect();
    sorted.sort_by_key(|a| a.date);
    sorted
}

pub fn total_spend<'a, I>(appointments: I) -> i64
where
    I: IntoIterator<Item = &'a Appointment>,
{
    appointments
        .into_iter()
        .map(|a| a.procedure.price)
        .fold(0i64, i64::saturating_add)
}

/// Porcentaje de descuento para un gasto total
pub fn loyalty_discount(total: i64) -> u8 {
    LOYALTY_TIERS
        .iter()
        .find(|(threshold, _)| total >= *threshold)
        .map(|(_, percent)| *percent)
        .unwrap_or(0)
}

/// Una cita admite reseña si su fecha es estrictamente anterior a `now`
pub fn is_review_eligible(appointment: &Appointment, now: DateTime<Utc>) -> bool {
    appointment.date < now
}

/// Gasto total según la política elegida
pub fn spend_for(profile: &Profile, now: DateTime<Utc>, policy: SpendPolicy) -> i64 {
    match policy {
        SpendPolicy::All => total_spend(&profile.appointments),
        SpendPolicy::CompletedOnly => total_spend(
            profile
                .appointments
                .iter()
                .filter(|a| is_review_eligible(a, now)),
        ),
    }
}

/// Tarjeta de una cita lista para mostrar
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentCard<'a> {
    pub appointment: &'a Appointment,
    /// Fecha local `dd.mm.yyyy`
    pub date: String,
    /// Hora local `HH:MM`
    pub time: String,
    /// «Выполнено»: la fecha ya pasó
    pub completed: bool,
}

impl AppointmentCard<'_> {
    pub fn review_eligible(&self) -> bool {
        self.completed
    }
}

/// Resumen del perfil calculado en un instante concreto
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary<'a> {
    pub profile: &'a Profile,
    pub cards: Vec<AppointmentCard<'a>>,
    pub total_spend: i64,
    pub discount: u8,
}

impl<'a> ProfileSummary<'a> {
    /// Se recalcula en cada render: la elegibilidad depende de `now`
    pub fn build(profile: &'a Profile, now: DateTime<Utc>, policy: SpendPolicy) -> Self {
        let cards = sort_by_date(&profile.appointments)
            .into_iter()
            .map(|appointment| AppointmentCard {
                appointment,
                date: format_date(appointment.date),
                time: format_time(appointment.date),
                completed: is_review_eligible(appointment, now),
            })
            .collect();

        let total_spend = spend_for(profile, now, policy);

        ProfileSummary {
            profile,
            cards,
            total_spend,
            discount: loyalty_discount(total_spend),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    pub rating: Option<Rating>,
    pub comment: String,
}

/// Formularios de reseña de la pantalla de perfil.
///
/// Cada cita tiene su formulario desplegable; el borrador (estrellas y texto)
/// es compartido entre todas las citas.
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    open: HashSet<i64>,
    draft: ReviewDraft,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abre o cierra el formulario de una cita; devuelve el nuevo estado
    pub fn toggle_form(&mut self, appointment_id: i64) -> bool {
        if self.open.remove(&appointment_id) {
            false
        } else {
            self.open.insert(appointment_id);
            true
        }
    }

    pub fn is_open(&self, appointment_id: i64) -> bool {
        self.open.contains(&appointment_id)
    }

    /// Fija las estrellas; un valor fuera de 1..=5 se ignora
    pub fn set_rating(&mut self, stars: u8) -> bool {
        match Rating::try_from(stars) {
            Ok(rating) => {
                self.draft.rating = Some(rating);
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.draft.comment = comment.into();
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    /// Valida el borrador antes de cualquier llamada
    pub fn prepare(
        &self,
        user_id: i64,
        appointment: &Appointment,
        now: DateTime<Utc>,
    ) -> Result<NewReview, Notice> {
        if !is_review_eligible(appointment, now) {
            return Err(Notice::ReviewNotAvailable);
        }

        let rating = self.draft.rating.ok_or(Notice::ReviewIncomplete)?;
        let comment = self.draft.comment.trim();
        if comment.is_empty() {
            return Err(Notice::ReviewIncomplete);
        }

        Ok(NewReview {
            user_id,
            procedure_id: appointment.procedure.id,
            rating,
            comment: comment.to_string(),
        })
    }

    /// Envía la reseña de una cita.
    ///
    /// Éxito: se limpia el borrador y se cierra el formulario de esa cita.
    /// Un 409 del servidor significa que la reseña ya existe; cualquier otro
    /// fallo es un error genérico y el formulario queda abierto.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        user_id: i64,
        appointment: &Appointment,
        now: DateTime<Utc>,
    ) -> Notice {
        let review = match self.prepare(user_id, appointment, now) {
            Ok(review) => review,
            Err(notice) => return notice,
        };

        match api
            .submit_review(&review)
            .await
            .log_error_warn("submitting review")
        {
            Ok(_) => {
                tracing::info!(
                    appointment_id = appointment.id,
                    procedure_id = review.procedure_id,
                    rating = review.rating.value(),
                    "Reseña enviada"
                );
                self.draft = ReviewDraft::default();
                self.open.remove(&appointment.id);
                Notice::ReviewAdded
            }
            Err(e) if e.is_conflict() => Notice::ReviewAlreadyExists,
            Err(_) => Notice::ReviewFailed,
        }
    }
}
