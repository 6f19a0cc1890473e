//! # Flujo de reserva
//!
//! Estado de la pantalla de reserva de un procedimiento: empleados, fecha,
//! horario del empleado y franja elegida.
//!
//! El horario depende de dos entradas independientes (empleado y fecha). Ambas
//! forman un [`ScheduleQuery`]; cada cambio emite un [`ScheduleTicket`] con un
//! número de secuencia creciente y solo se aplica la respuesta del último
//! ticket emitido. Así una respuesta lenta de una consulta anterior no pisa el
//! horario de la consulta actual.
//!
//! ```ignore
//! let mut flow = BookingFlow::new(procedure, today);
//! flow.load_employees(&api).await?;
//! if let Some(ticket) = flow.select_employee(3) {
//!     let slots = BookingFlow::fetch_schedule(&api, &ticket).await?;
//!     flow.apply_schedule(&ticket, slots);
//! }
//! flow.select_slot(12);
//! let notice = flow.confirm(&api).await;
//! ```

use chrono::NaiveDate;

use crate::api::middleware::ErrorLogExt;
use crate::api::{ApiClient, AppResult};
use crate::db::{Employee, NewAppointment, Procedure, ScheduleSlot};
use crate::local_time::{parse_timestamp, shift_local, to_wire};
use crate::notice::Notice;

/// Empleado y fecha cuyo horario se muestra
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub employee_id: Option<i64>,
    pub date: NaiveDate,
}

/// Petición de horario emitida para una consulta concreta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTicket {
    seq: u64,
    pub employee_id: i64,
    pub date: NaiveDate,
}

impl ScheduleTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    procedure: Procedure,
    employees: Vec<Employee>,
    query: ScheduleQuery,
    schedule: Vec<ScheduleSlot>,
    selected_slot: Option<i64>,
    latest_seq: u64,
}

impl BookingFlow {
    /// Empieza el flujo para un procedimiento con la fecha inicial indicada
    pub fn new(procedure: Procedure, date: NaiveDate) -> Self {
        Self {
            procedure,
            employees: Vec::new(),
            query: ScheduleQuery {
                employee_id: None,
                date,
            },
            schedule: Vec::new(),
            selected_slot: None,
            latest_seq: 0,
        }
    }

    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn query(&self) -> ScheduleQuery {
        self.query
    }

    /// Franjas del horario actual, reservadas incluidas
    pub fn schedule(&self) -> &[ScheduleSlot] {
        &self.schedule
    }

    /// Franja elegida, solo si sigue libre en el horario actual
    pub fn selected_slot(&self) -> Option<&ScheduleSlot> {
        let id = self.selected_slot?;
        self.schedule
            .iter()
            .find(|slot| slot.id == id && !slot.is_booked)
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_slot().map(|slot| slot.start_time.as_str())
    }

    pub async fn load_employees(&mut self, api: &ApiClient) -> AppResult<&[Employee]> {
        self.employees = api
            .list_employees()
            .await
            .log_error_context("loading employees")?;
        Ok(&self.employees)
    }

    /// Selecciona un empleado. Devuelve el ticket del horario a cargar si la
    /// consulta cambió.
    pub fn select_employee(&mut self, employee_id: i64) -> Option<ScheduleTicket> {
        self.update_query(ScheduleQuery {
            employee_id: Some(employee_id),
            date: self.query.date,
        })
    }

    /// Cambia la fecha. Sin empleado seleccionado no hay horario que cargar.
    pub fn select_date(&mut self, date: NaiveDate) -> Option<ScheduleTicket> {
        self.update_query(ScheduleQuery {
            employee_id: self.query.employee_id,
            date,
        })
    }

    fn update_query(&mut self, query: ScheduleQuery) -> Option<ScheduleTicket> {
        if query == self.query {
            return None;
        }

        self.query = query;
        self.schedule.clear();
        self.selected_slot = None;
        self.issue_ticket()
    }

    fn issue_ticket(&mut self) -> Option<ScheduleTicket> {
        self.latest_seq += 1;
        let employee_id = self.query.employee_id?;
        Some(ScheduleTicket {
            seq: self.latest_seq,
            employee_id,
            date: self.query.date,
        })
    }

    /// Carga el horario de un ticket. No toca el estado del flujo, por lo que
    /// varias cargas pueden estar en vuelo a la vez.
    pub async fn fetch_schedule(
        api: &ApiClient,
        ticket: &ScheduleTicket,
    ) -> AppResult<Vec<ScheduleSlot>> {
        api.get_schedule(ticket.employee_id, ticket.date).await
    }

    /// Aplica un horario recibido. Devuelve `false` y lo descarta si el ticket
    /// ya no es el último emitido.
    pub fn apply_schedule(&mut self, ticket: &ScheduleTicket, slots: Vec<ScheduleSlot>) -> bool {
        if ticket.seq != self.latest_seq {
            tracing::warn!(
                seq = ticket.seq,
                latest = self.latest_seq,
                employee_id = ticket.employee_id,
                "Descartando horario obsoleto"
            );
            return false;
        }

        self.schedule = slots;
        if self.selected_slot.is_some() && self.selected_slot().is_none() {
            tracing::warn!(slot_id = ?self.selected_slot, "La franja elegida ya no está libre");
            self.selected_slot = None;
        }
        true
    }

    /// Vuelve a cargar el horario de la consulta actual
    pub async fn refresh_schedule(&mut self, api: &ApiClient) -> AppResult<bool> {
        let Some(ticket) = self.issue_ticket() else {
            return Ok(false);
        };
        let slots = Self::fetch_schedule(api, &ticket)
            .await
            .log_error_context("loading schedule")?;
        Ok(self.apply_schedule(&ticket, slots))
    }

    /// Elige una franja del horario. Una franja reservada o desconocida se
    /// ignora sin error.
    pub fn select_slot(&mut self, slot_id: i64) -> bool {
        match self.schedule.iter().find(|slot| slot.id == slot_id) {
            Some(slot) if !slot.is_booked => {
                self.selected_slot = Some(slot.id);
                true
            }
            _ => false,
        }
    }

    /// Valida la selección y construye la petición de cita.
    ///
    /// El orden de validación es: empleado y franja, usuario, formato de la
    /// hora. La fecha enviada es `startTime` + 3 horas.
    pub fn prepare(&self, user_id: Option<i64>) -> Result<NewAppointment, Notice> {
        let (Some(employee_id), Some(start_time)) = (self.query.employee_id, self.selected_time())
        else {
            return Err(Notice::SelectEmployeeAndTime);
        };

        let user_id = user_id.ok_or(Notice::UserNotFound)?;

        let start = parse_timestamp(start_time).ok_or_else(|| {
            tracing::warn!(start_time = %start_time, "Formato de hora inválido");
            Notice::InvalidTime
        })?;

        Ok(NewAppointment {
            user_id,
            procedure_id: self.procedure.id,
            employee_id,
            date: to_wire(shift_local(start)),
        })
    }

    /// Confirma la cita: valida, toma el usuario de la sesión y llama a la API.
    ///
    /// Si la validación falla no se hace ninguna llamada. Éxito y fallo son
    /// resultados terminales; no hay reintentos.
    pub async fn confirm(&self, api: &ApiClient) -> Notice {
        let user_id = match api.session().user_id().await {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::warn!(error = %e, "No se pudo leer la sesión");
                None
            }
        };

        let appointment = match self.prepare(user_id) {
            Ok(appointment) => appointment,
            Err(notice) => {
                tracing::warn!(notice = ?notice, "Reserva no enviada");
                return notice;
            }
        };

        match api
            .create_appointment(&appointment)
            .await
            .log_error_context("creating appointment")
        {
            Ok(_) => {
                tracing::info!(
                    procedure_id = appointment.procedure_id,
                    employee_id = appointment.employee_id,
                    date = %appointment.date,
                    "Cita creada"
                );
                Notice::AppointmentConfirmed
            }
            Err(_) => Notice::AppointmentFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procedure() -> Procedure {
        Procedure {
            id: 5,
            name: "Массаж".into(),
            description: String::new(),
            price: 3500,
            image: None,
            category_id: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn slot(id: i64, start: &str, booked: bool) -> ScheduleSlot {
        ScheduleSlot {
            id,
            employee_id: Some(3),
            start_time: start.into(),
            is_booked: booked,
        }
    }

    fn flow_with_schedule(slots: Vec<ScheduleSlot>) -> BookingFlow {
        let mut flow = BookingFlow::new(procedure(), day(1));
        let ticket = flow.select_employee(3).unwrap();
        assert!(flow.apply_schedule(&ticket, slots));
        flow
    }

    #[test]
    fn date_change_without_employee_issues_no_ticket() {
        let mut flow = BookingFlow::new(procedure(), day(1));
        assert_eq!(flow.select_date(day(2)), None);
        assert_eq!(flow.query().date, day(2));
    }

    #[test]
    fn employee_and_date_both_trigger_a_fetch() {
        let mut flow = BookingFlow::new(procedure(), day(1));
        let first = flow.select_employee(3).unwrap();
        assert_eq!((first.employee_id, first.date), (3, day(1)));

        let second = flow.select_date(day(2)).unwrap();
        assert_eq!((second.employee_id, second.date), (3, day(2)));
        assert!(second.seq() > first.seq());

        // Misma consulta: nada que recargar
        assert_eq!(flow.select_employee(3), None);
        assert_eq!(flow.select_date(day(2)), None);
    }

    #[test]
    fn stale_schedule_is_discarded() {
        let mut flow = BookingFlow::new(procedure(), day(1));
        let old = flow.select_employee(3).unwrap();
        let new = flow.select_employee(4).unwrap();

        assert!(flow.apply_schedule(&new, vec![slot(2, "2024-06-01T12:00:00Z", false)]));
        assert!(!flow.apply_schedule(&old, vec![slot(1, "2024-06-01T10:00:00Z", false)]));
        assert_eq!(flow.schedule().len(), 1);
        assert_eq!(flow.schedule()[0].id, 2);
    }

    #[test]
    fn booked_slot_is_never_selectable() {
        let mut flow = flow_with_schedule(vec![
            slot(1, "2024-06-01T10:00:00Z", true),
            slot(2, "2024-06-01T11:00:00Z", false),
        ]);

        assert!(!flow.select_slot(1));
        assert_eq!(flow.selected_time(), None);

        assert!(flow.select_slot(2));
        assert!(!flow.select_slot(1));
        assert_eq!(flow.selected_time(), Some("2024-06-01T11:00:00Z"));
        assert!(!flow.select_slot(99));
    }

    #[test]
    fn refresh_drops_selection_that_became_booked() {
        let mut flow = flow_with_schedule(vec![slot(12, "2024-06-01T10:00:00Z", false)]);
        assert!(flow.select_slot(12));

        let ticket = flow.issue_ticket().unwrap();
        assert!(flow.apply_schedule(&ticket, vec![slot(12, "2024-06-01T10:00:00Z", true)]));

        assert_eq!(flow.selected_time(), None);
        assert_eq!(flow.prepare(Some(1)), Err(Notice::SelectEmployeeAndTime));
    }

    #[test]
    fn refresh_keeps_selection_that_is_still_free() {
        let mut flow = flow_with_schedule(vec![slot(12, "2024-06-01T10:00:00Z", false)]);
        assert!(flow.select_slot(12));

        let ticket = flow.issue_ticket().unwrap();
        assert!(flow.apply_schedule(
            &ticket,
            vec![
                slot(11, "2024-06-01T09:00:00Z", true),
                slot(12, "2024-06-01T10:00:00Z", false),
            ]
        ));

        assert_eq!(flow.selected_slot().map(|s| s.id), Some(12));
        assert_eq!(flow.selected_time(), Some("2024-06-01T10:00:00Z"));
    }

    #[test]
    fn query_change_clears_selection() {
        let mut flow = flow_with_schedule(vec![slot(2, "2024-06-01T11:00:00Z", false)]);
        assert!(flow.select_slot(2));

        flow.select_date(day(3));
        assert_eq!(flow.selected_time(), None);
        assert!(flow.schedule().is_empty());
    }

    #[test]
    fn prepare_requires_employee_and_time() {
        let flow = BookingFlow::new(procedure(), day(1));
        assert_eq!(flow.prepare(Some(1)), Err(Notice::SelectEmployeeAndTime));

        let flow = flow_with_schedule(vec![slot(2, "2024-06-01T11:00:00Z", false)]);
        assert_eq!(flow.prepare(Some(1)), Err(Notice::SelectEmployeeAndTime));
    }

    #[test]
    fn prepare_requires_user() {
        let mut flow = flow_with_schedule(vec![slot(2, "2024-06-01T11:00:00Z", false)]);
        flow.select_slot(2);
        assert_eq!(flow.prepare(None), Err(Notice::UserNotFound));
    }

    #[test]
    fn prepare_rejects_malformed_time() {
        let mut flow = flow_with_schedule(vec![slot(2, "mañana", false)]);
        flow.select_slot(2);
        assert_eq!(flow.prepare(Some(1)), Err(Notice::InvalidTime));
    }

    #[test]
    fn prepare_shifts_three_hours() {
        let mut flow = flow_with_schedule(vec![slot(2, "2024-06-01T10:00:00Z", false)]);
        flow.select_slot(2);

        let appointment = flow.prepare(Some(42)).unwrap();
        assert_eq!(
            appointment,
            NewAppointment {
                user_id: 42,
                procedure_id: 5,
                employee_id: 3,
                date: "2024-06-01T13:00:00Z".into(),
            }
        );
    }
}
