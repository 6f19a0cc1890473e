//! Hora local del salón.
//!
//! El servidor guarda marcas de tiempo UTC y la aplicación siempre las muestra
//! y las envía desplazadas un número fijo de horas. El desplazamiento no
//! depende de la zona horaria del dispositivo.

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};

pub const LOCAL_OFFSET_HOURS: i64 = 3;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Aplica el desplazamiento fijo de +3 horas
pub fn shift_local(t: DateTime<Utc>) -> DateTime<Utc> {
    t + Duration::hours(LOCAL_OFFSET_HOURS)
}

/// Interpreta el `startTime` de una franja.
///
/// Acepta RFC 3339 (`2024-06-01T10:00:00Z`, `2024-06-01T10:00:00.000+00:00`)
/// y fechas sin zona (`2024-06-01T10:00[:00]`), que se toman como UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Marca de tiempo absoluta tal como se envía al servidor
pub fn to_wire(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `HH:MM` de la hora local
pub fn format_time(t: DateTime<Utc>) -> String {
    shift_local(t).format("%H:%M").to_string()
}

/// `dd.mm.yyyy` de la fecha local
pub fn format_date(t: DateTime<Utc>) -> String {
    shift_local(t).format("%d.%m.%Y").to_string()
}
