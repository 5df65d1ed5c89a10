//! limpieza.rs
//!
//! Limpieza de coordenadas que llegan como texto libre desde la BD.
//!
//! - `,` decimal se cambia por `.` (BD con locale es/mx)
//! - se eliminan todos los caracteres que no sean digito, `.` o `-`
//! - si lat o lng no parsean, la fila entera se descarta
//!
//! No se intenta reparar nada mas: `"1.2.3"` o `"--5"` simplemente no parsean.

use crate::types::{FilaCoord, FilaLimpia};

/// Convierte un valor crudo a `f64` finito; `None` si no hay numero.
pub fn limpiar_coordenada(raw: Option<&str>) -> Option<f64> {
    let txt: String = raw
        .unwrap_or_default()
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    txt.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Filas con lat Y lng validas, en el mismo orden de entrada.
pub fn limpiar_filas<I>(filas: I) -> Vec<FilaLimpia>
where
    I: IntoIterator<Item = FilaCoord>,
{
    filas
        .into_iter()
        .filter_map(|f| {
            let lat = limpiar_coordenada(f.lat.as_deref())?;
            let lng = limpiar_coordenada(f.lng.as_deref())?;
            Some(FilaLimpia { clave: f.clave, lat, lng, color: f.color })
        })
        .collect()
}
