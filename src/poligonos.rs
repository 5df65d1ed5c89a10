//! poligonos.rs
//! Agrupa filas limpias por clave (nombre de geocerca o de zona) en poligonos.
//! Orden estable: grupos por primera aparicion y vertices en orden de fila.

use std::collections::HashMap;

use crate::color::sanitize_color;
use crate::types::{FilaLimpia, Poligono, COLOR_DEFAULT};

/// Un poligono por clave distinta. Con `con_color`, el color sale de la primera fila del grupo.
pub fn construir_poligonos(filas: &[FilaLimpia], con_color: bool) -> Vec<Poligono> {
    let mut out: Vec<Poligono> = Vec::new();
    let mut idx: HashMap<&str, usize> = HashMap::new();

    for f in filas {
        let Some(clave) = f.clave.as_deref() else { continue };
        let i = *idx.entry(clave).or_insert_with(|| {
            out.push(Poligono {
                name: clave.to_string(),
                coords: Vec::new(),
                color: con_color.then(|| sanitize_color(f.color.as_deref(), COLOR_DEFAULT)),
            });
            out.len() - 1
        });
        out[i].coords.push((f.lat, f.lng));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fila(clave: &str, lat: f64, lng: f64, color: Option<&str>) -> FilaLimpia {
        FilaLimpia { clave: Some(clave.into()), lat, lng, color: color.map(Into::into) }
    }

    #[test]
    fn orden_de_primera_aparicion() {
        let filas = [fila("A", 1.0, 1.0, None), fila("B", 2.0, 2.0, None), fila("A", 3.0, 3.0, None)];
        let polys = construir_poligonos(&filas, false);
        let nombres: Vec<_> = polys.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(nombres, ["A", "B"]);
        assert_eq!(polys[0].coords, vec![(1.0, 1.0), (3.0, 3.0)]);
        assert_eq!(polys[1].coords, vec![(2.0, 2.0)]);
    }

    #[test]
    fn vertices_no_se_ordenan() {
        let filas = [fila("Z", 5.0, 5.0, None), fila("Z", 1.0, 9.0, None), fila("Z", 3.0, 0.0, None)];
        let polys = construir_poligonos(&filas, false);
        assert_eq!(polys[0].coords, vec![(5.0, 5.0), (1.0, 9.0), (3.0, 0.0)]);
    }

    #[test]
    fn color_de_la_primera_fila() {
        let filas = [
            fila("Z", 1.0, 1.0, Some("#111111")),
            fila("Z", 2.0, 2.0, Some("#222222")),
            fila("Y", 3.0, 3.0, None),
        ];
        let polys = construir_poligonos(&filas, true);
        assert_eq!(polys[0].color.as_deref(), Some("#111111"));
        assert_eq!(polys[1].color.as_deref(), Some(COLOR_DEFAULT));
    }

    #[test]
    fn sin_columna_color_no_hay_clave_color() {
        let filas = [fila("G", 1.0, 2.0, Some("255,0,0"))];
        let polys = construir_poligonos(&filas, false);
        assert_eq!(polys[0].color, None);
        let js = serde_json::to_value(&polys[0]).unwrap();
        assert!(js.get("color").is_none());
        assert_eq!(js["coords"], serde_json::json!([[1.0, 2.0]]));
    }

    #[test]
    fn filas_sin_clave_no_forman_poligono() {
        let mut huerfana = fila("X", 9.0, 9.0, None);
        huerfana.clave = None;
        let polys = construir_poligonos(&[huerfana, fila("A", 1.0, 1.0, None)], false);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].name, "A");
    }

    #[test]
    fn vacio_da_vacio() {
        assert!(construir_poligonos(&[], true).is_empty());
    }
}
