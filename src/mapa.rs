//! mapa.rs
//!
//! Arma lo que pinta la pagina a partir de las filas limpias:
//! - poligonos de geocercas (sin color) y zonas (con color)
//! - centro del mapa = media de todas las filas validas de geocercas
//! - export GeoJSON: geocercas como LineString, zonas como Polygon cerrado
//!
//! Los poligonos se construyen de nuevo en cada llamada.

use chrono::{SecondsFormat, Utc};
use geo::{Centroid, MultiPoint, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::poligonos::construir_poligonos;
use crate::types::{AppCfg, FilaLimpia, Poligono, VistaMapa};

/// Media (lat, lng) de todas las filas, tengan clave o no. `None` si no hay ninguna.
pub fn centro(filas: &[FilaLimpia]) -> Option<(f64, f64)> {
    let puntos: MultiPoint<f64> = filas
        .iter()
        .map(|f| Point::new(f.lng, f.lat))
        .collect::<Vec<_>>()
        .into();
    puntos.centroid().map(|c| (c.y(), c.x()))
}

pub fn construir_vista(filas_geo: &[FilaLimpia], filas_zonas: &[FilaLimpia], cfg: &AppCfg) -> VistaMapa {
    let geocercas = construir_poligonos(filas_geo, false);
    let zonas = construir_poligonos(filas_zonas, true);
    VistaMapa {
        centro: centro(filas_geo),
        centro_default: cfg.centro_default,
        zoom: cfg.zoom,
        geocercas,
        zonas,
        generado_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn propiedades(p: &Poligono, tipo: &str) -> JsonObject {
    let mut props = JsonObject::new();
    props.insert("name".into(), json!(p.name));
    props.insert("kind".into(), json!(tipo));
    if let Some(c) = &p.color {
        props.insert("color".into(), json!(c));
    }
    props
}

fn feature(geom: Value, props: JsonObject) -> Feature {
    Feature { bbox: None, geometry: Some(Geometry::new(geom)), id: None, properties: Some(props), foreign_members: None }
}

// GeoJSON va en [lng, lat]
fn posiciones(p: &Poligono) -> Vec<Vec<f64>> {
    p.coords.iter().map(|&(lat, lng)| vec![lng, lat]).collect()
}

pub fn a_geojson(vista: &VistaMapa) -> FeatureCollection {
    let mut features = Vec::with_capacity(vista.geocercas.len() + vista.zonas.len());
    for p in &vista.geocercas {
        features.push(feature(Value::LineString(posiciones(p)), propiedades(p, "geocerca")));
    }
    for p in &vista.zonas {
        let mut anillo = posiciones(p);
        if anillo.first() != anillo.last() {
            if let Some(primero) = anillo.first().cloned() {
                anillo.push(primero);
            }
        }
        features.push(feature(Value::Polygon(vec![anillo]), propiedades(p, "zona")));
    }
    FeatureCollection { bbox: None, features, foreign_members: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fila(clave: &str, lat: f64, lng: f64, color: Option<&str>) -> FilaLimpia {
        FilaLimpia { clave: Some(clave.into()), lat, lng, color: color.map(Into::into) }
    }

    #[test]
    fn centro_es_la_media_de_filas() {
        let filas = [fila("A", 1.0, 10.0, None), fila("B", 3.0, 20.0, None), fila("A", 5.0, 30.0, None)];
        let (lat, lng) = centro(&filas).unwrap();
        assert!((lat - 3.0).abs() < 1e-9);
        assert!((lng - 20.0).abs() < 1e-9);
        assert_eq!(centro(&[]), None);
    }

    #[test]
    fn filas_sin_clave_cuentan_para_el_centro() {
        let mut huerfana = fila("X", 3.0, 30.0, None);
        huerfana.clave = None;
        let vista = construir_vista(&[fila("A", 1.0, 10.0, None), huerfana], &[], &AppCfg::default());
        assert_eq!(vista.geocercas.len(), 1);
        assert_eq!(vista.geocercas[0].coords, vec![(1.0, 10.0)]);
        let (lat, lng) = vista.centro.unwrap();
        assert!((lat - 2.0).abs() < 1e-9);
        assert!((lng - 20.0).abs() < 1e-9);
    }

    #[test]
    fn vista_end_to_end() {
        let zonas = crate::limpieza::limpiar_filas(vec![
            crate::types::FilaCoord {
                clave: Some("Zone1".into()),
                lat: Some("19,40".into()),
                lng: Some("-99,10".into()),
                color: Some("255,0,0".into()),
            },
            crate::types::FilaCoord {
                clave: Some("Zone1".into()),
                lat: Some("19,41".into()),
                lng: Some("-99,11".into()),
                color: Some("0,0,0".into()),
            },
        ]);
        assert_eq!(zonas.len(), 2);
        let vista = construir_vista(&[], &zonas, &AppCfg::default());
        assert_eq!(vista.centro, None);
        assert_eq!(vista.zonas.len(), 1);
        assert_eq!(vista.zonas[0].name, "Zone1");
        assert_eq!(vista.zonas[0].coords, vec![(19.40, -99.10), (19.41, -99.11)]);
        assert_eq!(vista.zonas[0].color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn geojson_en_lng_lat_y_anillo_cerrado() {
        let geo = [fila("G", 1.0, 2.0, None), fila("G", 3.0, 4.0, None)];
        let zon = [fila("Z", 0.0, 0.0, Some("#abc")), fila("Z", 0.0, 1.0, None), fila("Z", 1.0, 1.0, None)];
        let vista = construir_vista(&geo, &zon, &AppCfg::default());
        let fc = a_geojson(&vista);
        assert_eq!(fc.features.len(), 2);

        let js = serde_json::to_value(&fc).unwrap();
        assert_eq!(js["features"][0]["geometry"]["type"], "LineString");
        assert_eq!(js["features"][0]["geometry"]["coordinates"], json!([[2.0, 1.0], [4.0, 3.0]]));
        assert!(js["features"][0]["properties"].get("color").is_none());

        let anillo = &js["features"][1]["geometry"]["coordinates"][0];
        assert_eq!(anillo.as_array().unwrap().len(), 4);
        assert_eq!(anillo[0], anillo[3]);
        assert_eq!(js["features"][1]["properties"]["color"], "#abc");
        assert_eq!(js["features"][1]["properties"]["kind"], "zona");
    }
}
