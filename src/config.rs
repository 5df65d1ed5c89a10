//! config.rs
//! Configuracion desde variables de entorno (tras cargar `.env` en main).
//! Lo que no viene o no parsea se queda con el valor de `AppCfg::default()`.

use std::env;

use crate::types::{AppCfg, TipoFuente};

pub fn app_cfg_from_env() -> AppCfg {
    app_cfg_from(|k| env::var(k).ok())
}

/// Igual que `app_cfg_from_env` pero con un lookup inyectable.
pub fn app_cfg_from<F>(var: F) -> AppCfg
where
    F: Fn(&str) -> Option<String>,
{
    let mut c = AppCfg::default();
    if let Some(v) = var("BIND") { c.bind = v; }
    if let Some(v) = var("WEB_DIR") { c.web_dir = v; }
    if let Some(v) = var("CSV_DIR") { c.csv_dir = v; }
    if let Some(v) = var("FUENTE") {
        c.fuente = match v.trim().to_ascii_lowercase().as_str() {
            "csv" => TipoFuente::Csv,
            _ => TipoFuente::SqlServer,
        };
    }

    // DB_SERVER admite "host" o "host,puerto" (formato ODBC)
    if let Some(v) = var("DB_SERVER") {
        match v.split_once(',') {
            Some((host, port)) => {
                c.db.server = host.trim().to_string();
                c.db.port = port.trim().parse().unwrap_or(c.db.port);
            }
            None => c.db.server = v.trim().to_string(),
        }
    }
    if let Some(v) = var("DB_PORT") { c.db.port = v.parse().unwrap_or(c.db.port); }
    if let Some(v) = var("DB_DATABASE") { c.db.database = v; }
    if let Some(v) = var("DB_USERNAME") { c.db.username = v; }
    if let Some(v) = var("DB_PASSWORD") { c.db.password = v; }
    if let Some(v) = var("DB_TRUST_CERT") { c.db.trust_cert = parse_bool(&v).unwrap_or(c.db.trust_cert); }
    if let Some(v) = var("DB_SCHEMA_PREFIX") { c.schema_prefix = v; }

    if let Some(v) = var("MAPA_CENTRO_LAT") { c.centro_default.0 = v.parse().unwrap_or(c.centro_default.0); }
    if let Some(v) = var("MAPA_CENTRO_LNG") { c.centro_default.1 = v.parse().unwrap_or(c.centro_default.1); }
    if let Some(v) = var("MAPA_ZOOM") { c.zoom = v.parse().unwrap_or(c.zoom); }
    c
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "si" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
