//! types.rs
//! Modelos de datos compartidos: filas crudas de la BD, filas limpias,
//! poligonos para el mapa, definicion de conjuntos y configuracion del servicio.

use serde::{Deserialize, Serialize};

/// Color que usa el mapa cuando una zona no trae color valido.
pub const COLOR_DEFAULT: &str = "#3388ff";

/// Fila tal como sale de la fuente (lat/lng como texto libre).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilaCoord {
    /// `None` = clave NULL en la BD: no forma poligono pero cuenta para el centro.
    pub clave: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub color: Option<String>,
}

/// Fila con lat/lng ya convertidas a numero finito.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilaLimpia {
    pub clave: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub color: Option<String>,
}

impl From<FilaLimpia> for FilaCoord {
    fn from(f: FilaLimpia) -> Self {
        Self { clave: f.clave, lat: Some(f.lat.to_string()), lng: Some(f.lng.to_string()), color: f.color }
    }
}

/// Poligono (o polilinea) con nombre, vertices (lat, lng) en orden y color opcional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poligono {
    pub name: String,
    pub coords: Vec<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Nombres de columna de un conjunto. `color = None` => el esquema no tiene color.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Columnas {
    pub clave: String,
    pub lat: String,
    pub lng: String,
    pub color: Option<String>,
}

/// Un conjunto de datos: nombre, consulta SQL y mapeo de columnas.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Conjunto {
    pub nombre: String,
    pub sql: String,
    pub columnas: Columnas,
}

impl Conjunto {
    pub fn con_color(&self) -> bool { self.columnas.color.is_some() }
}

/// Los dos conjuntos que pinta la pagina.
#[derive(Clone, Debug)]
pub struct Conjuntos {
    pub geocercas: Conjunto,
    pub zonas: Conjunto,
}

/// Lo que consume la pagina: centro, zoom y las dos capas.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VistaMapa {
    pub centro: Option<(f64, f64)>,
    pub centro_default: (f64, f64),
    pub zoom: u8,
    pub geocercas: Vec<Poligono>,
    pub zonas: Vec<Poligono>,
    pub generado_utc: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SqlServerCfg {
    pub server: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub trust_cert: bool,
}

impl Default for SqlServerCfg {
    fn default() -> Self {
        Self {
            server: "localhost".into(),
            port: 1433,
            database: String::new(),
            username: String::new(),
            password: String::new(),
            trust_cert: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TipoFuente { SqlServer, Csv }

#[derive(Clone, Debug)]
pub struct AppCfg {
    pub bind: String,
    pub web_dir: String,
    pub fuente: TipoFuente,
    pub csv_dir: String,
    pub db: SqlServerCfg,
    pub schema_prefix: String,
    pub centro_default: (f64, f64),
    pub zoom: u8,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".into(),
            web_dir: "web".into(),
            fuente: TipoFuente::SqlServer,
            csv_dir: "data".into(),
            db: SqlServerCfg::default(),
            schema_prefix: "[dev_apprisa_delivery].[dbo]".into(),
            centro_default: (19.4326, -99.1332),
            zoom: 12,
        }
    }
}
