//! fuente.rs
//!
//! Lectura de los conjuntos (geocercas / zonas) desde su origen:
//! - SQL Server (tiberius sobre un TcpStream de tokio)
//! - CSV en un directorio, `<dir>/<conjunto>.csv`, para trabajar sin BD
//!
//! Cada columna se busca por nombre y se mapea a `FilaCoord`. Si la fuente falla
//! (BD caida, credenciales, columna que no existe) se devuelve el error: aqui no
//! se esconde nada, eso solo lo hace la limpieza de coordenadas.

use std::path::{Path, PathBuf};

use tiberius::{AuthMethod, Client, ColumnData, Config};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::{debug, info};

use crate::errors::FuenteError;
use crate::limpieza::limpiar_filas;
use crate::types::{AppCfg, Columnas, Conjunto, Conjuntos, FilaCoord, FilaLimpia, SqlServerCfg, TipoFuente};

/// Geocercas: un registro por vertice, agrupado por `geofence_name`. Sin color.
pub fn conjunto_geocercas(prefijo: &str) -> Conjunto {
    Conjunto {
        nombre: "geocercas".into(),
        sql: format!(
            "SELECT g.id_geofence, g.geofence_name, gc.lat, gc.lng \
             FROM {prefijo}.tbl_geofences AS g \
             JOIN {prefijo}.tbl_geofences_coordinates AS gc ON gc.geofence = g.id_geofence"
        ),
        columnas: Columnas { clave: "geofence_name".into(), lat: "lat".into(), lng: "lng".into(), color: None },
    }
}

/// Zonas: un registro por vertice con `zona_color` repetido en cada fila.
pub fn conjunto_zonas(prefijo: &str) -> Conjunto {
    Conjunto {
        nombre: "zonas".into(),
        sql: format!(
            "SELECT z.zona_name, z.zona_color, zc.lat, zc.lng \
             FROM {prefijo}.tbl_zonas AS z \
             JOIN {prefijo}.tbl_zonas_coordinates AS zc ON z.id_zona = zc.zona"
        ),
        columnas: Columnas {
            clave: "zona_name".into(),
            lat: "lat".into(),
            lng: "lng".into(),
            color: Some("zona_color".into()),
        },
    }
}

pub fn conjuntos_default(prefijo: &str) -> Conjuntos {
    Conjuntos { geocercas: conjunto_geocercas(prefijo), zonas: conjunto_zonas(prefijo) }
}

#[derive(Clone, Debug)]
pub enum Fuente {
    SqlServer(SqlServerCfg),
    Csv { dir: PathBuf },
}

impl Fuente {
    pub fn from_cfg(cfg: &AppCfg) -> Self {
        match cfg.fuente {
            TipoFuente::SqlServer => Fuente::SqlServer(cfg.db.clone()),
            TipoFuente::Csv => Fuente::Csv { dir: PathBuf::from(&cfg.csv_dir) },
        }
    }

    /// Para logs (sin password).
    pub fn describir(&self) -> String {
        match self {
            Fuente::SqlServer(c) => format!("sqlserver://{}@{}:{}/{}", c.username, c.server, c.port, c.database),
            Fuente::Csv { dir } => format!("csv:{}", dir.display()),
        }
    }

    /// Filas crudas tal como vienen del origen.
    pub async fn leer(&self, conjunto: &Conjunto) -> Result<Vec<FilaCoord>, FuenteError> {
        match self {
            Fuente::SqlServer(cfg) => leer_sqlserver(cfg, conjunto).await,
            Fuente::Csv { dir } => leer_csv(dir, conjunto),
        }
    }

    /// Lee y limpia: solo quedan filas con lat/lng numericas.
    pub async fn cargar(&self, conjunto: &Conjunto) -> Result<Vec<FilaLimpia>, FuenteError> {
        let crudas = self.leer(conjunto).await?;
        let n_crudas = crudas.len();
        let limpias = limpiar_filas(crudas);
        info!(
            "{}: {} filas leidas, {} validas ({} descartadas)",
            conjunto.nombre,
            n_crudas,
            limpias.len(),
            n_crudas - limpias.len()
        );
        Ok(limpias)
    }
}

fn posicion(nombres: &[&str], columna: &str, conjunto: &Conjunto) -> Result<usize, FuenteError> {
    nombres
        .iter()
        .position(|n| n.trim().eq_ignore_ascii_case(columna))
        .ok_or_else(|| FuenteError::ColumnaFaltante { conjunto: conjunto.nombre.clone(), columna: columna.to_string() })
}

/// Indices (clave, lat, lng, color?) dentro de una cabecera.
fn indices(nombres: &[&str], conjunto: &Conjunto) -> Result<(usize, usize, usize, Option<usize>), FuenteError> {
    let c = &conjunto.columnas;
    let i_color = c.color.as_deref().map(|col| posicion(nombres, col, conjunto)).transpose()?;
    Ok((
        posicion(nombres, &c.clave, conjunto)?,
        posicion(nombres, &c.lat, conjunto)?,
        posicion(nombres, &c.lng, conjunto)?,
        i_color,
    ))
}

// -------------------------------
// SQL Server
// -------------------------------

async fn leer_sqlserver(cfg: &SqlServerCfg, conjunto: &Conjunto) -> Result<Vec<FilaCoord>, FuenteError> {
    let mut config = Config::new();
    config.host(&cfg.server);
    config.port(cfg.port);
    if !cfg.database.is_empty() {
        config.database(&cfg.database);
    }
    config.authentication(AuthMethod::sql_server(&cfg.username, &cfg.password));
    if cfg.trust_cert {
        config.trust_cert();
    }

    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;
    let mut client = Client::connect(config, tcp.compat_write()).await?;

    debug!("consulta {}: {}", conjunto.nombre, conjunto.sql);
    let rows = client.simple_query(conjunto.sql.as_str()).await?.into_first_result().await?;
    let Some(primera) = rows.first() else { return Ok(Vec::new()) };
    let nombres: Vec<&str> = primera.columns().iter().map(|c| c.name()).collect();
    let (i_clave, i_lat, i_lng, i_color) = indices(&nombres, conjunto)?;

    let mut out = Vec::with_capacity(rows.len());
    let mut sin_clave = 0usize;
    for row in rows {
        let celdas: Vec<ColumnData<'static>> = row.into_iter().collect();
        // sin clave la fila se queda: no forma poligono pero entra en el centro
        let clave = celdas.get(i_clave).and_then(celda_texto);
        sin_clave += usize::from(clave.is_none());
        out.push(FilaCoord {
            clave,
            lat: celdas.get(i_lat).and_then(celda_texto),
            lng: celdas.get(i_lng).and_then(celda_texto),
            color: i_color.and_then(|i| celdas.get(i)).and_then(celda_color),
        });
    }
    if sin_clave > 0 {
        debug!("{}: {} filas sin clave", conjunto.nombre, sin_clave);
    }
    Ok(out)
}

/// Texto de una celda; los numericos se pasan a texto para que la limpieza los trate igual.
fn celda_texto(dato: &ColumnData<'_>) -> Option<String> {
    match dato {
        ColumnData::String(s) => s.as_ref().map(|s| s.to_string()),
        ColumnData::F64(v) => v.as_ref().map(|x| x.to_string()),
        ColumnData::F32(v) => v.as_ref().map(|x| x.to_string()),
        ColumnData::I64(v) => v.as_ref().map(|x| x.to_string()),
        ColumnData::I32(v) => v.as_ref().map(|x| x.to_string()),
        ColumnData::I16(v) => v.as_ref().map(|x| x.to_string()),
        ColumnData::U8(v) => v.as_ref().map(|x| x.to_string()),
        ColumnData::Numeric(v) => v.as_ref().map(|x| x.to_string()),
        _ => None,
    }
}

/// El color solo cuenta si es texto.
fn celda_color(dato: &ColumnData<'_>) -> Option<String> {
    match dato {
        ColumnData::String(s) => s.as_ref().map(|s| s.to_string()),
        _ => None,
    }
}

// -------------------------------
// CSV
// -------------------------------

fn leer_csv(dir: &Path, conjunto: &Conjunto) -> Result<Vec<FilaCoord>, FuenteError> {
    let path = dir.join(format!("{}.csv", conjunto.nombre));
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_path(&path)?;
    let headers = rdr.headers()?.clone();
    let nombres: Vec<&str> = headers.iter().collect();
    let (i_clave, i_lat, i_lng, i_color) = indices(&nombres, conjunto)?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let campo = |i: usize| rec.get(i).filter(|s| !s.is_empty()).map(str::to_string);
        out.push(FilaCoord {
            clave: Some(rec.get(i_clave).unwrap_or_default().to_string()),
            lat: campo(i_lat),
            lng: campo(i_lng),
            color: i_color.and_then(campo),
        });
    }
    Ok(out)
}
