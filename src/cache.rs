//! cache.rs
//! Cache explicita de consultas: filas limpias por conjunto, cargadas una vez
//! y reutilizadas hasta que alguien la invalida o refresca.
//! Sin TTL ni expulsion.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::FuenteError;
use crate::fuente::Fuente;
use crate::types::{Conjunto, FilaLimpia};

/// Clave = parametros de la consulta.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClaveConsulta {
    pub conjunto: String,
    pub sql: String,
}

impl From<&Conjunto> for ClaveConsulta {
    fn from(c: &Conjunto) -> Self {
        Self { conjunto: c.nombre.clone(), sql: c.sql.clone() }
    }
}

#[derive(Clone, Debug)]
struct Entrada {
    filas: Arc<Vec<FilaLimpia>>,
    cargado: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct CacheConsultas {
    entradas: RwLock<HashMap<ClaveConsulta, Entrada>>,
}

impl CacheConsultas {
    pub fn new() -> Self { Self::default() }

    /// Devuelve lo cacheado o carga desde `fuente`. Un error no se cachea.
    pub async fn obtener(&self, fuente: &Fuente, conjunto: &Conjunto) -> Result<Arc<Vec<FilaLimpia>>, FuenteError> {
        let clave = ClaveConsulta::from(conjunto);
        if let Some(e) = self.entradas.read().await.get(&clave) {
            debug!("cache hit {} (cargado {})", clave.conjunto, e.cargado.to_rfc3339());
            return Ok(e.filas.clone());
        }
        self.refrescar(fuente, conjunto).await
    }

    /// Recarga siempre y reemplaza la entrada.
    pub async fn refrescar(&self, fuente: &Fuente, conjunto: &Conjunto) -> Result<Arc<Vec<FilaLimpia>>, FuenteError> {
        let filas = Arc::new(fuente.cargar(conjunto).await?);
        let mut m = self.entradas.write().await;
        m.insert(ClaveConsulta::from(conjunto), Entrada { filas: filas.clone(), cargado: Utc::now() });
        info!("cache: {} cargado ({} filas)", conjunto.nombre, filas.len());
        Ok(filas)
    }

    pub async fn invalidar(&self, clave: &ClaveConsulta) -> bool {
        self.entradas.write().await.remove(clave).is_some()
    }

    /// Vacia todo; devuelve cuantas entradas habia.
    pub async fn invalidar_todo(&self) -> usize {
        let mut m = self.entradas.write().await;
        let n = m.len();
        m.clear();
        n
    }

    pub async fn claves(&self) -> Vec<ClaveConsulta> {
        self.entradas.read().await.keys().cloned().collect()
    }

    /// Momento de carga de una entrada, si existe.
    pub async fn cargado(&self, clave: &ClaveConsulta) -> Option<DateTime<Utc>> {
        self.entradas.read().await.get(clave).map(|e| e.cargado)
    }
}
