//! Visor de geocercas y zonas de reparto.
//!
//! Lee los vertices desde SQL Server (o CSV), limpia las coordenadas, agrupa en
//! poligonos y los sirve a una pagina Leaflet.

pub mod api;
pub mod cache;
pub mod color;
pub mod config;
pub mod errors;
pub mod fuente;
pub mod limpieza;
pub mod mapa;
pub mod poligonos;
pub mod types;
