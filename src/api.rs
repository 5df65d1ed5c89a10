//! api.rs
//! Rutas HTTP: /health, /api/config, /api/mapa, /api/geocercas, /api/zonas,
//! /map/geojson y POST /api/refrescar. El resto se sirve desde `web/` (pagina Leaflet).

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir};
use tracing::warn;

use crate::cache::CacheConsultas;
use crate::errors::FuenteError;
use crate::fuente::Fuente;
use crate::mapa::{a_geojson, construir_vista};
use crate::poligonos::construir_poligonos;
use crate::types::{AppCfg, Conjunto, Conjuntos, Poligono, VistaMapa};

#[derive(Clone)]
pub struct ApiState {
    pub cache: Arc<CacheConsultas>,
    pub fuente: Arc<Fuente>,
    pub conjuntos: Arc<Conjuntos>,
    pub cfg: Arc<AppCfg>,
}

pub fn router(state: ApiState) -> Router {
    let web = ServeDir::new(&state.cfg.web_dir);
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/config", get(config_mapa))
        .route("/api/mapa", get(mapa))
        .route("/api/geocercas", get(geocercas))
        .route("/api/zonas", get(zonas))
        .route("/map/geojson", get(map_geojson))
        .route("/api/refrescar", post(refrescar))
        .fallback_service(web)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

/// Fallo de la fuente (BD/CSV): la pagina recibe 502 con el motivo.
#[derive(Debug)]
pub struct ApiError(pub FuenteError);

impl From<FuenteError> for ApiError {
    fn from(e: FuenteError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("fuente: {}", self.0);
        (StatusCode::BAD_GATEWAY, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

async fn poligonos_de(st: &ApiState, conjunto: &Conjunto) -> Result<Vec<Poligono>, ApiError> {
    let filas = st.cache.obtener(&st.fuente, conjunto).await?;
    Ok(construir_poligonos(&filas, conjunto.con_color()))
}

async fn vista(st: &ApiState) -> Result<VistaMapa, ApiError> {
    let geo = st.cache.obtener(&st.fuente, &st.conjuntos.geocercas).await?;
    let zon = st.cache.obtener(&st.fuente, &st.conjuntos.zonas).await?;
    Ok(construir_vista(&geo, &zon, &st.cfg))
}

/// Centro y zoom por defecto; no toca la fuente, sirve aunque la BD este caida.
pub async fn config_mapa(State(st): State<ApiState>) -> Json<serde_json::Value> {
    Json(json!({ "centro_default": st.cfg.centro_default, "zoom": st.cfg.zoom }))
}

pub async fn mapa(State(st): State<ApiState>) -> Result<Json<VistaMapa>, ApiError> {
    Ok(Json(vista(&st).await?))
}

pub async fn geocercas(State(st): State<ApiState>) -> Result<Json<Vec<Poligono>>, ApiError> {
    Ok(Json(poligonos_de(&st, &st.conjuntos.geocercas).await?))
}

pub async fn zonas(State(st): State<ApiState>) -> Result<Json<Vec<Poligono>>, ApiError> {
    Ok(Json(poligonos_de(&st, &st.conjuntos.zonas).await?))
}

/// FeatureCollection con content-type geo+json.
pub async fn map_geojson(State(st): State<ApiState>) -> Result<Response, ApiError> {
    let fc = a_geojson(&vista(&st).await?);
    let body = serde_json::to_string(&fc).unwrap_or("{\"type\":\"FeatureCollection\",\"features\":[]}".into());
    Ok(([(CONTENT_TYPE, "application/geo+json; charset=utf-8")], body).into_response())
}

/// Vacia la cache; la siguiente peticion vuelve a la BD.
pub async fn refrescar(State(st): State<ApiState>) -> impl IntoResponse {
    let n = st.cache.invalidar_todo().await;
    Json(json!({ "invalidadas": n }))
}
