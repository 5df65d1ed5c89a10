use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use geocercas::{api, cache::CacheConsultas, config, fuente};

#[tokio::main]
async fn main() -> Result<()> {
    // .env primero para que RUST_LOG y DB_* salgan de ahi
    let env_file = dotenvy::dotenv().ok();

    // Logs
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Some(p) = env_file {
        info!("Variables cargadas de {}", p.display());
    }

    let app_cfg = config::app_cfg_from_env();
    let fuente = Arc::new(fuente::Fuente::from_cfg(&app_cfg));
    let conjuntos = Arc::new(fuente::conjuntos_default(&app_cfg.schema_prefix));
    let cache = Arc::new(CacheConsultas::new());
    info!("Fuente: {}", fuente.describir());

    // Precarga; si falla la pagina lo mostrara al pedir /api/mapa
    for conjunto in [&conjuntos.geocercas, &conjuntos.zonas] {
        if let Err(e) = cache.obtener(&fuente, conjunto).await {
            warn!("precarga {}: {e}", conjunto.nombre);
        }
    }

    // API
    let bind = app_cfg.bind.clone();
    let app = api::router(api::ApiState { cache, fuente, conjuntos, cfg: Arc::new(app_cfg) });
    info!("Escuchando en http://{}", bind);
    let listener = tokio::net::TcpListener::bind(&bind).await.with_context(|| format!("bind {bind}"))?;
    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Señal de salida recibida"); }
    }

    Ok(())
}
