use anyhow::Result;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use poisk_core::{source, SearchEngine};
use poisk_server::audit::AuditLog;
use poisk_server::build_app;
use poisk_server::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let started = Instant::now();
    let settings = Settings::load()?;
    let documents = source::load_documents(&settings.search_content)?;
    let stop_words = source::load_stop_words(&settings.stop_words)?;
    let engine = SearchEngine::build(
        documents,
        stop_words,
        settings.dicts_dir.as_deref(),
        settings.search.clone(),
    )?;
    tracing::info!(
        documents = engine.document_count(),
        elapsed = ?started.elapsed(),
        "search index ready, waiting for requests"
    );

    let audit = AuditLog::new(&settings.app_name, settings.app_log_limit);
    let app = build_app(engine, audit);
    let addr: SocketAddr = settings.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
