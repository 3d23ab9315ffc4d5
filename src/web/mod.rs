mod routes;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::report::ReportLimits;

use routes::make_app;

/// Run the upload server until the process is stopped.
pub fn launch(bind: &str, limits: ReportLimits) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(serve(bind, limits))
}

/// Bind `bind` and serve the upload routes.
async fn serve(bind: &str, limits: ReportLimits) -> Result<()> {
    let app = make_app(limits);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("cannot listen on {bind}"))?;

    info!("Serving upload page on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
