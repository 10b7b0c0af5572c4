//! Web command implementation.

use anyhow::{Context, Result};
use nsehist_lib::{ArchiveClient, Pacing, SnapshotSource};
use nsehist_web::WebConfig;
use std::net::SocketAddr;
use std::sync::Arc;

/// Serves the browser front-end until Ctrl+C.
pub(crate) async fn web(bind: SocketAddr) -> Result<()> {
    let client = ArchiveClient::with_defaults().context("Failed to build HTTP client")?;
    let source: Arc<dyn SnapshotSource> = Arc::new(client);

    let config = WebConfig {
        bind,
        pacing: Pacing::web_default(),
    };
    println!("Serving on http://{bind} (Ctrl+C to stop)");
    nsehist_web::serve(config, source).await?;

    Ok(())
}
