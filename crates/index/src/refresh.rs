// crates/index/src/refresh.rs
use taskmgr_core::{ProjectLayout, TaskConfig};
use tracing::info;

use crate::error::GenerateError;
use crate::{generate_export, generate_overview, generate_search_index, generate_summary, ArtifactReport};

/// Run every generator in order: overview, summary, export, search index.
///
/// Stops at the first failure; artifacts already written stay written.
pub async fn refresh_all(
    layout: &ProjectLayout,
    config: &TaskConfig,
) -> Result<Vec<ArtifactReport>, GenerateError> {
    let reports = vec![
        generate_overview(layout, config).await?,
        generate_summary(layout).await?,
        generate_export(layout).await?,
        generate_search_index(layout).await?,
    ];
    info!(root = %layout.root().display(), artifacts = reports.len(), "Refreshed all artifacts");
    Ok(reports)
}
