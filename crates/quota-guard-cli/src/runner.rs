//! One polling run, from configuration to summary

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use quota_guard_checkers::{
    CheckContext, CheckSettings, CheckerRegistry, Dispatcher, RegionSet, RunSummary,
};
use quota_guard_core::Config;
use quota_guard_provider::{AwsProvider, CloudProvider, FixtureProvider};
use quota_guard_sinks::create_sink;

use crate::quota_list::load_quota_list;

/// Live AWS provider, or canned responses when a fixture file is given.
pub async fn build_provider(fixtures: Option<&Path>) -> anyhow::Result<Arc<dyn CloudProvider>> {
    match fixtures {
        Some(path) => {
            let provider = FixtureProvider::from_file(path)
                .await
                .with_context(|| format!("Failed to load fixtures from {}", path.display()))?;
            tracing::info!(path = %path.display(), "Using fixture provider");
            Ok(Arc::new(provider))
        }
        None => Ok(Arc::new(AwsProvider::new())),
    }
}

/// Check every quota in the configured list and report the results.
///
/// Configuration, quota list and sink setup failures abort the run; individual
/// check failures only show up in the returned summary.
pub async fn execute(config: &Config, fixtures: Option<&Path>) -> anyhow::Result<RunSummary> {
    let source = config
        .quota_list
        .as_ref()
        .context("No quota list configured")?;
    let descriptors = load_quota_list(source, &config.current_region).await?;

    let provider = build_provider(fixtures).await?;
    let sink = create_sink(config)
        .await
        .context("Failed to create usage sink")?;

    tracing::info!(
        provider = provider.name(),
        sink = %config.sink,
        regions = ?config.regions,
        current_region = %config.current_region,
        "Starting quota run"
    );

    let context = CheckContext::new(provider, sink, CheckSettings::from_config(config));
    let dispatcher = Dispatcher::new(CheckerRegistry::builtin().await, context);
    let regions = RegionSet::new(config.regions.clone(), config.current_region.clone());

    Ok(dispatcher.run(&descriptors, &regions).await)
}
