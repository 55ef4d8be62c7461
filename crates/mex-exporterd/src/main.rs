mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info};

use mex_api::HttpApi;
use mex_client::{Connector, Endpoint, EnvCredentials, HttpClient, MarathonApi};
use mex_core::MarathonScraper;
use mex_observe::logger_init;
use mex_prometheus::Exporter;

use crate::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Flags and logger
    let cli = Cli::parse();
    logger_init(&cli.logger())?;

    // 2) Configuration; every error here is fatal
    let settings = cli.settings()?;
    let endpoint = Endpoint::parse(&settings.marathon_uri, &EnvCredentials::from_env())
        .context("invalid --marathon.uri")?;
    info!(
        endpoint = %endpoint,
        labels = ?settings.labels.keys(),
        excluded = ?settings.filter.excluded(),
        "exporter configured"
    );

    // 3) Block until marathon answers
    let client: Arc<dyn MarathonApi> = Arc::new(HttpClient::new(endpoint.clone(), &settings.client)?);
    let mut connector = Connector::new(Arc::clone(&client), endpoint.redacted())
        .with_retry_interval(settings.retry_interval);
    let marathon = tokio::select! {
        info = connector.connect() => info,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted before marathon became reachable");
            return Ok(());
        }
    };
    info!(name = %marathon.name, version = %marathon.version, "connected to marathon");

    // 4) Exporter
    let scraper = MarathonScraper::new(client).with_filter(settings.filter);
    let exporter = Exporter::new(Arc::new(scraper), settings.labels, settings.exporter)?;
    for desc in exporter.describe()? {
        debug!(metric = %desc.fq_name, labels = ?desc.variable_labels, "registered metric");
    }

    // 5) Serve
    let router = HttpApi::new(Arc::new(exporter), &settings.metrics_path)?.router();
    let listener = TcpListener::bind(&settings.listen_address)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_address))?;
    info!(address = %settings.listen_address, path = %settings.metrics_path, "starting server");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down...");
        })
        .await?;

    Ok(())
}
