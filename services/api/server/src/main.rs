use anyhow::Context;
use dynamo_models::{DynamoRecordStore, InMemoryRecordStore, RecordStore};
use iaq_api::StoreBackend;
use iaq_api::shutdown::listen_for_shutdown_signals;
use std::sync::Arc;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

fn main() {
    let config = match iaq_api::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to build tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        if let Err(e) = setup(config).await {
            tracing::error!("Fatal error during setup: {e:#}");
            std::process::exit(1);
        }
    });
}

fn init_tracing(config: &iaq_api::Config) -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.rust_log))
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize tracing filter")?;

    let use_json = config.log_format != "pretty";

    if use_json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_timer(UtcTime::rfc_3339())
            .with_target(true)
            .with_level(true)
            .json();
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .pretty();
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    };

    Ok(())
}

async fn build_store(
    config: &iaq_api::Config,
) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Dynamodb => {
            let client = dynamo_models::connection::establish_connection(
                &config.connection_settings(),
            )
            .await;
            let store =
                DynamoRecordStore::connect(client, &config.iaq_table_name)
                    .await
                    .context("Failed to connect to DynamoDB")?;
            tracing::info!(
                table = %store.table_name(),
                region = %config.aws_region,
                "Using DynamoDB record store",
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!(
                "Using in-memory record store, readings are lost on exit"
            );
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}

async fn setup(config: iaq_api::Config) -> anyhow::Result<()> {
    init_tracing(&config)?;

    let version = iaq_api::VERSION.unwrap_or("unknown");
    let addr: String = format!("0.0.0.0:{}", config.api_service_port);
    tracing::info!("Starting iaq-api {version} at: {addr}");

    let store = build_store(&config).await?;

    let app_state = iaq_api::AppState::new(store, config)
        .context("Failed to create application state")?;
    let shutdown = app_state.shutdown.clone();
    let app = iaq_api::app(app_state);

    // Spawn shutdown signal handler
    let shutdown_handle = shutdown.clone();
    tokio::spawn(async move {
        listen_for_shutdown_signals().await;
        shutdown_handle.shutdown();
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait_for_shutdown().await })
        .await
        .context("Server exited with error")?;

    tracing::info!("Graceful shutdown sequence complete");
    Ok(())
}
