use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;

use analyzer::FeatureScaler;
use classifier::OnnxClassifier;
use codec::Ingest;
use server::routes;
use server::state::AppState;

mod args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = args::Args::parse();

    if !args.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }

    // The service cannot answer anything without the model.
    let classifier = OnnxClassifier::load(&args.model)
        .with_context(|| format!("loading model from {}", args.model.display()))?;
    log::info!("model loaded from {}", args.model.display());

    let ingest = Ingest::new(&args.scratch_dir).with_context(|| {
        format!("creating scratch directory {}", args.scratch_dir.display())
    })?;

    let state = AppState::new(Arc::new(classifier), FeatureScaler::trained(), ingest);
    let app = routes::router(state);

    let listener = TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("binding port {}", args.port))?;
    log::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("signal received, starting graceful shutdown");
}
