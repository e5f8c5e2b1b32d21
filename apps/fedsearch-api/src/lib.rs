pub mod routes;
pub mod state;

use std::net::SocketAddr;

use clap::Parser;
use fedsearch_cli::ConfigArgs;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = fedsearch_cli::VERSION,
	rename_all = "kebab",
	styles = fedsearch_cli::styles(),
)]
pub struct Args {
	#[command(flatten)]
	pub config: ConfigArgs,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = fedsearch_config::load(&args.config.config)?;

	init_tracing(&config);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;

	if config.metrics.enabled
		&& let Some(bind) = config.metrics.prometheus_bind.as_deref()
	{
		let metrics_addr: SocketAddr = bind.parse()?;

		PrometheusBuilder::new().with_http_listener(metrics_addr).install()?;
		tracing::info!(%metrics_addr, "Prometheus exporter listening.");
	}

	let state = AppState::new(config).await?;

	if state.service.cfg.warmup.enabled {
		let service = state.service.clone();

		tokio::spawn(async move {
			let report = service.run_warmup().await;

			tracing::info!(
				attempts = report.attempts,
				succeeded = report.succeeded,
				"Query warmup finished."
			);
		});
	}

	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

fn init_tracing(config: &fedsearch_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
