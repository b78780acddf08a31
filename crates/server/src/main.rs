use config::{Args, SidecarConfig};
use polkadot_block_api::{app, logging, state::AppState};

#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_args();
    let config = SidecarConfig::load(&args)?;
    logging::init(&config.log)?;

    let addr = format!("{}:{}", config.express.host, config.express.port);
    tracing::info!("Log level: {}", config.log.level);
    tracing::info!("Substrate URL: {}", config.substrate.url);

    let state = AppState::new(config).await?;
    tracing::debug!(
        "Fee tables loaded for: {}",
        state.fee_tables.chain_names().join(", ")
    );

    let app = app::create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting server on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
