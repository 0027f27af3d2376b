use clap::Parser;
use std::sync::Arc;
use tracing::info;

use pathsentryx::{config::Settings, db, logging, messaging, web};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    logging::init(&settings.log_dir);
    info!(
        app = %settings.app_name,
        environment = %settings.environment,
        "starting server"
    );

    let db_pool = db::connect(&settings.database_url).await?;
    db::init_schema(&db_pool).await?;

    let amqp_pool = messaging::connect(&settings.rabbitmq_url).await?;
    let channel = messaging::get_channel(&amqp_pool).await?;
    messaging::declare_topology(&channel).await?;

    let listen_addr = settings.listen_addr.clone();
    let app = web::create_router(db_pool, amqp_pool, Arc::new(settings));

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(address = %listen_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("shutdown signal received");
}
