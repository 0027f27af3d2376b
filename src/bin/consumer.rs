use clap::Parser;
use tracing::info;

use pathsentryx::{
    config::Settings,
    db, logging, messaging,
    messaging::consumer::{self, ConsumerContext},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Which bundle context's command queues to consume
    #[arg(long, value_enum, default_value_t = ConsumerContext::All)]
    context: ConsumerContext,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    logging::init(&settings.log_dir);
    info!(
        app = %settings.app_name,
        context = ?args.context,
        "starting consumer"
    );

    let db_pool = db::connect(&settings.database_url).await?;
    db::init_schema(&db_pool).await?;

    let amqp_pool = messaging::connect(&settings.rabbitmq_url).await?;

    tokio::select! {
        _ = consumer::run(amqp_pool, db_pool, args.context) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
