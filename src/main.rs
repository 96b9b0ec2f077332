use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foodgram::infrastructure::AppState;
use foodgram::{config, db, import, seed, server};

/// Value following `flag` on the command line
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodgram=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    let db = db::init_db(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to initialize database: {}", e);
        e
    })?;

    // One-shot ingredient import
    let args: Vec<String> = std::env::args().collect();
    if let Some(path) = flag_value(&args, "--import-ingredients") {
        tracing::info!("Importing ingredients from {}", path);
        let content = tokio::fs::read(&path).await?;
        let report = import::import_ingredients(&db, &content).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        match seed::seed_demo_data(&db).await {
            Ok(inserted) => tracing::info!("Demo data seeded ({} new tags).", inserted),
            Err(e) => tracing::error!("Failed to seed data: {}", e),
        }
    }

    tokio::fs::create_dir_all(config.media_root.join("recipes")).await?;

    let state = AppState::from_config(db, &config);
    let app = server::build_router(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Foodgram server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
