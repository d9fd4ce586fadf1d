use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use worklink::app::{build_router, AppState};
use worklink::auth::session::derive_key;
use worklink::config::AppConfig;
use worklink::db::community_repository::{CommunityRepository, MongoCommunityRepository};
use worklink::db::repository::{DocumentRepository, MongoDocumentRepository};
use worklink::db::user_repository::{MongoUserRepository, UserRepository};
use worklink::messaging::client::{GraphMessagingService, MessagingService};

/// Document sharing and workplace account linking server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path of the configuration file (defaults to `worklink.toml`).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worklink=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Worklink server...");

    let config = AppConfig::load(args.config.as_deref())?;

    // Connect to MongoDB
    let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let mongo_db = mongo_client.database(&config.mongodb_database);

    let document_repo: Arc<dyn DocumentRepository> =
        Arc::new(MongoDocumentRepository::new(&mongo_db));
    let user_repo: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&mongo_db));
    let community_repo: Arc<dyn CommunityRepository> =
        Arc::new(MongoCommunityRepository::new(&mongo_db));

    tracing::info!("Connected to MongoDB database '{}'", config.mongodb_database);

    let messaging: Arc<dyn MessagingService> = Arc::new(GraphMessagingService::new(
        config.graph_api_url.clone(),
        config.graph_access_token.clone(),
    ));

    if config.demo_mode {
        tracing::info!("Demo mode enabled");
        worklink::demo_seeder::seed_demo_data(
            user_repo.as_ref(),
            community_repo.as_ref(),
            document_repo.as_ref(),
        )
        .await?;
    }

    let app_state = AppState {
        document_repo,
        user_repo,
        community_repo,
        messaging,
        cookie_key: derive_key(&config.session_secret),
        app_secret: config.app_secret.clone(),
        signed_request_max_age: chrono::Duration::seconds(config.signed_request_max_age_secs),
        demo_mode: config.demo_mode,
    };

    let app = build_router(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    tracing::info!("Listening on http://{}", config.site_addr);
    let listener = tokio::net::TcpListener::bind(&config.site_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.site_addr))?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
