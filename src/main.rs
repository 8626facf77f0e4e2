use anyhow::Context;
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use genai_suite_api::database::manager::DatabaseManager;
use genai_suite_api::database::migrations::Ledger;
use genai_suite_api::handlers;
use genai_suite_api::middleware::session_auth;
use genai_suite_api::state::{build_state, AppState};

#[derive(Parser)]
#[command(name = "genai-suite-api", version, about = "GenAI Suite backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (refuses to start with pending migrations)
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply all pending schema migrations
    Migrate,
    /// Revert applied migrations down to (and keeping) the given id
    Revert {
        #[arg(long)]
        to: i64,
    },
    /// Show applied and pending migrations
    MigrationStatus,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(port).await,
        Command::Migrate => migrate().await,
        Command::Revert { to } => revert(to).await,
        Command::MigrationStatus => migration_status().await,
    }
}

async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let config = genai_suite_api::config::config();
    tracing::info!("starting GenAI Suite API in {:?} mode", config.environment);

    let pool = DatabaseManager::pool().await.context("database pool")?;

    // Migrations run at deploy time, before traffic. Starting a server
    // against a stale schema is an operator error, not something to fix
    // silently here.
    let ledger = Ledger::from_history()?;
    if ledger.has_pending(&pool).await? {
        anyhow::bail!("pending schema migrations; run `genai-suite-api migrate` first");
    }

    let state = build_state(pool).context("wiring handlers")?;
    let app = app(state);

    // Allow tests or deployments to override the port via env
    let port = port
        .or_else(|| {
            std::env::var("GENAI_API_PORT")
                .ok()
                .or_else(|| std::env::var("PORT").ok())
                .and_then(|s| s.parse::<u16>().ok())
        })
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on http://{bind_addr}");

    axum::serve(listener, app).await.context("server")
}

fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(handlers::auth::login))
        .route("/settings", get(handlers::settings::get_settings))
        .route("/blobs/:id", get(handlers::settings::get_blob));

    let protected = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/logout", post(handlers::auth::logout))
        // chat
        .route(
            "/api/conversations",
            get(handlers::conversations::list)
                .post(handlers::conversations::create)
                .delete(handlers::conversations::delete_all),
        )
        .route(
            "/api/conversations/:id",
            get(handlers::conversations::get)
                .patch(handlers::conversations::update)
                .delete(handlers::conversations::delete),
        )
        .route(
            "/api/conversations/:id/duplicate",
            post(handlers::conversations::duplicate),
        )
        .route(
            "/api/conversations/:id/messages",
            get(handlers::conversations::messages).post(handlers::conversations::send_message),
        )
        .route(
            "/api/conversations/:id/messages/:message_id/rate",
            post(handlers::conversations::rate_message),
        )
        // configurations and extensions
        .route("/api/configurations", get(handlers::extensions::list).post(handlers::extensions::create))
        .route(
            "/api/configurations/:id",
            put(handlers::extensions::update).delete(handlers::extensions::delete),
        )
        .route(
            "/api/configurations/:id/duplicate",
            post(handlers::extensions::duplicate),
        )
        .route(
            "/api/configurations/:id/extensions",
            get(handlers::extensions::list_extensions).post(handlers::extensions::create_extension),
        )
        .route(
            "/api/configurations/:id/user-values",
            get(handlers::extensions::get_user_values).put(handlers::extensions::update_user_values),
        )
        .route(
            "/api/extensions/:id",
            put(handlers::extensions::update_extension).delete(handlers::extensions::delete_extension),
        )
        // users and groups (admin checks inside the handlers)
        .route("/api/users", get(handlers::users::list).post(handlers::users::create))
        .route("/api/users/:id", put(handlers::users::update))
        .route(
            "/api/user-groups",
            get(handlers::users::list_groups).post(handlers::users::create_group),
        )
        .route(
            "/api/user-groups/:id",
            put(handlers::users::update_group).delete(handlers::users::delete_group),
        )
        // files and buckets
        .route("/api/files", get(handlers::files::list).post(handlers::files::upload))
        .route("/api/files/:id", delete(handlers::files::delete))
        .route(
            "/api/buckets",
            get(handlers::files::list_buckets).post(handlers::files::create_bucket),
        )
        .route(
            "/api/buckets/:id",
            put(handlers::files::update_bucket).delete(handlers::files::delete_bucket),
        )
        // settings and usage
        .route("/api/settings", put(handlers::settings::update_settings))
        .route("/api/blobs/:id", put(handlers::settings::upload_blob))
        .route("/api/usages", get(handlers::usages::get))
        .route_layer(from_fn_with_state(state.clone(), session_auth));

    public
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn migrate() -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await.context("database pool")?;
    let ledger = Ledger::from_history()?;

    match ledger.apply_forward(&pool).await? {
        Some(latest) => println!("schema is at migration {latest}"),
        None => println!("no migrations recorded; nothing to apply"),
    }

    Ok(())
}

async fn revert(to: i64) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await.context("database pool")?;
    let ledger = Ledger::from_history()?;

    match ledger.revert(&pool, to).await? {
        Some(latest) => println!("schema is at migration {latest}"),
        None => println!("all migrations reverted"),
    }

    Ok(())
}

async fn migration_status() -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await.context("database pool")?;
    let ledger = Ledger::from_history()?;

    let status = ledger.status(&pool).await?;

    println!("applied:");
    for migration in &status.applied {
        println!("  {} {} ({})", migration.id, migration.name, migration.applied_at);
    }
    if status.applied.is_empty() {
        println!("  (none)");
    }

    println!("pending:");
    for (id, name) in &status.pending {
        println!("  {id} {name}");
    }
    if status.pending.is_empty() {
        println!("  (none)");
    }

    Ok(())
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "GenAI Suite API",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/auth/login (public), /api/auth/* (session)",
            "settings": "/settings, /blobs/:id (public)",
            "chat": "/api/conversations[/:id] (session)",
            "admin": "/api/users, /api/user-groups, /api/configurations, /api/buckets (admin session)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
