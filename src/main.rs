mod db;
mod grid;
mod routes;
mod services;
mod state;
mod tracker;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // GitHub OAuth is optional at startup: without it the API still serves,
    // but nobody can sign in.
    let github = services::auth::GitHubConfig::from_env();
    if github.is_none() {
        tracing::warn!("GitHub OAuth not configured; sign-in disabled");
    }

    let log_tx = services::worker::spawn_log_flush_worker(pool.clone());
    let state = state::AppState::new(pool, github, Some(log_tx));

    // Re-derives each user's "current scheduled activity" on a timer.
    let _refresh = services::worker::spawn_schedule_refresh_task(state.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "pegboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
