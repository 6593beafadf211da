use crate::api::AppState;
use crate::clients::groq::GroqClient;
use crate::config::Config;
use crate::services::plan_generation::PlanGenerationService;
use crate::store::{ProfileStore, local::LocalStore};

mod api;
mod clients;
mod config;
mod models;
mod services;
mod store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let records = LocalStore::new(&config.data_dir);
    tracing::info!(data_dir = %records.root().display(), "store.opened");
    let store = ProfileStore::new(records);

    let groq_client = GroqClient::new(&config)?;
    let plan_generation_service = PlanGenerationService::new(groq_client);

    let state = AppState::new(config.clone(), store, plan_generation_service);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = %config.port, model = %config.llm_model, "server.listening");
    axum::serve(listener, app).await?;
    Ok(())
}
