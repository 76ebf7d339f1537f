use tracing::Level;
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present.
    let _ = dotenvy::dotenv();

    // INFO everywhere, DEBUG for the LLM service crate.
    let env_filter = ai_llm_service::telemetry::env_filter_with_level("info", Level::DEBUG);

    // The LLM service ships its own crate-scoped layer; keep the default
    // layer for everything else so its events are not rendered twice.
    let not_llm = filter::filter_fn(|meta| {
        !meta
            .target()
            .starts_with(ai_llm_service::telemetry::TARGET_PREFIX)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ai_llm_service::telemetry::layer())
        .with(fmt::layer().with_target(false).with_filter(not_llm))
        .init();

    api::start().await?;

    Ok(())
}
