use tracing::{Level, error};
use tradesai_relay::api;
use tradesai_relay::common::init;
use tradesai_relay::common::state::AppState;
use tradesai_relay::settings::AppSettings;

/// Everything that must succeed before a listener is bound.
fn configure() -> anyhow::Result<(AppSettings, AppState)> {
    let settings = AppSettings::load_from_env()?;
    let state = init::initialize_state(&settings)?;
    Ok((settings, state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (settings, state) = match configure() {
        Ok(configured) => configured,
        Err(e) => {
            init::initialize_logging(Level::INFO);
            error!("❌ {e:#}");
            std::process::exit(1);
        }
    };
    init::initialize_logging(settings.level);
    api::serve(&settings, state).await
}
