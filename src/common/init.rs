use crate::adapters::supabase::SupabaseClient;
use crate::common::state::AppState;
use crate::settings::AppSettings;
use tracing::Level;

pub fn initialize_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    let supabase = initialize_supabase(settings)?;
    Ok(AppState { supabase })
}

pub fn initialize_supabase(settings: &AppSettings) -> anyhow::Result<SupabaseClient> {
    let client = SupabaseClient::new(&settings.supabase_url, &settings.supabase_service_role_key)?;
    Ok(client)
}
