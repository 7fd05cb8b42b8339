use crate::adapters::supabase::SupabaseClient;
use crate::common::context::Context;

#[derive(Clone, Debug)]
pub struct AppState {
    pub supabase: SupabaseClient,
}

impl Context for AppState {
    fn supabase(&self) -> &SupabaseClient {
        &self.supabase
    }
}
