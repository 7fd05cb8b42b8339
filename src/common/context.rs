use crate::adapters::supabase::SupabaseClient;

pub trait Context: Sync + Send {
    fn supabase(&self) -> &SupabaseClient;
}
