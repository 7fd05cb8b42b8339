use crate::adapters::supabase::{Select, StoreResult};
use crate::common::context::Context;
use crate::entities::messages::{Message, NewMessage};

const TABLE_NAME: &str = "messages";

pub async fn fetch_recent<C: Context>(ctx: &C, limit: usize) -> StoreResult<Vec<Message>> {
    let query = Select::all().order_desc("created_at").limit(limit);
    ctx.supabase().select(TABLE_NAME, &query).await
}

pub async fn create<C: Context>(ctx: &C, from: &str, text: &str) -> StoreResult<()> {
    let row = NewMessage { from, text };
    ctx.supabase().insert(TABLE_NAME, &[row]).await
}

pub async fn create_returning<C: Context>(
    ctx: &C,
    from: &str,
    text: &str,
) -> StoreResult<Vec<Message>> {
    let row = NewMessage { from, text };
    ctx.supabase().insert_returning(TABLE_NAME, &[row]).await
}
