//! Blog posts. Insert-only.

use sqlx::PgPool;

use crate::common::entity_ids::Blog;
use crate::kernel::store::Collection;

pub fn collection(pool: &PgPool) -> Collection<Blog> {
    Collection::new(pool.clone(), "blogs", &[])
}
