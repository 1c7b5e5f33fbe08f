//! Placed orders. Insert-only; identical submissions are distinct orders.

use sqlx::PgPool;

use crate::common::entity_ids::Order;
use crate::kernel::store::Collection;

pub fn collection(pool: &PgPool) -> Collection<Order> {
    Collection::new(pool.clone(), "orders", &[])
}
