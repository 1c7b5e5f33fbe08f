// Infrastructure layer: persistence primitives shared by all domains.

pub mod store;

pub use store::{Collection, Document, Fields, StoreError};
