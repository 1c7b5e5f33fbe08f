// HTTP middleware
pub mod admin_gate;
pub mod jwt_auth;

pub use admin_gate::*;
pub use jwt_auth::*;
