// Credential issuance/verification and the role elevation service.

pub mod elevation;
pub mod jwt;

pub use elevation::{ElevationMode, ElevationService};
pub use jwt::{Claims, TokenError, TokenService};
