// Business domains, one module per resource family.

pub mod auth;
pub mod blogs;
pub mod catalog;
pub mod newsletter;
pub mod orders;
pub mod reports;
pub mod users;
pub mod wishlist;
