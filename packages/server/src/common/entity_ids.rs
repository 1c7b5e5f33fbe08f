//! Typed ID definitions for all resource families.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for user identities.
#[derive(Debug)]
pub struct User;

/// Marker type for product categories.
#[derive(Debug)]
pub struct Category;

/// Marker type for products listed for sale.
#[derive(Debug)]
pub struct Product;

/// Marker type for placed orders.
#[derive(Debug)]
pub struct Order;

/// Marker type for blog posts.
#[derive(Debug)]
pub struct Blog;

/// Marker type for wishlist entries (owner/product relationships).
#[derive(Debug)]
pub struct WishlistEntry;

/// Marker type for product reports.
#[derive(Debug)]
pub struct ProductReport;

/// Marker type for newsletter subscriptions.
#[derive(Debug)]
pub struct Subscription;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;
pub type CategoryId = Id<Category>;
pub type ProductId = Id<Product>;
pub type OrderId = Id<Order>;
pub type BlogId = Id<Blog>;
pub type WishlistEntryId = Id<WishlistEntry>;
pub type ReportId = Id<ProductReport>;
pub type SubscriptionId = Id<Subscription>;
