//! Test harness with testcontainers for integration testing.
//!
//! A single Postgres container is shared across all tests: started and
//! migrated once on first use, then reused. Each test gets a fresh pool and
//! router on top of the shared database, so tests must pick their own
//! natural keys (emails etc.) to stay independent.

use anyhow::{Context, Result};
use axum::Router;
use serde_json::json;
use server_core::domains::auth::TokenService;
use server_core::server::build_app;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Signing secret shared by every router built from the harness.
pub const TEST_SECRET: &str = "test_secret_key";

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Respect RUST_LOG when debugging tests; try_init avoids panicking
        // if another test got there first.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness handing out pools and routers over the shared database.
pub struct TestHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { db_pool })
    }

    /// Build the full application router over the shared database.
    pub fn app(&self) -> Router {
        build_app(self.db_pool.clone(), TokenService::new(TEST_SECRET))
    }

    /// Issue a bearer token the way the issuance endpoint would.
    pub fn token_for(&self, email: &str) -> String {
        let claims = json!({"email": email})
            .as_object()
            .cloned()
            .expect("claims literal is an object");
        TokenService::new(TEST_SECRET)
            .issue(&claims)
            .expect("test claims always sign")
    }
}
