//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::models::product::Product;
use crate::services::email::EmailService;
use crate::services::payment::PaymentService;

/// TTL for the public catalog cache.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    email: Option<EmailService>,
    payments: PaymentService,
    catalog_cache: Cache<String, Arc<Vec<Product>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be configured.
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let email = match &config.email {
            Some(email_config) => Some(EmailService::new(email_config)?),
            None => {
                tracing::warn!("SMTP not configured; outgoing email is disabled");
                None
            }
        };
        let payments = PaymentService::new(&config.payment);
        let catalog_cache = Cache::builder()
            .time_to_live(CATALOG_CACHE_TTL)
            .max_capacity(64)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                payments,
                catalog_cache,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Get a reference to the simulated payment gateway.
    #[must_use]
    pub fn payments(&self) -> &PaymentService {
        &self.inner.payments
    }

    /// Get the public catalog cache.
    #[must_use]
    pub fn catalog_cache(&self) -> &Cache<String, Arc<Vec<Product>>> {
        &self.inner.catalog_cache
    }

    /// Drop all cached catalog listings after an admin product mutation.
    pub fn invalidate_catalog(&self) {
        self.inner.catalog_cache.invalidate_all();
    }
}
