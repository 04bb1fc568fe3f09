/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration:
 * the PostgreSQL connection pool and the WebSocket origin policy.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables, with sensible
 * defaults for local development when possible.
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent server startup.
 * Services that fail to initialize are set to `None` and the server
 * continues without them.
 */

use sqlx::PgPool;

/// Database configuration result
///
/// Contains the database connection pool if successfully configured,
/// or `None` if the database is not available.
pub type DatabaseConfig = Option<PgPool>;

/// Load and initialize database connection pool
///
/// This function:
/// 1. Reads `DATABASE_URL` from environment
/// 2. Creates a PostgreSQL connection pool
/// 3. Runs database migrations
///
/// # Returns
///
/// - `Some(PgPool)` if database is successfully configured
/// - `None` if `DATABASE_URL` is not set or connection fails
///
/// # Errors
///
/// Errors are logged but do not prevent server startup. The function
/// returns `None` on any error, allowing the server to run without
/// database features.
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    // Run migrations
    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
        }
        Err(e) => {
            tracing::error!("Failed to run database migrations: {:?}", e);
            // Continue anyway - migrations might have already been run
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Transport-level origin policy for WebSocket handshakes
///
/// An explicit configuration input rather than a hardcoded accept-all:
/// when an allowlist is configured, handshake requests whose `Origin`
/// header is absent or not listed are rejected before the upgrade.
#[derive(Debug, Clone)]
pub enum OriginPolicy {
    /// Accept connections from any origin (explicit, logged default)
    AllowAny,
    /// Accept connections only from the listed origins
    Allowlist(Vec<String>),
}

impl OriginPolicy {
    /// Load the policy from `WS_ALLOWED_ORIGINS`
    ///
    /// The variable holds a comma-separated origin list. Unset or empty
    /// means allow-any, which is logged so the permissive state is
    /// always a visible decision.
    pub fn from_env() -> Self {
        match std::env::var("WS_ALLOWED_ORIGINS") {
            Ok(raw) => {
                let origins: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if origins.is_empty() {
                    tracing::warn!("WS_ALLOWED_ORIGINS is empty; accepting any WebSocket origin");
                    OriginPolicy::AllowAny
                } else {
                    tracing::info!("WebSocket origins restricted to {:?}", origins);
                    OriginPolicy::Allowlist(origins)
                }
            }
            Err(_) => {
                tracing::warn!("WS_ALLOWED_ORIGINS not set; accepting any WebSocket origin");
                OriginPolicy::AllowAny
            }
        }
    }

    /// Decide whether a handshake with the given `Origin` header may
    /// proceed
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match self {
            OriginPolicy::AllowAny => true,
            OriginPolicy::Allowlist(origins) => match origin {
                Some(origin) => origins.iter().any(|allowed| allowed == origin),
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_any_accepts_everything() {
        let policy = OriginPolicy::AllowAny;
        assert!(policy.allows(Some("https://example.com")));
        assert!(policy.allows(None));
    }

    #[test]
    fn test_allowlist_accepts_listed_origin() {
        let policy = OriginPolicy::Allowlist(vec!["https://app.example.com".to_string()]);
        assert!(policy.allows(Some("https://app.example.com")));
    }

    #[test]
    fn test_allowlist_rejects_unlisted_origin() {
        let policy = OriginPolicy::Allowlist(vec!["https://app.example.com".to_string()]);
        assert!(!policy.allows(Some("https://evil.example.com")));
    }

    #[test]
    fn test_allowlist_rejects_missing_origin() {
        let policy = OriginPolicy::Allowlist(vec!["https://app.example.com".to_string()]);
        assert!(!policy.allows(None));
    }
}
