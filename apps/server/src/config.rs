use pricecast_core::RateLimitPolicy;

/// Server configuration, read once from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Upstream provider credential. Absence is tolerated at startup so
    /// cached data keeps serving; each fetch then fails as a configuration
    /// error rather than a downstream parse failure.
    pub alpha_vantage_api_key: Option<String>,
    /// Admission budgets for the prediction route.
    pub rate_limit: RateLimitPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let listen_addr = std::env::var("PRICECAST_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let alpha_vantage_api_key = std::env::var("ALPHA_VANTAGE_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let defaults = RateLimitPolicy::default();
        let rate_limit = RateLimitPolicy {
            per_minute: env_u32("PRICECAST_RATE_PER_MINUTE", defaults.per_minute),
            per_day: env_u32("PRICECAST_RATE_PER_DAY", defaults.per_day),
        };

        Self {
            listen_addr,
            alpha_vantage_api_key,
            rate_limit,
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
