//! Fixed-capacity token buckets for the credential endpoints.
//!
//! Login and register are the only brute-forceable surfaces; each
//! client IP gets a bucket that refills over the configured window.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Instant;

use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::config::RateLimitConfig;
use crate::inbound::http::router::AppState;

/// A bucket for a single client.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    max_tokens: f64,
    /// Tokens regained per second
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(max_attempts: u32, window_secs: u64) -> Self {
        let max = max_attempts as f64;
        Self {
            tokens: max,
            max_tokens: max,
            refill_rate: max / window_secs as f64,
            last_refill: Instant::now(),
        }
    }

    fn try_consume(&mut self) -> Result<(), u64> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - self.tokens;
            Err((missing / self.refill_rate).ceil() as u64)
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;
    }
}

/// In-process rate limiter keyed by client IP.
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        })
    }

    /// Consume one attempt for `client`.
    ///
    /// Returns the seconds until the next attempt when exhausted.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        let mut buckets = self.buckets.lock().expect("rate limiter lock poisoned");
        let bucket = buckets.entry(client.to_string()).or_insert_with(|| {
            TokenBucket::new(self.config.auth_max_attempts, self.config.auth_window_secs)
        });
        bucket.try_consume()
    }
}

/// Middleware applied to login and register routes.
pub async fn limit_auth_attempts(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_key(&req);

    if let Err(retry_after_secs) = state.rate_limiter.check(&client) {
        tracing::warn!(client = %client, retry_after_secs, "Rate limit exceeded on auth endpoint");
        return Err(ApiError::TooManyRequests(format!(
            "Muitas tentativas. Tente novamente em {} segundos.",
            retry_after_secs
        )));
    }

    Ok(next.run(req).await)
}

fn client_key(req: &Request) -> String {
    // Proxy header first, then the socket peer address.
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
    {
        return forwarded.trim().to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_exhaustion_and_refill() {
        let limiter = RateLimiter::new(RateLimitConfig {
            auth_max_attempts: 2,
            auth_window_secs: 60,
        });

        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_ok());

        let retry_after = limiter.check("1.2.3.4").unwrap_err();
        assert!(retry_after >= 1);

        // Other clients are unaffected
        assert!(limiter.check("5.6.7.8").is_ok());
    }
}
