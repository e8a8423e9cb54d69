// ABOUTME: Fixed-window per-user rate limiting backed by an in-memory map
// ABOUTME: Enforces request rate limits and prevents API abuse
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::config::environment::RateLimitConfig;
use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// Outcome of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    /// Whether the request exceeded the limit
    pub is_rate_limited: bool,
    /// Maximum requests allowed per window
    pub limit: u32,
    /// Requests remaining in the current window
    pub remaining: u32,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Window {
    window_start: i64,
    count: u32,
}

/// Fixed-window request counter keyed by user id
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<Uuid, Window>,
}

impl RateLimiter {
    /// Create a rate limiter with the given configuration
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    /// Record one request for a user and report the window state
    ///
    /// Disabled limiters always report a non-limited status.
    pub fn check(&self, user_id: Uuid) -> RateLimitStatus {
        let window_seconds = i64::try_from(self.config.window_seconds.max(1)).unwrap_or(900);
        let now = Utc::now().timestamp();
        let window_start = now - now % window_seconds;
        let reset_at = Utc
            .timestamp_opt(window_start + window_seconds, 0)
            .single()
            .unwrap_or_else(Utc::now);

        if !self.config.enabled {
            return RateLimitStatus {
                is_rate_limited: false,
                limit: self.config.requests_per_window,
                remaining: self.config.requests_per_window,
                reset_at,
            };
        }

        let mut entry = self.windows.entry(user_id).or_insert(Window {
            window_start,
            count: 0,
        });

        if entry.window_start != window_start {
            entry.window_start = window_start;
            entry.count = 0;
        }
        entry.count += 1;

        let limit = self.config.requests_per_window;
        RateLimitStatus {
            is_rate_limited: entry.count > limit,
            limit,
            remaining: limit.saturating_sub(entry.count),
            reset_at,
        }
    }
}
