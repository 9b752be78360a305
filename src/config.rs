//! Reflection settings taken from the environment.
//!
//! ## Environment Variables
//!
//! - `DOTNET_RS_REFLECTION_CACHE_LIMIT`: number of per-type member caches the registry
//!   keeps before starting a new generation (default: 4096). `0` disables keeping
//!   caches at all, so every query builds a fresh one.
//! - `DOTNET_RS_REFLECTION_STATS`: report cache hit/miss counters (`"1"` or `"true"`)
//!
//! Values are read once, on first use of [`ReflectionConfig::global`].
use std::{env, sync::OnceLock};

pub const CACHE_LIMIT_VAR: &str = "DOTNET_RS_REFLECTION_CACHE_LIMIT";
pub const STATS_VAR: &str = "DOTNET_RS_REFLECTION_STATS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectionConfig {
    pub cache_limit: usize,
    pub stats: bool,
}

impl ReflectionConfig {
    pub const DEFAULT_CACHE_LIMIT: usize = 4096;

    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let cache_limit = var(CACHE_LIMIT_VAR)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(Self::DEFAULT_CACHE_LIMIT);

        let stats = var(STATS_VAR)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self { cache_limit, stats }
    }

    pub fn global() -> &'static ReflectionConfig {
        static CONFIG: OnceLock<ReflectionConfig> = OnceLock::new();
        CONFIG.get_or_init(Self::from_env)
    }
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            cache_limit: Self::DEFAULT_CACHE_LIMIT,
            stats: false,
        }
    }
}
