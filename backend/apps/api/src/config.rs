//! Process settings
//!
//! Read once from the environment (after `.env` is loaded) and turned into
//! the portal configuration.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, bail};
use axum::http::HeaderValue;
use portal::PortalConfig;
use portal::domain::value_object::environment::Environment;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3100";

pub struct Settings {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<HeaderValue>,
    pub portal: PortalConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let supabase_url = required("SUPABASE_URL")?;
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;

        let environment = match optional("APP_ENV") {
            Some(code) => match Environment::from_code(&code) {
                Some(environment) => environment,
                None => bail!("APP_ENV must be `development` or `production`, got `{code}`"),
            },
            None if cfg!(debug_assertions) => Environment::Development,
            None => Environment::Production,
        };

        let mut portal = match environment {
            Environment::Production => PortalConfig::production(),
            Environment::Development => PortalConfig::development(),
        };
        if let Some(origin) = optional("PORTAL_PUBLIC_ORIGIN") {
            portal.public_origin = origin.trim_end_matches('/').to_string();
        }
        // Set but empty means host-only cookies
        if let Ok(domain) = env::var("COOKIE_DOMAIN") {
            let domain = domain.trim();
            portal.cookies.domain = (!domain.is_empty()).then(|| domain.to_string());
        }

        let bind_addr = optional("PORTAL_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("PORTAL_BIND_ADDR must be a socket address")?;

        let allowed_origins = optional("PORTAL_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            bind_addr,
            allowed_origins,
            portal,
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    optional(name).with_context(|| format!("{name} must be set in environment"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
