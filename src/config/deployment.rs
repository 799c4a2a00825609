//! Deployment facts derived from the hosting environment.

use std::env;

pub const VERCEL_URL_VAR: &str = "VERCEL_URL";
pub const VERCEL_ENV_VAR: &str = "VERCEL_ENV";
pub const LOCAL_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentEnvironment {
    Production,
    Preview,
    Development,
}

impl DeploymentEnvironment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Preview => "preview",
            Self::Development => "development",
        }
    }

    /// Unknown or missing labels fall back to development.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("production") => Self::Production,
            Some("preview") => Self::Preview,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentSettings {
    pub base_url: String,
    pub environment: DeploymentEnvironment,
}

impl DeploymentSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: base_url(),
            environment: DeploymentEnvironment::from_label(env::var(VERCEL_ENV_VAR).ok().as_deref()),
        }
    }
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self {
            base_url: LOCAL_BASE_URL.to_string(),
            environment: DeploymentEnvironment::Development,
        }
    }
}

/// Public base URL of this deployment, read from `VERCEL_URL`.
pub fn base_url() -> String {
    resolve_base_url(env::var(VERCEL_URL_VAR).ok().as_deref())
}

/// `https://<host>` for a non-empty host, otherwise the local development URL.
pub fn resolve_base_url(vercel_url: Option<&str>) -> String {
    match vercel_url.map(str::trim).filter(|host| !host.is_empty()) {
        Some(host) => format!("https://{host}"),
        None => LOCAL_BASE_URL.to_string(),
    }
}
