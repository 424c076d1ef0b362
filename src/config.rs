// src/config.rs

use std::env;
use dotenvy::dotenv;

const DEFAULT_DATABASE_URL: &str = "sqlite://exam.db?mode=rwc";
const DEFAULT_JWT_SECRET: &str = "secret";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Lifetime of an admin token, in seconds.
    pub jwt_expiration: u64,
    /// Shared secret checked by the admin login.
    pub admin_password: String,
    pub port: u16,
    /// Reject exam-mode submissions once the timer has run out.
    /// Off by default: the timer is advisory only.
    pub enforce_deadline: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let admin_password =
            env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let enforce_deadline = env::var("ENFORCE_DEADLINE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            admin_password,
            port,
            enforce_deadline,
            rust_log,
        }
    }

    /// Names of the secrets still set to their built-in defaults.
    /// Logged by the binary once tracing is up.
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            names.push("JWT_SECRET");
        }
        if self.admin_password == DEFAULT_ADMIN_PASSWORD {
            names.push("ADMIN_PASSWORD");
        }
        names
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
