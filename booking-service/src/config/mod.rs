use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Origins allowed when `ALLOWED_ORIGINS` is not set.
const DEFAULT_ALLOWED_ORIGINS: &str =
    "https://clean-co-56f4d.web.app,https://clean-co-56f4d.firebaseapp.com";

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub mongodb: MongoConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub token_secret: Secret<String>,
    pub token_ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

impl BookingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let token_ttl_seconds =
            parse_ttl(&get_env("ACCESS_TOKEN_TTL_SECONDS", Some("3600"), false)?)?;

        Ok(BookingConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("booking-service"), false)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            mongodb: MongoConfig {
                uri: mongodb_uri()?,
                database: get_env("MONGODB_DATABASE", Some("CleanCoDB"), false)?,
            },
            auth: AuthConfig {
                token_secret: Secret::new(get_env("ACCESS_TOKEN_SECRET", None, is_prod)?),
                token_ttl_seconds,
            },
            security: SecurityConfig {
                allowed_origins: parse_origins(&get_env(
                    "ALLOWED_ORIGINS",
                    Some(DEFAULT_ALLOWED_ORIGINS),
                    false,
                )?),
            },
        })
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// `MONGODB_URI` wins; otherwise an SRV URI is assembled from `DB_USER`,
/// `DB_PASS` and `MONGODB_HOST`.
fn mongodb_uri() -> Result<String, AppError> {
    if let Ok(uri) = env::var("MONGODB_URI") {
        return Ok(uri);
    }

    let user = get_env("DB_USER", None, false)?;
    let pass = get_env("DB_PASS", None, false)?;
    let host = get_env("MONGODB_HOST", None, false)?;
    Ok(build_srv_uri(&user, &pass, &host))
}

fn build_srv_uri(user: &str, pass: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
        user, pass, host
    )
}

fn parse_ttl(raw: &str) -> Result<i64, AppError> {
    let ttl = raw.trim().parse::<i64>().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("Invalid ACCESS_TOKEN_TTL_SECONDS: {}", e))
    })?;
    if ttl <= 0 {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "ACCESS_TOKEN_TTL_SECONDS must be positive, got {}",
            ttl
        )));
    }
    Ok(ttl)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
