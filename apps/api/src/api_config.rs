use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use branchgate_core::AppError;
use tracing_subscriber::EnvFilter;

/// Runtime configuration of the API process, read from the environment.
///
/// The policy table is not configurable here; it is compiled into the build.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub cookie_secure: bool,
    pub session_inactivity_minutes: i64,
    pub dev_session_enabled: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            Err(_) => 3001,
        };
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let cookie_secure = env_flag("SESSION_COOKIE_SECURE");
        let session_inactivity_minutes = match env::var("SESSION_INACTIVITY_MINUTES") {
            Ok(value) => value.parse::<i64>().map_err(|error| {
                AppError::Validation(format!("invalid SESSION_INACTIVITY_MINUTES: {error}"))
            })?,
            Err(_) => 30,
        };
        if session_inactivity_minutes <= 0 {
            return Err(AppError::Validation(
                "SESSION_INACTIVITY_MINUTES must be greater than zero".to_owned(),
            ));
        }
        let dev_session_enabled = env_flag("DEV_SESSION_ENABLED");

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            cookie_secure,
            session_inactivity_minutes,
            dev_session_enabled,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true")
}
