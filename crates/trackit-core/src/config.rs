use crate::tracker_config::TrackerConfig;
use crate::ConfigError;

/// Load tracker configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_tracker_config() -> Result<TrackerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_tracker_config_from_env()
}

/// Load tracker configuration from environment variables already in the process.
///
/// Unlike [`load_tracker_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_tracker_config_from_env() -> Result<TrackerConfig, ConfigError> {
    build_tracker_config(|key| std::env::var(key))
}

/// Build tracker configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables keep the
/// [`TrackerConfig::default`] value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for unparseable numbers or booleans,
/// and for a zero poll interval.
pub fn build_tracker_config<F>(lookup: F) -> Result<TrackerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = TrackerConfig::default();

    let or_default = |var: &str, default: String| -> String { lookup(var).unwrap_or(default) };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got \"{raw}\""),
            }),
            Err(_) => Ok(default),
        }
    };

    let render_poll_interval_ms =
        parse_u64("TRACKIT_RENDER_POLL_INTERVAL_MS", defaults.render_poll_interval_ms)?;
    if render_poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRACKIT_RENDER_POLL_INTERVAL_MS".to_string(),
            reason: "poll interval must be greater than zero".to_string(),
        });
    }

    Ok(TrackerConfig {
        user_agent: or_default("TRACKIT_USER_AGENT", defaults.user_agent),
        request_timeout_secs: parse_u64(
            "TRACKIT_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout_secs,
        )?,
        accept_invalid_certs: parse_bool(
            "TRACKIT_ACCEPT_INVALID_CERTS",
            defaults.accept_invalid_certs,
        )?,
        webdriver_url: or_default("TRACKIT_WEBDRIVER_URL", defaults.webdriver_url),
        render_poll_interval_ms,
        render_max_wait_secs: parse_u64(
            "TRACKIT_RENDER_MAX_WAIT_SECS",
            defaults.render_max_wait_secs,
        )?,
        bluedart_url: or_default("TRACKIT_BLUEDART_URL", defaults.bluedart_url),
        aramex_url: or_default("TRACKIT_ARAMEX_URL", defaults.aramex_url),
        dhl_url: or_default("TRACKIT_DHL_URL", defaults.dhl_url),
        skynet_url: or_default("TRACKIT_SKYNET_URL", defaults.skynet_url),
        skynet_session_cookie: optional("TRACKIT_SKYNET_SESSION_COOKIE"),
        overnite_url: or_default("TRACKIT_OVERNITE_URL", defaults.overnite_url),
        overnite_session_cookie: optional("TRACKIT_OVERNITE_SESSION_COOKIE"),
        overnite_viewstate: or_default("TRACKIT_OVERNITE_VIEWSTATE", defaults.overnite_viewstate),
        overnite_event_validation: or_default(
            "TRACKIT_OVERNITE_EVENT_VALIDATION",
            defaults.overnite_event_validation,
        ),
        ecomm_url: or_default("TRACKIT_ECOMM_URL", defaults.ecomm_url),
        gati_url: or_default("TRACKIT_GATI_URL", defaults.gati_url),
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
