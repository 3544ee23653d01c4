use std::env;

const FALLBACK_HOST: &str = "localhost";
const FALLBACK_USER: &str = "nobody";

/// Host name the feed is published under
///
/// Uses the explicit value if given, otherwise the system host name.
pub fn host_name(explicit: Option<&str>) -> String {
    first_non_empty(explicit.map(String::from))
        .or_else(system_host_name)
        .unwrap_or_else(|| {
            tracing::warn!("Could not determine host name, using {FALLBACK_HOST}");
            FALLBACK_HOST.to_string()
        })
}

/// User whose `public_html` directory serves the feed
///
/// Uses the explicit value if given, then `$USER`, then `$LOGNAME`, then the
/// account of the current process.
pub fn user_name(explicit: Option<&str>) -> String {
    first_non_empty(explicit.map(String::from))
        .or_else(|| first_non_empty(env::var("USER").ok()))
        .or_else(|| first_non_empty(env::var("LOGNAME").ok()))
        .or_else(system_user_name)
        .unwrap_or_else(|| {
            tracing::warn!("Could not determine user name, using {FALLBACK_USER}");
            FALLBACK_USER.to_string()
        })
}

fn system_host_name() -> Option<String> {
    first_non_empty(Some(
        gethostname::gethostname().to_string_lossy().into_owned(),
    ))
}

fn system_user_name() -> Option<String> {
    users::get_current_username()
        .map(|name| name.to_string_lossy().into_owned())
        .and_then(|name| first_non_empty(Some(name)))
}

fn first_non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
