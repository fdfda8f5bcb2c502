use regex::Regex;
use std::sync::{Once, OnceLock};

static INIT_ONCE: Once = Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

static SECRET_PARAMS: OnceLock<Regex> = OnceLock::new();

/// Mask credential-bearing query parameters (`oauth_token`, `client_secret`, `code`)
/// in a message that may embed a full request URL.
pub fn redact_secrets(msg: &str) -> String {
    let re = SECRET_PARAMS.get_or_init(|| {
        Regex::new(r"(?P<key>\b(?:oauth_token|access_token|client_secret|code))=[^&\s)]+")
            .expect("static secret-redaction pattern is valid")
    });
    re.replace_all(msg, "${key}=REDACTED").into_owned()
}
