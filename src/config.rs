//! Session configuration: which service base address to talk to.
//! Resolved once per session and injected into the client.

use anyhow::{Context, Result};
use url::Url;

const ENV_VAR: &str = "CIPHERDESK_ENV";
const DEV_URL_VAR: &str = "CIPHERDESK_DEV_API_BASE_URL";
const PROD_URL_VAR: &str = "CIPHERDESK_PROD_API_BASE_URL";

/// Pick the development or production base URL from the environment.
/// `CIPHERDESK_ENV` selects the profile (default `development`); a `.env`
/// file is honored when present.
pub fn resolve_base_url() -> Result<Url> {
    dotenv::dotenv().ok();

    let profile = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());
    let var = match profile.as_str() {
        "production" => PROD_URL_VAR,
        _ => DEV_URL_VAR,
    };

    let raw = std::env::var(var)
        .with_context(|| format!("missing environment variable {var}"))?;
    Url::parse(&raw).with_context(|| format!("{var} is not a valid URL: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test: the process environment is shared across test threads.
    #[test]
    fn profile_selection_and_parsing() {
        std::env::remove_var(ENV_VAR);
        std::env::set_var(DEV_URL_VAR, "http://localhost:5000");
        let url = resolve_base_url().unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/");

        std::env::set_var(ENV_VAR, "production");
        std::env::set_var(PROD_URL_VAR, "https://crypto.example.com/api");
        let url = resolve_base_url().unwrap();
        assert_eq!(url.host_str(), Some("crypto.example.com"));

        std::env::set_var(PROD_URL_VAR, "not a url");
        assert!(resolve_base_url().is_err());

        std::env::remove_var(ENV_VAR);
        assert!(resolve_base_url().is_ok());
    }
}
