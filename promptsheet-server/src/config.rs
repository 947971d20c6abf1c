use secrecy::SecretString;

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Environment-driven settings, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub gemini_api_key: Option<SecretString>,
    /// JSON-encoded service-account blob, not a file path.
    pub service_account_blob: Option<String>,
    pub drive_folder_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env_nonempty("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        Self {
            port,
            gemini_api_key: env_nonempty("GEMINI_API_KEY").map(SecretString::new),
            service_account_blob: env_nonempty("GOOGLE_APPLICATION_CREDENTIALS"),
            drive_folder_id: env_nonempty("GOOGLE_DRIVE_FOLDER_ID"),
        }
    }
}
