use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub command_prefix: String,
    pub database_url: String,
    pub status_message: String,
    pub google_api_key: Option<String>,
    pub search_engine_id: Option<String>,
    pub search_links_file: String,
    pub github_token: Option<String>,
    pub github_repo_owner: Option<String>,
    pub github_repo_name: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        Ok(Config {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN must be set"))?,
            command_prefix: env::var("COMMAND_PREFIX").unwrap_or_else(|_| "!v ".to_string()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "data/vigil.db".to_string()),
            status_message: env::var("STATUS_MESSAGE")
                .unwrap_or_else(|_| "Questions? Try /help".to_string()),
            google_api_key: env::var("GOOGLE_API_KEY").ok(),
            search_engine_id: env::var("SEARCH_ENGINE_ID").ok(),
            search_links_file: env::var("SEARCH_LINKS_FILE")
                .unwrap_or_else(|_| "search_links.txt".to_string()),
            github_token: env::var("GITHUB_TOKEN").ok(),
            github_repo_owner: env::var("GITHUB_REPO_OWNER").ok(),
            github_repo_name: env::var("GITHUB_REPO_NAME").ok(),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"[REDACTED]")
            .field("command_prefix", &self.command_prefix)
            .field("database_url", &self.database_url)
            .field("status_message", &self.status_message)
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("search_engine_id", &self.search_engine_id)
            .field("search_links_file", &self.search_links_file)
            .field(
                "github_token",
                &self.github_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("github_repo_owner", &self.github_repo_owner)
            .field("github_repo_name", &self.github_repo_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_logic() {
        // 1. Test missing vars
        env::remove_var("DISCORD_TOKEN");
        let result = Config::build();
        assert!(
            result.is_err(),
            "Should fail when required vars are missing"
        );

        // 2. Test defaults
        env::set_var("DISCORD_TOKEN", "test_token");
        let config = Config::build().unwrap();
        assert_eq!(config.discord_token, "test_token");
        assert_eq!(config.command_prefix, "!v ");
        assert_eq!(config.database_url, "data/vigil.db");
        assert_eq!(config.search_links_file, "search_links.txt");
        assert_eq!(config.google_api_key, None);

        // 3. Test debug redaction
        env::set_var("GITHUB_TOKEN", "secret_pat");
        let config_redacted = Config::build().unwrap();
        let debug_output = format!("{:?}", config_redacted);
        assert!(!debug_output.contains("test_token"));
        assert!(!debug_output.contains("secret_pat"));
        assert!(debug_output.contains("[REDACTED]"));

        // Cleanup
        env::remove_var("DISCORD_TOKEN");
        env::remove_var("GITHUB_TOKEN");
    }
}
