use std::env;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var("MARKETPLACE_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string());
        let auth_token = env::var("MARKETPLACE_API_TOKEN").ok();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }
}
