use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        api_url: get_env_or_default(
            "FORKIFY_API_URL",
            "https://forkify-api.herokuapp.com/api/v2/recipes",
        ),
        api_key: env::var("FORKIFY_API_KEY").ok().filter(|k| !k.is_empty()),
        results_per_page: get_env_parsed("FORKIFY_RESULTS_PER_PAGE", 10),
        timeout_seconds: get_env_parsed("FORKIFY_TIMEOUT_SECONDS", 10),
        data_dir: PathBuf::from(get_env_or_default("FORKIFY_DATA_DIR", ".forkify")),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: Option<String>,
    pub results_per_page: usize,
    pub timeout_seconds: u64,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("Invalid value for environment variable {key}: {raw}")),
        Err(_) => default,
    }
}
