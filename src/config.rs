use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the catalog and similarity artifacts
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Catalog artifact file name
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    /// Similarity matrix artifact file name
    #[serde(default = "default_similarity_file")]
    pub similarity_file: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language requested from TMDB
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Per-request timeout for metadata calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long resolved metadata stays cached
    #[serde(default = "default_metadata_cache_ttl_secs")]
    pub metadata_cache_ttl_secs: u64,

    /// Redis connection URL; the in-process cache is used when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Default detail tier: fast (small posters) when true
    #[serde(default = "default_true")]
    pub fast_mode: bool,

    /// Whether the top picks panel starts refreshing
    #[serde(default = "default_true")]
    pub auto_refresh: bool,

    /// Seconds between top picks refreshes
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Number of movies shown in the top picks panel
    #[serde(default = "default_top_picks_count")]
    pub top_picks_count: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_catalog_file() -> String {
    "movie_list.json".to_string()
}

fn default_similarity_file() -> String {
    "similarity.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_metadata_cache_ttl_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_top_picks_count() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Metadata cache TTL in seconds, never zero since Redis rejects `SET EX 0`
    pub fn metadata_cache_ttl(&self) -> u64 {
        self.metadata_cache_ttl_secs.max(1)
    }

    /// Never zero; the refresher ticks at least once a second
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Resolves the artifact directory
    ///
    /// Relative paths are looked up next to the executable first, then in the
    /// working directory.
    pub fn artifact_root(&self) -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        resolve_artifact_dir(&self.artifact_dir, exe_dir.as_deref())
    }
}

fn resolve_artifact_dir(dir: &Path, exe_dir: Option<&Path>) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }

    match exe_dir.map(|base| base.join(dir)) {
        Some(candidate) if candidate.is_dir() => candidate,
        _ => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_defaults_apply() {
        let config = parse(&[("TMDB_API_KEY", "secret")]).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
        assert_eq!(config.catalog_file, "movie_list.json");
        assert_eq!(config.similarity_file, "similarity.json");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.metadata_cache_ttl(), 3600);
        assert_eq!(config.redis_url, None);
        assert!(config.fast_mode);
        assert!(config.auto_refresh);
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.top_picks_count, 5);
    }

    #[test]
    fn test_api_key_is_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            ("TMDB_API_KEY", "secret"),
            ("PORT", "8080"),
            ("FAST_MODE", "false"),
            ("REDIS_URL", "redis://cache:6379"),
            ("TOP_PICKS_COUNT", "8"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(!config.fast_mode);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.top_picks_count, 8);
    }

    #[test]
    fn test_zero_cache_ttl_is_clamped() {
        let config = parse(&[("TMDB_API_KEY", "secret"), ("METADATA_CACHE_TTL_SECS", "0")]).unwrap();
        assert_eq!(config.metadata_cache_ttl(), 1);
    }

    #[test]
    fn test_zero_refresh_interval_is_clamped() {
        let config = parse(&[("TMDB_API_KEY", "secret"), ("REFRESH_INTERVAL_SECS", "0")]).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_absolute_artifact_dir_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_artifact_dir(dir.path(), Some(Path::new("/nowhere")));
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn test_relative_artifact_dir_prefers_exe_dir() {
        let exe_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(exe_dir.path().join("artifacts")).unwrap();

        let resolved = resolve_artifact_dir(Path::new("artifacts"), Some(exe_dir.path()));
        assert_eq!(resolved, exe_dir.path().join("artifacts"));
    }

    #[test]
    fn test_relative_artifact_dir_falls_back_to_working_dir() {
        let exe_dir = tempfile::tempdir().unwrap();
        let resolved = resolve_artifact_dir(Path::new("artifacts"), Some(exe_dir.path()));
        assert_eq!(resolved, PathBuf::from("artifacts"));
    }
}
