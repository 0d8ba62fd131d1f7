use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Settings for verifying identity-provider tokens.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider.
    #[serde(default)]
    pub jwt_secret: String,
    /// Clock skew tolerated on `exp`, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

fn default_leeway() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    /// How many requests the admin activity feed shows.
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: u64,
    /// Categories offered to clients when they post a request.
    #[serde(default = "default_service_types")]
    pub service_types: Vec<String>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            recent_activity_limit: default_recent_activity_limit(),
            service_types: default_service_types(),
        }
    }
}

fn default_recent_activity_limit() -> u64 { 10 }

pub fn default_service_types() -> Vec<String> {
    [
        "Eletricista",
        "Encanador",
        "Pintor",
        "Marceneiro",
        "Jardineiro",
        "Faxineiro",
        "Pedreiro",
        "Montador de Móveis",
        "Dedetização",
        "Ar Condicionado",
        "Chaveiro",
        "Vidraceiro",
        "Outro",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

fn parse(path: &str, content: &str) -> Result<AppConfig> {
    toml::from_str(content).with_context(|| format!("配置文件 {path} 不是合法的 TOML"))
}

impl AppConfig {
    /// Load `CONFIG_PATH` (default `config.toml`) and validate it.
    ///
    /// Only a missing file falls back to defaults plus environment variables; a file
    /// that exists but cannot be read or parsed is an error.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => parse(path, &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => return Err(anyhow::Error::new(e).context(format!("读取配置文件 {path} 失败"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.marketplace.normalize()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Defaults with the URL taken from `DATABASE_URL`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.normalize_from_env();
        cfg
    }

    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url 为空；请在 config.toml 或环境变量 DATABASE_URL 中提供"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url 必须以 postgresql:// 或 postgres:// 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret 为空；请在 config.toml 或环境变量 JWT_SECRET 中提供"));
        }
        Ok(())
    }
}

impl MarketplaceConfig {
    fn normalize(&mut self) -> Result<()> {
        if !(1..=100).contains(&self.recent_activity_limit) {
            return Err(anyhow!("marketplace.recent_activity_limit 必须在 1..=100 范围内"));
        }
        self.service_types.retain(|s| !s.trim().is_empty());
        if self.service_types.is_empty() {
            self.service_types = default_service_types();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://colmeia:pw@localhost:5432/colmeia".into();
        cfg.auth.jwt_secret = "secret".into();
        cfg
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://localhost/colmeia"

            [marketplace]
            recent_activity_limit = 5
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.marketplace.recent_activity_limit, 5);
        assert_eq!(cfg.marketplace.service_types.len(), 13);
        assert_eq!(cfg.auth.leeway_secs, 30);
    }

    #[test]
    fn rejects_non_postgres_url() {
        let mut cfg = valid();
        cfg.database.url = "mysql://localhost/colmeia".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_activity_limit() {
        let mut cfg = valid();
        cfg.marketplace.recent_activity_limit = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn blank_service_types_fall_back_to_catalogue() {
        let mut cfg = valid();
        cfg.marketplace.service_types = vec!["  ".into()];
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.marketplace.service_types, default_service_types());
    }

    fn temp_config(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("colmeia-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, body).expect("write temp config");
        path
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let path = temp_config("broken", "[auth]\njwt_secret = \"from-file\"\n[server\nport = 9000\n");
        let res = AppConfig::load_or_env_from(path.to_str().unwrap());
        let _ = std::fs::remove_file(&path);
        let err = res.expect_err("broken TOML must not load");
        assert!(format!("{err:#}").contains("TOML"), "unexpected error: {err:#}");
    }

    #[test]
    fn well_formed_file_wins_over_defaults() {
        let path = temp_config(
            "ok",
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://localhost/colmeia"

            [auth]
            jwt_secret = "from-file"
            "#,
        );
        let res = AppConfig::load_or_env_from(path.to_str().unwrap());
        let _ = std::fs::remove_file(&path);
        let cfg = res.expect("valid file");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.auth.jwt_secret, "from-file");
    }

    #[test]
    fn missing_file_falls_back_to_env() {
        std::env::set_var("DATABASE_URL", "postgres://env-host/colmeia");
        std::env::set_var("JWT_SECRET", "from-env");
        let missing = std::env::temp_dir().join(format!("colmeia-{}-absent.toml", std::process::id()));
        let cfg = AppConfig::load_or_env_from(missing.to_str().unwrap()).expect("defaults + env");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.auth.jwt_secret, "from-env");
    }

    #[test]
    fn zero_worker_threads_normalized() {
        let mut cfg = valid();
        cfg.server.worker_threads = Some(0);
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }
}
