use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;

/// 默认配置文件名，可通过 `VENDOR_SUMMARY_CONFIG` 覆盖
pub const DEFAULT_CONFIG_FILE: &str = "vendor_summary.toml";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub summary: SummaryConfig,
    pub loader: LoaderConfig,
    pub log: LogConfig,
}

/// 数据库连接参数
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// 汇总任务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub table: String,
    /// 每条 INSERT 语句的最大行数
    pub chunk_size: usize,
    pub write_timeout_secs: u64,
    /// 控制台预览行数
    pub preview_rows: usize,
    /// 写入前是否自动建表
    pub create_table: bool,
    pub export_path: Option<PathBuf>,
}

/// CSV 导入任务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub csv_file: Option<PathBuf>,
    pub table: String,
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// 追加写入的日志文件；为空时输出到控制台
    pub file: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "inventory".to_string(),
            max_connections: 2,
            acquire_timeout_secs: 10,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            table: "vendor_sales_summary".to_string(),
            chunk_size: 1000,
            write_timeout_secs: 30,
            preview_rows: 10,
            create_table: false,
            export_path: None,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            csv_file: None,
            table: "sales".to_string(),
            chunk_size: 1000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

// 密码不进日志
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

impl DatabaseConfig {
    /// 构建连接参数 (慢查询日志阈值 5 秒)
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(5))
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl SummaryConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl LogConfig {
    /// 解析日志级别 (trace/debug/info/warn/error/off)
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.level.trim().parse::<LevelFilter>().map_err(|_| {
            ConfigError::Message(format!("invalid log.level `{}`", self.level))
        })
    }
}

impl AppConfig {
    /// 从默认值、配置文件、环境变量依次加载配置
    ///
    /// 环境变量以 `VS_` 开头，层级用 `__` 分隔，例如 `VS_DATABASE__PASSWORD`。
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("VENDOR_SUMMARY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(&path)
    }

    /// 配置文件不存在时跳过
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("VS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validate()
    }

    /// 加载后的校验
    pub fn validate(self) -> Result<Self, ConfigError> {
        self.log.level_filter()?;
        Ok(self)
    }
}
