//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location / 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "FORCES_CONFIG";

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    pub server: ServerConfig,
    /// Snapshot storage configuration / 快照存储配置
    pub storage: StorageConfig,
    /// Search (RAG) configuration / 搜索配置
    pub search: SearchConfig,
    /// CORS configuration / 跨域配置
    pub cors: CorsConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Snapshot storage configuration / 快照存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot files / 快照文件目录
    pub data_dir: String,
    /// Party snapshot file name / 政党快照文件名
    pub parties_file: String,
    /// Strength/weakness snapshot file name / 优劣势快照文件名
    pub strengths_weaknesses_file: String,
}

/// Embedding provider selection / 向量化提供者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Local feature hashing, no network / 本地特征哈希
    Hash,
    /// OpenAI-compatible HTTP endpoint / 兼容 OpenAI 的接口
    Api,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Collection name, used for logging / 集合名称
    pub collection: String,
    pub provider: EmbeddingProviderKind,
    /// Embedding dimension / 向量维度
    pub dimension: usize,
    /// API base URL (provider = api) / 接口地址
    pub api_base: String,
    /// Model name (provider = api) / 模型名称
    pub model: String,
    /// API key (provider = api) / 接口密钥
    pub api_key: String,
    /// Request timeout in seconds / 请求超时（秒）
    pub timeout_secs: u64,
    /// Result count when the request does not specify one / 默认返回条数
    pub default_results: usize,
}

/// CORS configuration / 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins, empty means permissive / 允许的来源，空表示全部允许
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            parties_file: "parties.json".to_string(),
            strengths_weaknesses_file: "strengths_weaknesses.json".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            collection: "docs".to_string(),
            provider: EmbeddingProviderKind::Hash,
            // all-MiniLM-L6-v2 output size
            dimension: 384,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            default_results: 3,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl StorageConfig {
    /// Get the data directory path / 获取数据目录路径
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Get the full party snapshot path / 获取政党快照完整路径
    pub fn parties_path(&self) -> PathBuf {
        self.data_dir().join(&self.parties_file)
    }

    /// Get the full strength/weakness snapshot path / 获取优劣势快照完整路径
    pub fn strengths_weaknesses_path(&self) -> PathBuf {
        self.data_dir().join(&self.strengths_weaknesses_file)
    }

    /// Storage rooted at `dir` with default file names / 以指定目录为根的存储配置
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data_dir: dir.to_string_lossy().into_owned(),
            ..Self::default()
        }
    }
}

impl AppConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from an explicit path / 从指定路径加载配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
