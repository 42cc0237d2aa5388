use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认的分类服务地址
pub const DEFAULT_ENDPOINT: &str =
    "https://hello-simpleai-chatgpt-detector-single.hf.space/run/predict_en";

/// 程序配置
///
/// 解析顺序：默认值 → TOML 配置文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 分类服务地址
    pub endpoint_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 单个表格内同时进行的分类请求数
    pub max_concurrent_requests: usize,
    /// 同时处理的文件数（None 表示文件数量本身）
    pub max_concurrent_files: Option<usize>,
    /// 待分类文本所在的列
    pub text_column: String,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 输出文件名前缀
    pub output_prefix: String,
    /// 压缩包路径
    pub archive_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 60,
            max_concurrent_requests: 5,
            max_concurrent_files: None,
            text_column: "body".to_string(),
            output_dir: PathBuf::from("processed_files"),
            output_prefix: "processed_".to_string(),
            archive_path: PathBuf::from("processed_files.zip"),
        }
    }
}

impl Config {
    /// 从 TOML 文件加载，未出现的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用环境变量覆盖当前配置，无法解析的值保持原样
    pub fn merge_env(self) -> Self {
        Self {
            endpoint_url: std::env::var("DETECTOR_ENDPOINT").unwrap_or(self.endpoint_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            max_concurrent_requests: std::env::var("MAX_CONCURRENT_REQUESTS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_concurrent_requests),
            max_concurrent_files: std::env::var("MAX_CONCURRENT_FILES").ok().and_then(|v| v.parse().ok()).or(self.max_concurrent_files),
            text_column: std::env::var("TEXT_COLUMN").unwrap_or(self.text_column),
            output_dir: std::env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            output_prefix: std::env::var("OUTPUT_PREFIX").unwrap_or(self.output_prefix),
            archive_path: std::env::var("ARCHIVE_PATH").map(PathBuf::from).unwrap_or(self.archive_path),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_requests == 0 {
            return Err(invalid("max_concurrent_requests", "必须大于 0"));
        }
        if self.max_concurrent_files == Some(0) {
            return Err(invalid("max_concurrent_files", "必须大于 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "必须大于 0"));
        }
        if self.text_column.trim().is_empty() {
            return Err(invalid("text_column", "不能为空"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
