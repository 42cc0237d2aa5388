use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表格读写错误
    #[error("表格错误: {0}")]
    Table(#[from] TableError),
    /// 压缩包错误
    #[error("压缩包错误: {0}")]
    Archive(#[from] ArchiveError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件系统错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 后台任务异常结束（panic / 被取消）
    #[error("任务执行失败: {0}")]
    Worker(String),
}

/// 单条文本分类失败的原因
///
/// 只在客户端内部流转，调用方看到的永远是空的 `Prediction`。
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// 网络层失败：连接被拒、超时、DNS 等
    #[error("请求失败: {0}")]
    Request(#[from] reqwest::Error),
    /// 响应体不是合法 JSON
    #[error("响应解析失败 (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    /// 响应中没有 data 字段
    #[error("响应缺少 data 字段 (HTTP {status})")]
    MissingPayload { status: u16 },
    /// data 元素不足两个
    #[error("data 只有 {len} 个元素，至少需要 2 个")]
    ShortPayload { len: usize },
    /// 置信度无法转换为有限浮点数
    #[error("无法解析置信度: {raw}")]
    InvalidConfidence { raw: String },
}

/// 表格错误
#[derive(Debug, Error)]
pub enum TableError {
    /// 缺少必需的列
    #[error("缺少必需的列: {column}")]
    MissingColumn { column: String },
    /// 数据行的单元格比表头多
    #[error("第 {line} 行有 {found} 个字段，表头只有 {expected} 个 ({path})")]
    RaggedRow {
        path: String,
        line: u64,
        expected: usize,
        found: usize,
    },
    /// CSV 读写失败
    #[error("CSV 读写失败 ({path}): {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// 文件读写失败
    #[error("文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 压缩包错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("读写文件失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入压缩包失败: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 的值不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件系统错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

impl TableError {
    pub fn csv(path: impl Into<String>, source: csv::Error) -> Self {
        TableError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        TableError::Io {
            path: path.into(),
            source,
        }
    }
}

impl ArchiveError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
