//! # Detect Batch
//!
//! 批量判断社交媒体文本是机器生成还是人工撰写的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 调用远程检测服务，只处理单条文本
//! - `Classifier` - 分类能力，失败时返回空结果而不是错误
//! - `DetectorClient` - 基于 HTTP 的实现，单次请求超时 60 秒
//!
//! ### ② 基础能力层（Services）
//! - `services/` - 文件读写等简单 I/O
//! - `table_io` - CSV 读写
//! - `archive` - 打包输出目录
//! - `file_selector` - 选择输入文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一批文本"的处理流程
//! - `BatchPredictor` - 限制并发、保持顺序、单条失败不影响整批
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/file_orchestrator` - 多文件并发处理、故障隔离、打包
//! - `orchestrator/table_processor` - 单张表格：取列 → 分类 → 补列 → 过滤
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{Classifier, DetectorClient};
pub use config::Config;
pub use error::{AppError, AppResult, ClassifyError, TableError};
pub use models::{Prediction, Table};
pub use orchestrator::{App, RunSummary, TableProcessor};
pub use utils::{EventSink, MemorySink, PipelineEvent, TracingSink};
pub use workflow::BatchPredictor;
