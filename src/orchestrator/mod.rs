//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `file_orchestrator` - 批量文件处理器
//! - 获取待处理文件列表（Vec<PathBuf>）
//! - 每个文件一个任务，单个文件失败不影响其他文件
//! - 全部结束后打包输出目录
//! - 输出全局统计信息
//!
//! ### `table_processor` - 单个表格处理器
//! - 取出文本列，整表调用一次批量预测
//! - 追加结果列，丢弃未评分的行
//!
//! ## 层次关系
//!
//! ```text
//! file_orchestrator (处理 Vec<文件>)
//!     ↓
//! table_processor (处理一张表)
//!     ↓
//! workflow::BatchPredictor (处理 Vec<文本>，并发上限 5)
//!     ↓
//! clients::Classifier (处理单条文本)
//! ```

pub mod file_orchestrator;
pub mod table_processor;

// 重新导出主要类型
pub use file_orchestrator::{App, RunSummary};
pub use table_processor::{apply_predictions, TableProcessor, CONFIDENCE_COLUMN, LABEL_COLUMN};
