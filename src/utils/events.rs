//! 流水线事件
//!
//! 各层不直接打印，而是把事件交给注入的 `EventSink`。
//! 生产环境用 `TracingSink` 输出日志，测试用 `MemorySink` 断言。

use crate::utils::logging::truncate_text;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// 流水线中发生的可观察事件
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// 单条文本分类失败
    ClassificationFailed { text: String, error: String },
    /// 一条文本处理完成（无论成功与否）
    Progress { completed: usize, total: usize },
    /// 工作任务异常结束
    WorkerFailed { index: usize, error: String },
    /// 开始处理文件
    FileStarted { file: PathBuf },
    /// 文件处理失败，不产生输出
    FileFailed { file: PathBuf, error: String },
    /// 输出文件已写入
    FileWritten {
        path: PathBuf,
        kept: usize,
        dropped: usize,
    },
    /// 压缩包已生成
    ArchiveCreated { path: PathBuf, entries: usize },
    /// 没有选择任何文件
    NoFilesSelected,
}

/// 事件接收端
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// 把事件写到 tracing 日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::ClassificationFailed { text, error } => {
                warn!("⚠️ 分类失败 '{}': {}", truncate_text(&text, 80), error);
            }
            PipelineEvent::Progress { completed, total } => {
                info!("⏳ 进度: {}/{} 已完成", completed, total);
            }
            PipelineEvent::WorkerFailed { index, error } => {
                error!("[第 {} 行] ❌ 获取结果失败: {}", index + 1, error);
            }
            PipelineEvent::FileStarted { file } => {
                info!("📄 正在处理 {}...", display_name(&file));
            }
            PipelineEvent::FileFailed { file, error } => {
                error!("❌ 文件处理失败 {}: {}", file.display(), error);
            }
            PipelineEvent::FileWritten {
                path,
                kept,
                dropped,
            } => {
                info!(
                    "✓ 已写入 {} (保留 {} 行, 丢弃 {} 行)",
                    path.display(),
                    kept,
                    dropped
                );
            }
            PipelineEvent::ArchiveCreated { path, entries } => {
                info!("📦 {} 个文件已打包到 {}", entries, path.display());
            }
            PipelineEvent::NoFilesSelected => {
                warn!("⚠️ 没有选择任何文件，程序结束");
            }
        }
    }
}

/// 在内存中记录事件
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录事件的快照
    pub fn events(&self) -> Vec<PipelineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 按完成顺序返回所有进度计数
    pub fn progress(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PipelineEvent::Progress { completed, .. } => Some(completed),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: PipelineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
