//! 批量文件处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责多个输入文件的处理和打包。
//!
//! ## 核心功能
//!
//! 1. **文件选择**：通过 `FileSelector` 拿到待处理文件，空列表直接结束
//! 2. **并发控制**：每个文件一个任务，默认并发数等于文件数，可用 Semaphore 限制
//! 3. **故障隔离**：单个文件失败只记录日志，不影响其他文件
//! 4. **打包**：所有任务结束后，把输出目录打成一个压缩包
//! 5. **全局统计**：汇总所有文件的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单行文本的细节
//! - **向下委托**：委托 table_processor 处理单个表格

use crate::clients::Classifier;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::orchestrator::table_processor::TableProcessor;
use crate::services::{create_archive, read_table, write_table, FileSelector};
use crate::utils::logging::{log_startup, print_final_stats};
use crate::utils::{EventSink, PipelineEvent};
use crate::workflow::BatchPredictor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// 一次运行的结果
#[derive(Debug, Default)]
pub struct RunSummary {
    /// 成功写出的文件
    pub written: Vec<PathBuf>,
    /// 失败的输入文件及原因
    pub failed: Vec<(PathBuf, String)>,
    /// 生成的压缩包（未选择文件时为 None）
    pub archive: Option<PathBuf>,
}

/// 应用主结构
pub struct App {
    config: Arc<Config>,
    classifier: Arc<dyn Classifier>,
    sink: Arc<dyn EventSink>,
}

impl App {
    pub fn new(config: Config, classifier: Arc<dyn Classifier>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
            sink,
        }
    }

    /// 选择文件并运行
    pub async fn run(&self, selector: &dyn FileSelector) -> AppResult<RunSummary> {
        let paths = selector.select_input_paths();
        self.run_files(paths).await
    }

    /// 处理给定的文件并打包
    pub async fn run_files(&self, paths: Vec<PathBuf>) -> AppResult<RunSummary> {
        if paths.is_empty() {
            self.sink.emit(PipelineEvent::NoFilesSelected);
            return Ok(RunSummary::default());
        }

        let total = paths.len();
        let file_slots = self
            .config
            .max_concurrent_files
            .unwrap_or(total)
            .clamp(1, total);
        log_startup(total, file_slots, self.config.max_concurrent_requests);
        warn_duplicate_names(&paths);

        let output_dir = self.config.output_dir.clone();
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| AppError::file(output_dir.display().to_string(), e))?;

        let summary = self.process_all_files(paths, file_slots).await;

        let archive_path = self.package(&output_dir).await?;

        print_final_stats(summary.written.len(), summary.failed.len(), total);

        Ok(RunSummary {
            archive: Some(archive_path),
            ..summary
        })
    }

    /// 每个文件一个任务，等待全部结束
    async fn process_all_files(&self, paths: Vec<PathBuf>, file_slots: usize) -> RunSummary {
        let semaphore = Arc::new(Semaphore::new(file_slots));
        let mut handles = Vec::with_capacity(paths.len());

        for path in paths {
            let semaphore = semaphore.clone();
            let job = FileJob {
                config: self.config.clone(),
                classifier: self.classifier.clone(),
                sink: self.sink.clone(),
            };
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Worker(e.to_string()))?;
                job.process_and_save(&task_path).await
            });
            handles.push((path, handle));
        }

        let mut summary = RunSummary::default();

        for (path, handle) in handles {
            let error = match handle.await {
                Ok(Ok(output_path)) => {
                    summary.written.push(output_path);
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(e) => AppError::Worker(e.to_string()).to_string(),
            };

            self.sink.emit(PipelineEvent::FileFailed {
                file: path.clone(),
                error: error.clone(),
            });
            summary.failed.push((path, error));
        }

        summary
    }

    /// 打包输出目录
    async fn package(&self, output_dir: &Path) -> AppResult<PathBuf> {
        let source = output_dir.to_path_buf();
        let archive_path = self.config.archive_path.clone();
        let target = archive_path.clone();

        let entries = tokio::task::spawn_blocking(move || create_archive(&source, &target))
            .await
            .map_err(|e| AppError::Worker(e.to_string()))??;

        self.sink.emit(PipelineEvent::ArchiveCreated {
            path: archive_path.clone(),
            entries,
        });
        Ok(archive_path)
    }
}

/// 单个文件任务所需的共享资源
struct FileJob {
    config: Arc<Config>,
    classifier: Arc<dyn Classifier>,
    sink: Arc<dyn EventSink>,
}

impl FileJob {
    /// 读取、分类、写出一个文件，返回输出路径
    async fn process_and_save(&self, path: &Path) -> AppResult<PathBuf> {
        self.sink.emit(PipelineEvent::FileStarted {
            file: path.to_path_buf(),
        });

        let file_name = path.file_name().ok_or_else(|| {
            AppError::file(
                path.display().to_string(),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "路径不包含文件名"),
            )
        })?;
        let output_path = self.config.output_dir.join(format!(
            "{}{}",
            self.config.output_prefix,
            file_name.to_string_lossy()
        ));

        let read_path = path.to_path_buf();
        let table = tokio::task::spawn_blocking(move || read_table(&read_path))
            .await
            .map_err(|e| AppError::Worker(e.to_string()))??;
        let rows_in = table.len();

        let predictor = BatchPredictor::new(
            self.classifier.clone(),
            self.config.max_concurrent_requests,
            self.sink.clone(),
        );
        let processor = TableProcessor::new(predictor, self.config.text_column.clone());
        let output = processor.process(table).await?;
        let kept = output.len();

        let write_path = output_path.clone();
        tokio::task::spawn_blocking(move || write_table(&write_path, &output))
            .await
            .map_err(|e| AppError::Worker(e.to_string()))??;

        self.sink.emit(PipelineEvent::FileWritten {
            path: output_path.clone(),
            kept,
            dropped: rows_in - kept,
        });

        Ok(output_path)
    }
}

/// 同名输入会写到同一个输出文件，后写入的覆盖先写入的
fn warn_duplicate_names(paths: &[PathBuf]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for path in paths {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        *counts.entry(name).or_default() += 1;
    }

    for (name, count) in counts.iter().filter(|(_, c)| **c > 1) {
        warn!("⚠️ {} 个输入文件同名 ({})，输出会相互覆盖", count, name);
    }

    info!("📋 共 {} 个文件待处理", paths.len());
}
