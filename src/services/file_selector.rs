//! 输入文件选择
//!
//! 返回零个或多个本地文件路径；返回空列表是正常结果。

use std::path::PathBuf;
use tracing::{info, warn};

/// 文件选择能力
pub trait FileSelector {
    fn select_input_paths(&self) -> Vec<PathBuf>;
}

/// 直接使用给定的路径列表（命令行参数）
#[derive(Debug, Clone, Default)]
pub struct PathListSelector {
    paths: Vec<PathBuf>,
}

impl PathListSelector {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl FileSelector for PathListSelector {
    fn select_input_paths(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

/// 选择文件夹下所有 CSV 文件（不递归）
#[derive(Debug, Clone)]
pub struct DirectorySelector {
    folder: PathBuf,
}

impl DirectorySelector {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

impl FileSelector for DirectorySelector {
    fn select_input_paths(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.folder) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("⚠️ 无法读取文件夹 {}: {}", self.folder.display(), e);
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|s| s.to_str())
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect();
        paths.sort();

        info!(
            "📁 在 {} 中找到 {} 个 CSV 文件",
            self.folder.display(),
            paths.len()
        );
        paths
    }
}
