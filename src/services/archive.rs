//! 打包服务
//!
//! 把输出目录里的所有文件（递归、去掉目录层级）压缩成一个 zip

use crate::error::ArchiveError;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 打包目录，返回写入的文件数
///
/// 条目名只保留文件名，按名称排序；同名文件只保留第一个。
pub fn create_archive(source_dir: &Path, archive_path: &Path) -> Result<usize, ArchiveError> {
    let mut files = Vec::new();
    collect_files(source_dir, &mut files)?;
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    let out = File::create(archive_path)
        .map_err(|e| ArchiveError::io(archive_path.display().to_string(), e))?;
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut seen = HashSet::new();
    for path in &files {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if !seen.insert(name.clone()) {
            warn!("⚠️ 压缩包中已存在同名文件，跳过: {}", path.display());
            continue;
        }

        zip.start_file(name, options)?;
        let mut src =
            File::open(path).map_err(|e| ArchiveError::io(path.display().to_string(), e))?;
        std::io::copy(&mut src, &mut zip)
            .map_err(|e| ArchiveError::io(path.display().to_string(), e))?;
    }

    zip.finish()?;
    Ok(seen.len())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ArchiveError> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| ArchiveError::io(dir.display().to_string(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ArchiveError::io(dir.display().to_string(), e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
