use anyhow::{Context, Result};
use clap::Parser;
use detect_batch::services::{DirectorySelector, FileSelector, PathListSelector};
use detect_batch::{logger, App, Config, DetectorClient, EventSink, TracingSink};
use std::path::PathBuf;
use std::sync::Arc;

/// 批量检测 CSV 中的文本是否由 AI 生成
#[derive(Debug, Parser)]
#[command(name = "detect-batch", version)]
struct Cli {
    /// 待处理的 CSV 文件
    files: Vec<PathBuf>,

    /// 处理该文件夹下的所有 CSV（未给出文件时生效）
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// TOML 配置文件，也可用 DETECT_CONFIG 指定
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 检测服务地址
    #[arg(long)]
    endpoint: Option<String>,

    /// 单个文件同时进行的请求数
    #[arg(long)]
    concurrency: Option<usize>,

    /// 同时处理的文件数
    #[arg(long)]
    max_files: Option<usize>,

    /// 输出目录
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// 压缩包路径
    #[arg(long)]
    archive: Option<PathBuf>,

    /// 文本所在列
    #[arg(long)]
    text_column: Option<String>,
}

impl Cli {
    /// 默认值 → 配置文件 → 环境变量 → 命令行
    fn load_config(&self) -> Result<Config> {
        let config_path = self
            .config
            .clone()
            .or_else(|| std::env::var("DETECT_CONFIG").ok().map(PathBuf::from));

        let base = match config_path {
            Some(path) => Config::from_toml_file(&path)?,
            None => Config::default(),
        };

        let mut config = base.merge_env();
        if let Some(endpoint) = &self.endpoint {
            config.endpoint_url = endpoint.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrent_requests = concurrency;
        }
        if let Some(max_files) = self.max_files {
            config.max_concurrent_files = Some(max_files);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(archive) = &self.archive {
            config.archive_path = archive.clone();
        }
        if let Some(text_column) = &self.text_column {
            config.text_column = text_column.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn selector(&self) -> Box<dyn FileSelector> {
        match &self.input_dir {
            Some(dir) if self.files.is_empty() => Box::new(DirectorySelector::new(dir)),
            _ => Box::new(PathListSelector::new(self.files.clone())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    let cli = Cli::parse();

    // 加载配置
    let config = cli.load_config()?;

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let client = DetectorClient::new(&config, sink.clone()).context("无法创建 HTTP 客户端")?;

    // 初始化并运行应用
    let archive_path = config.archive_path.clone();
    let app = App::new(config, Arc::new(client), sink);
    let summary = app.run(cli.selector().as_ref()).await?;

    if summary.archive.is_some() {
        println!("Processed files are zipped into {}", archive_path.display());
    } else {
        println!("No files selected.");
    }

    Ok(())
}
