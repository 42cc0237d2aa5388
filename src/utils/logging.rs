/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::{info, warn};

/// 峰值并发超过该值时给出提示
const PEAK_CONCURRENCY_WARN: usize = 50;

/// 记录程序启动信息
///
/// # 参数
/// - `file_count`: 选中的文件数
/// - `file_slots`: 同时处理的文件数
/// - `request_slots`: 每个文件同时进行的请求数
pub fn log_startup(file_count: usize, file_slots: usize, request_slots: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量文本检测模式");
    info!("📁 待处理文件: {}", file_count);
    info!("📊 文件并发: {} | 单文件请求并发: {}", file_slots, request_slots);
    info!("{}", "=".repeat(60));

    let peak = file_slots.saturating_mul(request_slots);
    if peak > PEAK_CONCURRENCY_WARN {
        warn!(
            "⚠️ 峰值并发请求数可达 {}，可通过 MAX_CONCURRENT_FILES 限制",
            peak
        );
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
pub fn print_final_stats(success: usize, failed: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
