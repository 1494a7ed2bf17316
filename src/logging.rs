//! 进程级日志
//!
//! 启动时初始化一次：INFO 及以上写入固定日志文件，
//! WARN 及以上（--verbose 时 DEBUG）输出到 stderr。
//! 图片下载的命中/失败诊断依赖该日志文件。

use crate::error::Result;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// 固定日志文件（相对当前工作目录）
pub const LOG_FILE_NAME: &str = "visitor-report.log";

pub fn init(verbose: bool) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE_NAME)?;

    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .with_filter(LevelFilter::INFO),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(stderr_filter),
        )
        .init();

    Ok(())
}
