//! 日志初始化
//!
//! 安装 `tracing-subscriber` 的 fmt 订阅者，并把 `log` crate 的记录桥接到 tracing。
//! 过滤规则优先读取 `RUST_LOG`，否则使用给定的默认指令。

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

static INITIALISED: AtomicBool = AtomicBool::new(false);

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Global subscriber already set: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Log bridge already set: {0}")]
    LogBridge(#[from] log::SetLoggerError),
}

/// 以默认级别 `info` 初始化日志
///
/// 重复调用是空操作。
pub fn init_logger() -> Result<(), LoggerError> {
    init_logger_with("info")
}

/// 以给定的默认过滤指令初始化日志（如 `"urarm_client=debug"`）
pub fn init_logger_with(default_directive: &str) -> Result<(), LoggerError> {
    if INITIALISED.swap(true, Ordering::AcqRel) {
        return Ok(());
    }

    let result = install(default_directive);
    if result.is_err() {
        INITIALISED.store(false, Ordering::Release);
    }
    result
}

fn install(default_directive: &str) -> Result<(), LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)?,
    };

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}
