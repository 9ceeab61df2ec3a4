//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::types::{
    default_cycle_interval_secs, default_latency_threshold_ms, default_request_timeout_ms,
};
use crate::config::MonitorSettings;
use crate::health::ReportFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Uptime Vitals - HTTP端点可用率监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "uptime-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 端点配置文件路径（YAML，或 `.toml` 扩展名的TOML）
    #[arg(value_name = "CONFIG_FILE", env = "UPTIME_VITALS_CONFIG")]
    pub config_file: PathBuf,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "UPTIME_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 日志与周期报告的输出格式
    #[arg(
        long,
        value_enum,
        default_value = "text",
        help = "日志输出格式",
        env = "UPTIME_VITALS_LOG_FORMAT"
    )]
    pub log_format: OutputFormat,

    /// 日志文件路径，指定后不再输出到控制台
    #[arg(
        long,
        value_name = "FILE",
        help = "日志文件路径",
        env = "UPTIME_VITALS_LOG_FILE"
    )]
    pub log_file: Option<PathBuf>,

    /// 是否启用详细输出
    #[arg(short, long, help = "启用详细输出")]
    pub verbose: bool,

    /// 检测周期间隔（秒）
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = default_cycle_interval_secs(),
        help = "检测周期间隔（秒）",
        env = "UPTIME_VITALS_INTERVAL"
    )]
    pub interval: u64,

    /// 单次请求超时时间（毫秒）
    #[arg(
        long,
        value_name = "MS",
        default_value_t = default_request_timeout_ms(),
        help = "请求超时时间（毫秒）",
        env = "UPTIME_VITALS_TIMEOUT_MS"
    )]
    pub timeout_ms: u64,

    /// 判定为可用的延迟上限（毫秒，不含）
    #[arg(
        long,
        value_name = "MS",
        default_value_t = default_latency_threshold_ms(),
        help = "可用延迟上限（毫秒）",
        env = "UPTIME_VITALS_LATENCY_THRESHOLD_MS"
    )]
    pub latency_threshold_ms: u64,

    /// 关闭配置文件中的 `${VAR}` 环境变量替换
    #[arg(long, help = "关闭环境变量替换")]
    pub no_env_substitution: bool,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

impl Args {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 生效的日志级别，`--verbose` 会提升到调试级别
    pub fn effective_log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            self.log_level.clone().into()
        }
    }

    /// 由命令行参数构造运行参数
    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            cycle_interval: Duration::from_secs(self.interval),
            request_timeout: Duration::from_millis(self.timeout_ms),
            latency_threshold: Duration::from_millis(self.latency_threshold_ms),
        }
    }
}
