//! Uptime Vitals - HTTP端点可用率监控工具
//!
//! 这是一个用Rust编写的轻量级可用率监控工具，支持：
//! - YAML/TOML端点列表配置
//! - 按周期逐个检测HTTP端点
//! - 按域名累计可用率并在每个周期输出报告
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod signal;

// 重新导出主要类型
pub use config::{EndpointConfigLoader, EndpointSpec, MonitorSettings};
pub use error::UptimeError;
pub use health::{
    AvailabilityAggregator, AvailabilitySnapshot, CheckResult, CycleOrchestrator,
    HttpEndpointChecker, Termination,
};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
