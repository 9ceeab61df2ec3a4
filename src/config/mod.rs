//! 配置管理模块
//!
//! 提供端点配置文件解析和运行参数定义

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{ConfigFormat, ConfigLoader, EndpointConfigLoader};
pub use types::{EndpointSpec, MonitorSettings, UNNAMED_ENDPOINT};
