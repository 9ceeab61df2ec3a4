//! 健康检测模块
//!
//! 提供HTTP端点检测、可用性聚合和检测周期编排功能

pub mod aggregator;
pub mod checker;
pub mod cycle;
pub mod result;

// 重新导出主要类型
pub use aggregator::{AvailabilityAggregator, AvailabilitySnapshot, DomainAvailability, DomainStats};
pub use checker::{extract_domain, CheckPolicy, EndpointChecker, HttpEndpointChecker};
pub use cycle::{CycleOrchestrator, CycleState, ReportFormat, Termination};
pub use result::CheckResult;
