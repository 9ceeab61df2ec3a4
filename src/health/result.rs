//! 端点检测结果数据结构

use std::time::Duration;

/// 单个端点在单个周期内的检测结果
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// 从配置URL中提取的主机与端口，url 缺失或无法解析时为空
    pub domain: Option<String>,
    /// 是否判定为可用
    pub is_up: bool,
    /// 请求耗时（毫秒），请求未完成时为空
    pub latency_ms: Option<f64>,
    /// HTTP状态码（如果收到响应）
    pub status_code: Option<u16>,
}

impl CheckResult {
    /// 收到响应时的结果
    pub fn completed(domain: String, is_up: bool, status_code: u16, latency: Duration) -> Self {
        Self {
            domain: Some(domain),
            is_up,
            latency_ms: Some(latency.as_secs_f64() * 1000.0),
            status_code: Some(status_code),
        }
    }

    /// 请求失败时的结果，仍然计入该域名的统计
    pub fn failed(domain: Option<String>) -> Self {
        Self {
            domain,
            is_up: false,
            latency_ms: None,
            status_code: None,
        }
    }

    /// 不计入统计的结果（url 缺失）
    pub fn unrecorded() -> Self {
        Self::failed(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_result() {
        let result = CheckResult::completed(
            "example.com".to_string(),
            true,
            200,
            Duration::from_micros(42_500),
        );

        assert_eq!(result.domain.as_deref(), Some("example.com"));
        assert!(result.is_up);
        assert_eq!(result.status_code, Some(200));
        assert!((result.latency_ms.unwrap() - 42.5).abs() < 1e-9);
    }

    #[test]
    fn test_failed_result() {
        let result = CheckResult::failed(Some("example.com".to_string()));
        assert!(!result.is_up);
        assert!(result.latency_ms.is_none());
        assert!(result.status_code.is_none());

        let unrecorded = CheckResult::unrecorded();
        assert!(unrecorded.domain.is_none());
        assert!(!unrecorded.is_up);
    }
}
