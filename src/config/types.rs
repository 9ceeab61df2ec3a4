//! 配置数据结构定义
//!
//! 定义端点配置结构体和运行参数

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 端点名称缺省时使用的占位名
pub const UNNAMED_ENDPOINT: &str = "Unnamed";

/// 单个被检测端点的配置
///
/// 除 `url` 外所有字段都有默认值。`url` 缺失时端点仍会被加载，
/// 但每个周期都只会产生一条警告而不会发出请求。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointSpec {
    /// 显示名称
    #[serde(default = "default_name")]
    pub name: String,
    /// 端点URL
    #[serde(default)]
    pub url: Option<String>,
    /// HTTP方法
    #[serde(default = "default_method")]
    pub method: String,
    /// 请求头，保持配置文件中的顺序
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// 原始请求体
    #[serde(default)]
    pub body: Option<String>,
}

impl EndpointSpec {
    /// 创建只有 url 的端点配置，其余字段取默认值
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            url: Some(url.into()),
            method: default_method(),
            headers: IndexMap::new(),
            body: None,
        }
    }

    /// 设置名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置HTTP方法
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// 添加请求头
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// 设置请求体
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// 返回非空的 url
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// TOML 配置文件的顶层结构
///
/// TOML 文档的根必须是表，所以端点列表放在 `endpoints` 数组中。
#[derive(Debug, Clone, Deserialize)]
pub struct TomlEndpoints {
    /// 端点列表
    pub endpoints: Vec<EndpointSpec>,
}

/// 检测循环的运行参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// 两个周期之间的等待时间
    pub cycle_interval: Duration,
    /// 单次请求的超时时间
    pub request_timeout: Duration,
    /// 判定为可用的延迟上限（不含）
    pub latency_threshold: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_secs(default_cycle_interval_secs()),
            request_timeout: Duration::from_millis(default_request_timeout_ms()),
            latency_threshold: Duration::from_millis(default_latency_threshold_ms()),
        }
    }
}

impl MonitorSettings {
    /// 验证运行参数
    pub fn validate(&self) -> Result<(), String> {
        if self.cycle_interval.is_zero() {
            return Err("检测间隔不能为0".to_string());
        }

        if self.request_timeout.is_zero() {
            return Err("请求超时时间不能为0".to_string());
        }

        Ok(())
    }
}

// 默认值函数
fn default_name() -> String {
    UNNAMED_ENDPOINT.to_string()
}
fn default_method() -> String {
    "GET".to_string()
}
pub(crate) fn default_cycle_interval_secs() -> u64 {
    15
}
pub(crate) fn default_request_timeout_ms() -> u64 {
    2000
}
pub(crate) fn default_latency_threshold_ms() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults_from_yaml() {
        let spec: EndpointSpec = serde_yaml::from_str("url: https://example.com/health").unwrap();

        assert_eq!(spec.name, UNNAMED_ENDPOINT);
        assert_eq!(spec.url(), Some("https://example.com/health"));
        assert_eq!(spec.method, "GET");
        assert!(spec.headers.is_empty());
        assert!(spec.body.is_none());
    }

    #[test]
    fn test_endpoint_without_url() {
        let spec: EndpointSpec = serde_yaml::from_str("name: orphan").unwrap();
        assert_eq!(spec.name, "orphan");
        assert!(spec.url().is_none());

        let empty = EndpointSpec::new("");
        assert!(empty.url().is_none());

        // 只有空白的 url 交给检测器按无效地址处理
        let blank = EndpointSpec::new("   ");
        assert_eq!(blank.url(), Some("   "));
    }

    #[test]
    fn test_headers_keep_order() {
        let yaml = r#"
url: https://example.com
headers:
  X-Second: b
  Authorization: token
  Accept: "*/*"
"#;
        let spec: EndpointSpec = serde_yaml::from_str(yaml).unwrap();
        let keys: Vec<&str> = spec.headers.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["X-Second", "Authorization", "Accept"]);
    }

    #[test]
    fn test_builder_pattern() {
        let spec = EndpointSpec::new("https://example.com/api")
            .with_name("api")
            .with_method("POST")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"ping":true}"#);

        assert_eq!(spec.name, "api");
        assert_eq!(spec.method, "POST");
        assert_eq!(
            spec.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(spec.body.as_deref(), Some(r#"{"ping":true}"#));
    }

    #[test]
    fn test_default_settings() {
        let settings = MonitorSettings::default();

        assert_eq!(settings.cycle_interval, Duration::from_secs(15));
        assert_eq!(settings.request_timeout, Duration::from_millis(2000));
        assert_eq!(settings.latency_threshold, Duration::from_millis(500));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = MonitorSettings::default();
        settings.cycle_interval = Duration::ZERO;
        assert!(settings.validate().unwrap_err().contains("检测间隔"));

        let mut settings = MonitorSettings::default();
        settings.request_timeout = Duration::ZERO;
        assert!(settings.validate().unwrap_err().contains("超时"));
    }
}
