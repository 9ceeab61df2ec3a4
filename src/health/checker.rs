//! HTTP端点检测器实现
//!
//! 对单个端点发出一次带超时的HTTP请求，并把结果归类为可用/不可用

use crate::config::{EndpointSpec, MonitorSettings};
use crate::error::{CheckError, Result};
use crate::health::result::CheckResult;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, warn};
use url::{Position, Url};

/// 端点检测器trait，定义检测接口
///
/// 实现必须自行消化所有错误：任何失败都以 `is_up = false` 的结果返回。
#[async_trait]
pub trait EndpointChecker: Send + Sync {
    /// 对一个端点执行一次检测
    async fn check(&self, spec: &EndpointSpec) -> CheckResult;
}

/// 检测策略：超时时间与可用性判定阈值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPolicy {
    /// 请求开始到响应体读取完成的总超时
    pub timeout: Duration,
    /// 延迟必须严格小于该值才算可用
    pub latency_threshold: Duration,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self::from(&MonitorSettings::default())
    }
}

impl From<&MonitorSettings> for CheckPolicy {
    fn from(settings: &MonitorSettings) -> Self {
        Self {
            timeout: settings.request_timeout,
            latency_threshold: settings.latency_threshold,
        }
    }
}

impl CheckPolicy {
    /// 判定一次完成的请求是否可用
    ///
    /// 状态码在 `200..300` 且延迟严格小于阈值。
    pub fn classify(&self, status_code: u16, latency: Duration) -> bool {
        (200..300).contains(&status_code) && latency < self.latency_threshold
    }
}

/// 从URL中提取主机与端口，作为统计的聚合键
///
/// 例如 `https://api.example.com:8443/v1/ping` 得到 `api.example.com:8443`。
/// 主机名会被规范化为小写，协议默认端口会被省略，用户信息不包含在内，
/// 因此 `HTTPS://X/`、`https://x:443/` 与 `https://x/` 归入同一个键 `x`。
pub fn extract_domain(raw_url: &str) -> std::result::Result<String, CheckError> {
    parse_target(raw_url).map(|(_, domain)| domain)
}

/// 解析请求地址并得到聚合键
fn parse_target(raw_url: &str) -> std::result::Result<(Url, String), CheckError> {
    let url = Url::parse(raw_url).map_err(|source| CheckError::InvalidUrl {
        url: raw_url.to_string(),
        source,
    })?;

    let authority = &url[Position::BeforeHost..Position::AfterPort];
    if authority.is_empty() {
        return Err(CheckError::InvalidUrl {
            url: raw_url.to_string(),
            source: url::ParseError::EmptyHost,
        });
    }

    let domain = authority.to_string();
    Ok((url, domain))
}

/// 无法解析的URL按字面截取 `//` 与路径之间的部分，去掉用户信息
///
/// 例如 `http://example.com:99999/health` 得到 `example.com:99999`。
/// 没有 `//` 或截取结果为空时返回 `None`。
fn raw_authority(raw_url: &str) -> Option<String> {
    let raw_url = raw_url.trim();
    let rest = match raw_url.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let (scheme, rest) = raw_url.split_once("://")?;
            if scheme.is_empty() || scheme.contains(['/', '?', '#']) {
                return None;
            }
            rest
        }
    };

    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// 该方法是否携带请求体
fn carries_body(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// HTTP端点检测器实现
pub struct HttpEndpointChecker {
    /// HTTP客户端
    client: Client,
    /// 检测策略
    policy: CheckPolicy,
}

impl HttpEndpointChecker {
    /// 创建新的HTTP端点检测器
    ///
    /// # 参数
    /// * `policy` - 超时与判定阈值
    ///
    /// # 返回
    /// * `Result<Self>` - 检测器实例
    pub fn new(policy: CheckPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(policy.timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(CheckError::RequestError)?;

        Ok(Self { client, policy })
    }

    /// 构建HTTP请求
    fn build_request(
        &self,
        spec: &EndpointSpec,
        url: Url,
    ) -> std::result::Result<reqwest::RequestBuilder, CheckError> {
        let method = Method::from_bytes(spec.method.to_uppercase().as_bytes())
            .map_err(|_| CheckError::InvalidMethod(spec.method.clone()))?;

        let body = if carries_body(&method) {
            spec.body.clone()
        } else {
            None
        };

        let mut request = self.client.request(method, url);

        for (key, value) in &spec.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| CheckError::InvalidHeader(key.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| CheckError::InvalidHeader(key.clone()))?;
            request = request.header(name, value);
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request)
    }

    /// 执行单次HTTP请求，返回状态码与耗时
    ///
    /// 耗时从发出请求前开始计算，到响应体读取完成为止。
    async fn perform_request(
        &self,
        spec: &EndpointSpec,
        url: Url,
    ) -> std::result::Result<(u16, Duration), CheckError> {
        let request = self.build_request(spec, url)?;

        let start_time = Instant::now();
        let exchange = async {
            let response = request.send().await?;
            let status_code = response.status().as_u16();
            response.bytes().await?;
            Ok::<_, reqwest::Error>(status_code)
        };

        let status_code = timeout(self.policy.timeout, exchange)
            .await
            .map_err(|_| CheckError::Timeout {
                timeout_ms: self.policy.timeout.as_millis() as u64,
            })??;

        Ok((status_code, start_time.elapsed()))
    }

    /// 格式化检测错误信息，使其更加清晰易读
    fn format_check_error(&self, error: &CheckError) -> String {
        let CheckError::RequestError(error) = error else {
            return error.to_string();
        };

        if error.is_timeout() {
            format!("Request timeout ({}ms)", self.policy.timeout.as_millis())
        } else if error.is_connect() {
            format!("Connection failed: {error}")
        } else if error.is_builder() {
            format!("Invalid request: {error}")
        } else if error.is_body() || error.is_decode() {
            format!("Malformed response: {error}")
        } else {
            format!("Request failed: {error}")
        }
    }
}

#[async_trait]
impl EndpointChecker for HttpEndpointChecker {
    async fn check(&self, spec: &EndpointSpec) -> CheckResult {
        let Some(raw_url) = spec.url() else {
            warn!(
                "{}",
                CheckError::MissingUrl {
                    name: spec.name.clone()
                }
            );
            return CheckResult::unrecorded();
        };

        let (url, domain) = match parse_target(raw_url) {
            Ok(target) => target,
            Err(e) => {
                error!("检测端点失败 {}: {}", spec.name, e);
                // 地址无法解析也按该端点的字面主机记一次不可用
                return CheckResult::failed(raw_authority(raw_url));
            }
        };

        match self.perform_request(spec, url).await {
            Ok((status_code, latency)) => {
                let is_up = self.policy.classify(status_code, latency);
                debug!(
                    "端点 {} 响应 {} 耗时 {:.2}ms, 可用: {}",
                    spec.name,
                    status_code,
                    latency.as_secs_f64() * 1000.0,
                    is_up
                );
                CheckResult::completed(domain, is_up, status_code, latency)
            }
            Err(e) => {
                error!("检测端点失败 {}: {}", spec.name, self.format_check_error(&e));
                CheckResult::failed(Some(domain))
            }
        }
    }
}
