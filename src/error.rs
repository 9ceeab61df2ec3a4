//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Uptime Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum UptimeError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 端点检测相关错误
    #[error("检测错误: {0}")]
    Check(#[from] CheckError),

    /// 检测循环错误
    #[error("检测循环错误: {0}")]
    Cycle(#[from] CycleError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 配置文件读取失败
    #[error("读取配置文件失败 {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 顶层结构不是端点列表
    #[error("配置文件必须包含端点列表")]
    NotASequence,

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },

    /// 运行参数验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),
}

/// 单个端点检测的错误类型
///
/// 这些错误不会离开检测器，而是被转换为 `is_up = false` 的检测结果。
#[derive(Error, Debug)]
pub enum CheckError {
    /// 端点缺少 url
    #[error("端点 {name} 缺少 url 配置")]
    MissingUrl { name: String },

    /// url 无法解析为绝对地址
    #[error("无效的URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP 方法无效
    #[error("无效的HTTP方法: {0}")]
    InvalidMethod(String),

    /// 请求头无效
    #[error("无效的请求头: {0}")]
    InvalidHeader(String),

    /// 超时错误
    #[error("请求超时 ({timeout_ms}ms)")]
    Timeout { timeout_ms: u64 },

    /// HTTP请求错误
    #[error("HTTP请求失败: {0}")]
    RequestError(#[from] reqwest::Error),
}

/// 检测循环中不可恢复的错误
#[derive(Error, Debug)]
pub enum CycleError {
    /// 周期报告序列化失败
    #[error("周期报告序列化失败: {0}")]
    Report(#[from] serde_json::Error),

    /// 关闭信号通道已关闭
    #[error("关闭信号通道已关闭")]
    SignalChannelClosed,
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, UptimeError>;
