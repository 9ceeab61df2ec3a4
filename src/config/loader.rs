//! 配置加载器实现
//!
//! 提供YAML/TOML端点列表解析、环境变量替换和错误处理功能

use crate::config::types::{EndpointSpec, TomlEndpoints};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// 顶层为端点序列的YAML文档
    Yaml,
    /// 端点列表位于 `[[endpoints]]` 的TOML文档
    Toml,
}

impl ConfigFormat {
    /// 根据文件扩展名判断格式，`.toml` 以外一律按YAML处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载端点列表
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Vec<EndpointSpec>>;

    /// 从字符串加载端点列表
    fn load_from_string(&self, content: &str, format: ConfigFormat) -> Result<Vec<EndpointSpec>>;
}

/// 端点配置加载器实现
#[derive(Debug, Clone)]
pub struct EndpointConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl EndpointConfigLoader {
    /// 创建新的配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的 `${VAR_NAME}` 环境变量
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {e}")))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析YAML内容，顶层必须是序列
    fn parse_yaml(&self, content: &str) -> Result<Vec<EndpointSpec>> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("YAML解析失败: {e}")))?;

        if !value.is_sequence() {
            return Err(ConfigError::NotASequence.into());
        }

        let endpoints = serde_yaml::from_value(value)
            .map_err(|e| ConfigError::ParseError(format!("端点配置无效: {e}")))?;

        Ok(endpoints)
    }

    /// 解析TOML内容，端点列表位于 `endpoints` 数组
    fn parse_toml(&self, content: &str) -> Result<Vec<EndpointSpec>> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {e}")))?;

        match table.get("endpoints") {
            Some(toml::Value::Array(_)) => {}
            _ => return Err(ConfigError::NotASequence.into()),
        }

        let parsed: TomlEndpoints = toml::Value::Table(table)
            .try_into()
            .map_err(|e| ConfigError::ParseError(format!("端点配置无效: {e}")))?;

        Ok(parsed.endpoints)
    }
}

impl Default for EndpointConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConfigLoader for EndpointConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Vec<EndpointSpec>> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_string_lossy().to_string(),
                source,
            })?;

        let endpoints = self.load_from_string(&content, ConfigFormat::from_path(path))?;

        log::info!("成功解析配置文件: {}", path.display());
        log::debug!("端点配置: {:?}", endpoints);

        Ok(endpoints)
    }

    fn load_from_string(&self, content: &str, format: ConfigFormat) -> Result<Vec<EndpointSpec>> {
        let processed_content = self.substitute_env_vars(content)?;

        match format {
            ConfigFormat::Yaml => self.parse_yaml(&processed_content),
            ConfigFormat::Toml => self.parse_toml(&processed_content),
        }
    }
}
