//! 可用性统计聚合器
//!
//! 按域名累计检测次数与可用次数，并按首次出现顺序输出可用率快照

use crate::health::result::CheckResult;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// 单个域名的累计统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    /// 总检测次数
    pub total: u64,
    /// 判定为可用的次数，始终不超过 `total`
    pub up: u64,
}

impl DomainStats {
    /// 记录一次检测
    pub fn update(&mut self, is_up: bool) {
        self.total += 1;
        if is_up {
            self.up += 1;
        }
    }

    /// 可用率百分比，四舍五入（0.5 向上）到整数
    ///
    /// 使用整数运算避免浮点误差：`round(100 * up / total) = (200 * up + total) / (2 * total)`。
    pub fn availability_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = (200 * self.up + self.total) / (2 * self.total);
        percent.min(100) as u8
    }
}

/// 快照中的一项：域名及其可用率
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainAvailability {
    /// 域名（主机与端口）
    pub domain: String,
    /// 可用率百分比
    pub percent: u8,
}

impl fmt::Display for DomainAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has {}% availability percentage",
            self.domain, self.percent
        )
    }
}

/// 可用率快照，按域名首次出现的顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvailabilitySnapshot(pub Vec<DomainAvailability>);

impl AvailabilitySnapshot {
    /// 转换为 `(域名, 百分比)` 列表
    pub fn as_pairs(&self) -> Vec<(&str, u8)> {
        self.0
            .iter()
            .map(|entry| (entry.domain.as_str(), entry.percent))
            .collect()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AvailabilitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("  ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// 可用性聚合器
///
/// 由检测循环独占持有，条目只增不删。
#[derive(Debug, Clone, Default)]
pub struct AvailabilityAggregator {
    stats: IndexMap<String, DomainStats>,
}

impl AvailabilityAggregator {
    /// 创建空的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次检测结果，没有域名的结果会被忽略
    pub fn record(&mut self, result: &CheckResult) {
        let Some(domain) = result.domain.as_deref() else {
            return;
        };

        match self.stats.get_mut(domain) {
            Some(stats) => stats.update(result.is_up),
            None => {
                let mut stats = DomainStats::default();
                stats.update(result.is_up);
                self.stats.insert(domain.to_string(), stats);
            }
        }
    }

    /// 当前所有域名的累计可用率
    pub fn snapshot(&self) -> AvailabilitySnapshot {
        AvailabilitySnapshot(
            self.stats
                .iter()
                .map(|(domain, stats)| DomainAvailability {
                    domain: domain.clone(),
                    percent: stats.availability_percent(),
                })
                .collect(),
        )
    }

    /// 查询单个域名的统计
    pub fn stats(&self, domain: &str) -> Option<DomainStats> {
        self.stats.get(domain).copied()
    }

    /// 已跟踪的域名数量
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// 是否尚未记录任何域名
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
