//! 检测周期编排器
//!
//! 顺序检测所有端点、汇总可用率、输出报告并等待下一周期，直到收到关闭信号

use crate::config::EndpointSpec;
use crate::error::CycleError;
use crate::health::aggregator::{AvailabilityAggregator, AvailabilitySnapshot};
use crate::health::checker::EndpointChecker;
use chrono::Local;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info};

/// 编排器所处的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// 正在逐个检测端点
    CheckingEndpoints,
    /// 正在输出本周期报告
    Reporting,
    /// 等待下一周期
    Sleeping,
    /// 已停止
    Terminated,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleState::CheckingEndpoints => write!(f, "checking"),
            CycleState::Reporting => write!(f, "reporting"),
            CycleState::Sleeping => write!(f, "sleeping"),
            CycleState::Terminated => write!(f, "terminated"),
        }
    }
}

/// 周期报告的输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// 人类可读的一行文本
    #[default]
    Text,
    /// JSON 数组
    Json,
}

/// 检测循环结束的原因
#[derive(Debug)]
pub enum Termination {
    /// 收到中断信号，正常退出
    Interrupted,
    /// 循环体内发生意外错误
    Failed(CycleError),
}

/// 检测周期编排器
///
/// 独占持有聚合器，统计的生命周期与编排器一致。
pub struct CycleOrchestrator {
    /// 端点检测器
    checker: Arc<dyn EndpointChecker>,
    /// 端点列表，按配置顺序检测
    endpoints: Vec<EndpointSpec>,
    /// 可用性聚合器
    aggregator: AvailabilityAggregator,
    /// 周期间隔
    interval: Duration,
    /// 报告格式
    report_format: ReportFormat,
    /// 当前状态，第一个周期开始前为空
    state: Option<CycleState>,
    /// 已完成的周期数
    cycles_completed: u64,
}

impl CycleOrchestrator {
    /// 创建新的编排器
    ///
    /// # 参数
    /// * `checker` - 端点检测器
    /// * `endpoints` - 已加载的端点列表
    /// * `interval` - 两个周期之间的等待时间
    pub fn new(
        checker: Arc<dyn EndpointChecker>,
        endpoints: Vec<EndpointSpec>,
        interval: Duration,
    ) -> Self {
        Self {
            checker,
            endpoints,
            aggregator: AvailabilityAggregator::new(),
            interval,
            report_format: ReportFormat::default(),
            state: None,
            cycles_completed: 0,
        }
    }

    /// 设置报告格式
    pub fn with_report_format(mut self, report_format: ReportFormat) -> Self {
        self.report_format = report_format;
        self
    }

    /// 当前状态，尚未开始任何周期时返回 `None`
    pub fn state(&self) -> Option<CycleState> {
        self.state
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn aggregator(&self) -> &AvailabilityAggregator {
        &self.aggregator
    }

    fn transition(&mut self, next: CycleState) {
        match self.state {
            Some(current) => debug!("检测循环状态: {} -> {}", current, next),
            None => debug!("检测循环状态: {}", next),
        }
        self.state = Some(next);
    }

    /// 执行一个完整周期：检测全部端点并输出报告
    pub async fn run_cycle(&mut self) -> Result<AvailabilitySnapshot, CycleError> {
        self.transition(CycleState::CheckingEndpoints);
        info!(
            "开始健康检测周期: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        for endpoint in &self.endpoints {
            let result = self.checker.check(endpoint).await;
            self.aggregator.record(&result);
        }

        self.transition(CycleState::Reporting);
        let snapshot = self.aggregator.snapshot();
        self.report(&snapshot)?;
        self.cycles_completed += 1;

        Ok(snapshot)
    }

    /// 输出周期报告
    fn report(&self, snapshot: &AvailabilitySnapshot) -> Result<(), CycleError> {
        match self.report_format {
            ReportFormat::Text => info!("周期结果: {}", snapshot),
            ReportFormat::Json => info!("周期结果: {}", serde_json::to_string(snapshot)?),
        }
        Ok(())
    }

    /// 持续运行检测循环，直到收到关闭信号或发生意外错误
    ///
    /// 检测和等待阶段都会响应关闭信号，正在进行的请求会被直接放弃。
    pub async fn run(&mut self, mut shutdown_rx: broadcast::Receiver<()>) -> Termination {
        info!("检测循环已启动，端点数量: {}", self.endpoints.len());

        loop {
            let cycle = tokio::select! {
                biased;
                signal = shutdown_rx.recv() => Err(signal),
                result = self.run_cycle() => Ok(result),
            };

            match cycle {
                Err(signal) => return self.shutdown(signal),
                Ok(Err(e)) => {
                    error!("检测循环发生意外错误: {}", e);
                    self.transition(CycleState::Terminated);
                    return Termination::Failed(e);
                }
                Ok(Ok(_)) => {}
            }

            self.transition(CycleState::Sleeping);
            info!(
                "周期完成，等待 {} 秒进入下一周期...",
                self.interval.as_secs_f64()
            );

            tokio::select! {
                biased;
                signal = shutdown_rx.recv() => return self.shutdown(signal),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// 处理关闭信号
    fn shutdown(&mut self, signal: Result<(), RecvError>) -> Termination {
        self.transition(CycleState::Terminated);

        match signal {
            Ok(()) | Err(RecvError::Lagged(_)) => {
                info!("收到中断信号，检测循环优雅退出");
                Termination::Interrupted
            }
            Err(RecvError::Closed) => {
                error!("等待关闭信号失败: {}", CycleError::SignalChannelClosed);
                Termination::Failed(CycleError::SignalChannelClosed)
            }
        }
    }
}
