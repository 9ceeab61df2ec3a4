//! Uptime Vitals 主程序入口
//!
//! HTTP端点可用率监控工具

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};
use uptime_vitals::cli::{Args, OutputFormat};
use uptime_vitals::config::{ConfigLoader, EndpointConfigLoader};
use uptime_vitals::error::ConfigError;
use uptime_vitals::health::{CheckPolicy, CycleOrchestrator, HttpEndpointChecker, Termination};
use uptime_vitals::logging::{LogConfig, LoggingSystem};
use uptime_vitals::signal::setup_signal_handlers;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.effective_log_level(),
        file_path: args.log_file.clone(),
        json_format: args.log_format == OutputFormat::Json,
        ..Default::default()
    };

    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Uptime Vitals v{} 启动", uptime_vitals::VERSION);

    let settings = args.monitor_settings();
    if let Err(e) = settings.validate() {
        error!("{}", ConfigError::ValidationError(e));
        std::process::exit(1);
    }

    // 加载端点列表，失败直接退出
    let loader = EndpointConfigLoader::new(!args.no_env_substitution);
    let endpoints = match loader.load_from_file(&args.config_file).await {
        Ok(endpoints) => endpoints,
        Err(e) => {
            error!("加载端点配置失败: {}", e);
            std::process::exit(1);
        }
    };

    info!("已加载 {} 个端点:", endpoints.len());
    for endpoint in &endpoints {
        info!("{} - {}", endpoint.name, endpoint.url().unwrap_or("<缺少url>"));
    }

    let checker = match HttpEndpointChecker::new(CheckPolicy::from(&settings)) {
        Ok(checker) => Arc::new(checker),
        Err(e) => {
            error!("创建HTTP检测器失败: {}", e);
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    setup_signal_handlers(shutdown_tx).context("设置信号处理器失败")?;

    let mut orchestrator = CycleOrchestrator::new(checker, endpoints, settings.cycle_interval)
        .with_report_format(args.log_format.into());

    match orchestrator.run(shutdown_rx).await {
        Termination::Interrupted => {
            info!(
                "Uptime Vitals 已退出，共完成 {} 个检测周期",
                orchestrator.cycles_completed()
            );
        }
        Termination::Failed(e) => {
            // 循环内的意外错误只记录，不改变退出码
            error!("检测循环异常结束: {}", e);
        }
    }

    Ok(())
}
