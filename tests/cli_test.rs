//! 命令行进程测试
//!
//! 直接运行编译好的二进制，校验退出码与日志输出

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::{NamedTempFile, TempDir};

fn uptime_vitals(log_file: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_uptime-vitals"));
    command
        .env_remove("RUST_LOG")
        .env_remove("UPTIME_VITALS_CONFIG")
        .env_remove("UPTIME_VITALS_INTERVAL")
        .arg("--log-file")
        .arg(log_file)
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

fn write_config(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn read_log(log_file: &Path) -> String {
    fs::read_to_string(log_file).unwrap_or_default()
}

fn wait_for_log(log_file: &Path, needle: &str, child: &mut Child) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if read_log(log_file).contains(needle) {
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    let _ = child.kill();
    panic!("日志中未出现 {needle:?}:\n{}", read_log(log_file));
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> ExitStatus {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("进程未在 {timeout:?} 内退出");
        }
        thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn test_missing_config_file_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("uptime.log");

    let status = uptime_vitals(&log_file)
        .arg(dir.path().join("does-not-exist.yaml"))
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(read_log(&log_file).contains("配置文件不存在"));
}

#[test]
fn test_mapping_config_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("uptime.log");
    let config = write_config(".yaml", "a: 1\n");

    let status = uptime_vitals(&log_file)
        .arg(config.path())
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(read_log(&log_file).contains("配置文件必须包含端点列表"));
}

#[test]
fn test_zero_interval_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("uptime.log");
    let config = write_config(".yaml", "- name: orphan\n");

    let status = uptime_vitals(&log_file)
        .args(["--interval", "0"])
        .arg(config.path())
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(read_log(&log_file).contains("检测间隔不能为0"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_during_sleep_exits_with_zero() {
    let mut server = mockito::Server::new();
    let _ok = server.mock("GET", "/health").with_status(200).create();

    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("uptime.log");
    let config = write_config(
        ".toml",
        &format!(
            "[[endpoints]]\nname = \"local\"\nurl = \"{}/health\"\n",
            server.url()
        ),
    );

    let mut child = uptime_vitals(&log_file)
        .args(["--interval", "3600"])
        .arg(config.path())
        .spawn()
        .unwrap();

    // 第一个周期报告输出后进程进入等待阶段
    wait_for_log(&log_file, "等待 3600 秒进入下一周期", &mut child);

    let kill = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(kill.success());

    let status = wait_with_timeout(&mut child, Duration::from_secs(10));
    assert_eq!(status.code(), Some(0));

    let log = read_log(&log_file);
    assert!(log.contains(&format!(
        "{} has 100% availability percentage",
        server.host_with_port()
    )));
    assert!(log.contains("收到中断信号，检测循环优雅退出"));
}
