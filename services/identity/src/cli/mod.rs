//! ids-server CLI 分发：`run`、`doctor`、`version`、`help`。

use anyhow::anyhow;
use serde_json::json;

use crate::config::Config;

/// CLI 分发结果。
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CliDispatch {
    /// 继续进入服务主循环。
    Run,
    /// 命令已处理完成，主程序应退出。
    Exit,
}

/// 解析并执行 CLI。
pub(crate) fn dispatch(args: &[String]) -> anyhow::Result<CliDispatch> {
    if args.is_empty() {
        return Ok(CliDispatch::Run);
    }

    let cmd = args[0].trim();
    if cmd.is_empty() || cmd == "run" {
        return Ok(CliDispatch::Run);
    }

    if matches!(cmd, "-h" | "--help" | "help") {
        print_root_help();
        return Ok(CliDispatch::Exit);
    }

    match cmd {
        "doctor" => {
            let format = parse_doctor_format(&args[1..])?;
            let config = Config::from_env()?;
            println!("{}", render_doctor(&config, format));
            Ok(CliDispatch::Exit)
        }
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(CliDispatch::Exit)
        }
        other => Err(anyhow!(
            "unknown command: {other}; run `ids-server --help` for usage"
        )),
    }
}

/// `doctor` 输出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DoctorFormat {
    Text,
    Json,
}

/// 解析 doctor 的 `--format` 参数。
fn parse_doctor_format(args: &[String]) -> anyhow::Result<DoctorFormat> {
    if args.is_empty() {
        return Ok(DoctorFormat::Text);
    }
    if args.len() == 2 && args[0] == "--format" {
        return match args[1].as_str() {
            "text" => Ok(DoctorFormat::Text),
            "json" => Ok(DoctorFormat::Json),
            other => Err(anyhow!("unsupported doctor format: {other}")),
        };
    }
    Err(anyhow!("usage: ids-server doctor [--format text|json]"))
}

/// 渲染生效配置；密钥只输出是否为默认值。
fn render_doctor(config: &Config, format: DoctorFormat) -> String {
    let secret = if config.uses_default_secret() {
        "default (insecure)"
    } else {
        "custom"
    };
    match format {
        DoctorFormat::Text => [
            format!("listen-addr: {}", config.addr),
            format!("jwt-secret: {secret}"),
            format!("token-ttl-sec: {}", config.token_ttl_sec),
            format!("bcrypt-cost: {}", config.bcrypt_cost),
        ]
        .join("\n"),
        DoctorFormat::Json => {
            let payload = json!({
                "listenAddr": config.addr,
                "jwtSecret": secret,
                "tokenTtlSec": config.token_ttl_sec,
                "bcryptCost": config.bcrypt_cost,
            });
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// 打印 root help。
fn print_root_help() {
    println!("ids-server usage:");
    println!("  ids-server run");
    println!("  ids-server doctor [--format text|json]");
    println!("  ids-server version");
    println!();
    println!("environment:");
    println!("  IDS_ADDR, IDS_JWT_SECRET, IDS_TOKEN_TTL_SEC, IDS_BCRYPT_COST,");
    println!("  IDS_LOG_DIR, IDS_FILE_LOG_LEVEL, RUST_LOG");
}

#[cfg(test)]
mod tests {
    use super::{CliDispatch, DoctorFormat, dispatch, parse_doctor_format, render_doctor};
    use crate::config::Config;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_and_run_start_the_service() {
        assert_eq!(dispatch(&[]).unwrap(), CliDispatch::Run);
        assert_eq!(dispatch(&args(&["run"])).unwrap(), CliDispatch::Run);
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(dispatch(&args(&["serve"])).is_err());
    }

    #[test]
    fn doctor_format_parsing() {
        assert_eq!(parse_doctor_format(&[]).unwrap(), DoctorFormat::Text);
        assert_eq!(
            parse_doctor_format(&args(&["--format", "json"])).unwrap(),
            DoctorFormat::Json
        );
        assert!(parse_doctor_format(&args(&["--format", "yaml"])).is_err());
        assert!(parse_doctor_format(&args(&["json"])).is_err());
    }

    #[test]
    fn doctor_never_prints_the_secret() {
        let config = Config::from_lookup(|key| match key {
            "IDS_JWT_SECRET" => Some("prod-secret".to_string()),
            _ => None,
        })
        .unwrap();
        for format in [DoctorFormat::Text, DoctorFormat::Json] {
            let rendered = render_doctor(&config, format);
            assert!(!rendered.contains("prod-secret"));
            assert!(rendered.contains("custom"));
        }
    }
}
