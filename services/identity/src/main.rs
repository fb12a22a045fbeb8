//! 身份服务二进制入口：仅负责启动应用。

mod api;
mod app;
mod auth;
mod cli;
mod config;
mod error;
mod logging;
mod state;
mod users;

#[tokio::main]
/// 启动身份服务。
async fn main() -> anyhow::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    match cli::dispatch(&args)? {
        cli::CliDispatch::Run => {}
        cli::CliDispatch::Exit => return Ok(()),
    }

    let config = config::Config::from_env()?;
    let _log_runtime = logging::init("identity")?;
    app::run(config).await
}
