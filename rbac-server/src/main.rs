use rbac_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment()?;

    print_banner();

    tracing::info!("RBAC server starting...");

    // 2. 加载配置
    let config = Config::from_env()?;
    if config.is_production() {
        tracing::info!("Running in production mode");
    }

    // 3. 初始化服务器状态 (数据库 + 迁移)
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器 (Server::run 会引导管理员并启动后台任务)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
