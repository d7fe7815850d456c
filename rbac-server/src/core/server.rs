//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::api;
use crate::core::{Config, Result, ServerState};
use crate::db::bootstrap;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        if let Some(password) = &self.config.admin_password {
            let created = bootstrap::ensure_admin(
                state.pool(),
                state.hasher.as_ref(),
                &self.config.admin_name,
                password,
            )
            .await?;
            if created {
                tracing::info!(name = %self.config.admin_name, "Initial admin account created");
            }
        }

        let tasks = state.start_background_tasks();
        let app = api::build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("RBAC server listening on {}", listener.local_addr()?);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        tasks.shutdown().await;
        served?;
        Ok(())
    }
}
