use qa_subscriptions::{config::Config, state::AppState};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting answer subscription bootstrap...");

    // 连接存储并应用表结构
    let state = match AppState::connect(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize subscription store: {}", e);
            return Err(anyhow::anyhow!("Subscription store initialization failed"));
        }
    };

    info!(
        backend = ?state.config.storage_backend,
        environment = %state.config.environment,
        comment_notifications = state.config.enable_comment_notifications,
        "Subscription store ready"
    );

    Ok(())
}
