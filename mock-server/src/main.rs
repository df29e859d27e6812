use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// In-memory Pet service for exercising the client.
#[derive(Debug, Parser)]
#[command(name = "mock-server")]
struct ServerConfig {
    /// Host address to bind to.
    #[arg(long, env = "MOCK_SERVER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Log level (error, warn, info, debug, trace). `RUST_LOG` wins when set.
    #[arg(long, env = "MOCK_SERVER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let config = ServerConfig::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    mock_server::run(listener).await
}
