use anyhow::{Context, Result};
use chat_markdown::DEFAULT_TITLE;
use chat_markdown_server::{run_server, ServerConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind.
    #[arg(long, env = "CHAT_MD_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "CHAT_MD_PORT", default_value_t = 5000)]
    port: u16,

    /// Title block text for generated documents.
    #[arg(long, env = "CHAT_MD_TITLE", default_value = DEFAULT_TITLE)]
    title: String,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "CHAT_MD_MAX_BODY_BYTES", default_value_t = 2 * 1024 * 1024)]
    max_body_bytes: usize,

    /// Log at INFO level regardless of RUST_LOG.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        title: args.title,
        max_body_bytes: args.max_body_bytes,
    };
    let addr = format!("{}:{}", config.host, config.port);
    run_server(config)
        .await
        .with_context(|| format!("serve on {addr}"))
}
