use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokenclass::config::{
    DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_IN_FLIGHT, DEFAULT_OPERATION_PATH,
    DEFAULT_PORT, DEFAULT_PROCESS_PATH,
};
use tokenclass::{init_logger, verbosity_level, Server, ServerConfig};

#[derive(Parser)]
#[command(author, version, about = "Serves the token classification endpoint", long_about = None)]
struct Args {
    /// Interface to listen on
    #[arg(long, env = "TOKENCLASS_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "TOKENCLASS_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Allowed CORS origins, comma separated ("*" allows any)
    #[arg(long = "allow-origin", env = "TOKENCLASS_ALLOWED_ORIGINS", value_delimiter = ',', default_value = "*")]
    allowed_origins: Vec<String>,

    /// Path of the classification endpoint
    #[arg(long, default_value = DEFAULT_PROCESS_PATH)]
    process_path: String,

    /// Path of the operation info endpoint
    #[arg(long, default_value = DEFAULT_OPERATION_PATH)]
    operation_path: String,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,

    /// Requests served at once before answering 503
    #[arg(long, env = "TOKENCLASS_MAX_IN_FLIGHT", default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    max_in_flight: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig::new()
            .with_host(self.host)
            .with_port(self.port)
            .with_allowed_origins(self.allowed_origins)
            .with_process_path(self.process_path)
            .with_operation_path(self.operation_path)
            .with_max_body_bytes(self.max_body_bytes)
            .with_max_in_flight(self.max_in_flight)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(verbosity_level(args.verbose));

    let config = args.into_config();
    info!(
        "Starting server (process: {}, operation: {}, origins: {})",
        config.process_path,
        config.operation_path,
        config.allowed_origins.join(",")
    );

    let server = Server::bind(config).context("Failed to start server")?;
    server.serve();
    Ok(())
}
