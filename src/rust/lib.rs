//! Classifies short text tokens into numbers, alphabets and symbols and reports
//! the highest single-character lowercase letter.
//!
//! # Basic Usage
//!
//! ```rust
//! use tokenclass::classify;
//!
//! let result = classify(["A", "C", "Z", "c", "i"]);
//! assert_eq!(result.alphabets, vec!["A", "C", "Z", "c", "i"]);
//! assert!(result.numbers.is_empty());
//! assert_eq!(result.highest_lowercase_alphabet, "i");
//! ```
//!
//! # Serving over HTTP
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tokenclass::{Server, ServerConfig};
//!
//! let config = ServerConfig::new()
//!     .with_host("127.0.0.1")
//!     .with_port(8000);
//! Server::bind(config)?.serve();
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Classification holds no state. Every request is handled independently, so
//! [`classify`] and [`handle_process_request`] can be called from any number
//! of threads at once.

pub mod classifier;
pub mod client;
pub mod config;
pub mod handler;
pub mod server;

pub use classifier::{categorize, classify, ClassificationResult, TokenCategory};
pub use client::{parse_input, render, render_error, ClientError, DisplayMode, ProcessClient};
pub use config::{ConfigError, ServerConfig};
pub use handler::{
    get_operation_code, handle_process_request, root, FailureResponse, HandlerError,
    OperationInfo, ProcessRequest, ProcessResponse, RootInfo,
};
pub use server::{route, Incoming, Reply, Server, ServerError, ServerHandle};

/// Initializes `env_logger` at `default_level` unless `RUST_LOG` says otherwise.
/// Safe to call more than once.
pub fn init_logger(default_level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
}

/// Maps a `-v` count to a log level
pub fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
