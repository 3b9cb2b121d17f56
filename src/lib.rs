//! Spotify Shuffler Library
//!
//! This library fills the Spotify playback queue with randomly selected tracks
//! from the user's saved library while remembering which tracks were already
//! queued, so repeated runs walk through the whole library before any track
//! comes up again.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback listener
//! - `cli` - Command-line entry points
//! - `config` - Credentials, environment variables and default endpoints
//! - `errors` - Error types surfaced by a shuffle run
//! - `management` - Track sets, the blob store and the cached track records
//! - `reconciler` - Selection of new tracks and submission to the queue
//! - `server` - Local HTTP server for OAuth callbacks
//! - `signal` - Interrupt handling for a running shuffle
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotify_shuffler::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotify_shuffler::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod management;
pub mod reconciler;
pub mod server;
pub mod signal;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the seams to external collaborators (the Spotify client, the
/// authentication flow, configuration loading) where the concrete error type
/// is not interesting to the caller beyond its message. Keeps Send + Sync
/// bounds so the errors can cross await points and task boundaries.
///
/// # Example
///
/// ```
/// use spotify_shuffler::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Found {} playable tracks in total.", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Enqueued {} tracks successfully.", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing. Only the
/// binary uses it; library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Failed to load credentials: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("All tracks were played! Queued tracks will be reset.");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
