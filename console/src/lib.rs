//! # Depot Console
//!
//! Terminal shell over the Depot state containers. It reads the backend
//! address and a session from the environment, resolves a route against
//! that session, runs the page's fetches through the stores and prints the
//! result as text.
//!
//! ## Example
//!
//! ```ignore
//! use depot_console::{Console, ConsoleConfig};
//!
//! let config = ConsoleConfig::from_env()?;
//! let console = Console::new(&config).await?;
//! print!("{}", console.visit("/admin/products", None).await?);
//! ```

pub mod app;
pub mod config;
pub mod render;

pub use app::{Console, ConsoleError};
pub use config::{ConfigError, ConsoleConfig};
