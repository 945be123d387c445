//! Client library for the Clubhouse REST API (v1).
//!
//! ```no_run
//! # async fn run() -> clubhouse::Result<()> {
//! use clubhouse::api::{ClubhouseClient, StoryParam};
//! use clubhouse::config::Config;
//!
//! let client = ClubhouseClient::new(Config::new("my-token")?)?;
//! let story = client
//!     .create_story("Fix login", 12, &[StoryParam::StoryType("bug".into())])
//!     .await?;
//! println!("created {}", story);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod tasks;

pub use api::{ApiError, ClubhouseClient};
pub use config::{Config, ConfigError, Settings};
pub use error::{Error, Result};
