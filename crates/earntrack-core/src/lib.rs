//! # EarnTrack Core Library
//!
//! Core logic for EarnTrack, a real-time earnings counter: given a salary and
//! a work schedule it shows how much has been earned since a session started.
//! All state lives here; the CLI binary is a thin front end over this crate.
//!
//! ## Architecture
//!
//! - **Resolver**: startup settings from the page location, durable storage
//!   and defaults, in that priority order
//! - **Rate**: per-second earnings rate from salary, cycle and schedule
//! - **Session**: a wall-clock session state machine that requires the caller
//!   to periodically invoke `tick()`, plus milestone celebrations
//! - **Input**: tap/double-tap/swipe/key disambiguation into commands
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`Engine`]: owns all state and applies every mutation
//! - [`SessionClock`]: session state machine
//! - [`Database`]: durable key-value store
//! - [`Config`]: application configuration management

pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod format;
pub mod input;
pub mod link;
pub mod rate;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod storage;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Engine, EngineOptions, TickReport};
pub use error::{ConfigError, CoreError, SessionError, StorageError, ValidationError};
pub use events::Event;
pub use input::{Command, Disambiguator, RawInput};
pub use link::{Clipboard, Location};
pub use rate::per_second_rate;
pub use resolver::{resolve, Resolution};
pub use session::{Celebrations, Fireworks, Notifier, ParticleSink, SessionClock, SessionState, Ticker};
pub use settings::{Currency, Cycle, Settings, SettingsField};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use view::{Screen, Theme, ViewState};
