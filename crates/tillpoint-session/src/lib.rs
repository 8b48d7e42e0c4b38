//! # tillpoint-session: Terminal Session Hosting
//!
//! Wraps the pure [`tillpoint_core::CartEngine`] for use by the views of a
//! POS terminal.
//!
//! ## What Lives Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       tillpoint-session                                 │
//! │                                                                         │
//! │  state/cart.rs ───► CartStore: shared cart, boundary validation,        │
//! │                     CartEvent after every accepted change               │
//! │                                                                         │
//! │  state/settings.rs► SettingsHub: live settings + SettingsChanged        │
//! │                                                                         │
//! │  settings.rs ─────► TerminalSettings: defaults → TOML → TILLPOINT_*     │
//! │                                                                         │
//! │  telemetry.rs ────► tracing-subscriber setup                            │
//! │                                                                         │
//! │  error.rs ────────► SessionError                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! ```rust,no_run
//! use std::sync::Arc;
//! use tillpoint_session::{telemetry, CartStore, SettingsHub, TerminalSettings};
//!
//! telemetry::init_tracing();
//! let settings = Arc::new(SettingsHub::new(TerminalSettings::load_or_default(None)));
//! let cart = CartStore::with_settings(settings.clone());
//! let mut cart_events = cart.subscribe();
//! ```

pub mod error;
pub mod settings;
pub mod state;
pub mod telemetry;

pub use error::{SessionError, SessionResult};
pub use settings::TerminalSettings;
pub use state::{CartEvent, CartEventKind, CartStore, SettingsChanged, SettingsHub};
