//! # Session State
//!
//! Shared state objects a terminal view holds handles to.
//!
//! ```text
//! ┌──────────────────────┐ ┌──────────────────────┐
//! │ CartStore            │ │ SettingsHub          │
//! │ • CartEngine (Mutex) │ │ • TerminalSettings   │
//! │ • CartEvent channel  │ │ • SettingsChanged    │
//! └──────────────────────┘ └──────────────────────┘
//! ```
//!
//! Each view asks only for the state it needs.

pub mod cart;
pub mod settings;

pub use cart::{CartEvent, CartEventKind, CartStore};
pub use settings::{SettingsChanged, SettingsHub};
