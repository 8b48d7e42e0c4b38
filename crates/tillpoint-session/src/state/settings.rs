//! # Settings Hub
//!
//! Shares the live [`TerminalSettings`] between the views of one terminal
//! and tells them when the settings change.
//!
//! ## Change Propagation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Settings screen ──► hub.update(new) ──► validate ──► RwLock write     │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                               broadcast SettingsChanged                 │
//! │                        ┌─────────────┼──────────────┐                   │
//! │                        ▼             ▼              ▼                   │
//! │                  Cart header    Receipt view    CartStore               │
//! │                  (store name)   (currency)      (note limit, on read)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sends never block. A subscriber that falls more than the channel capacity
//! behind gets `RecvError::Lagged` and should re-read [`SettingsHub::current`].

use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::SessionResult;
use crate::settings::TerminalSettings;

/// Capacity of the settings change channel.
const SETTINGS_CHANNEL_CAPACITY: usize = 16;

/// Published after the settings have been replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChanged {
    /// The settings now in effect.
    pub settings: TerminalSettings,

    /// Names of the fields that differ from the previous settings.
    pub changed_fields: Vec<&'static str>,
}

/// Live terminal settings plus their change channel.
#[derive(Debug)]
pub struct SettingsHub {
    current: RwLock<TerminalSettings>,
    changes: broadcast::Sender<SettingsChanged>,
}

impl SettingsHub {
    pub fn new(settings: TerminalSettings) -> Self {
        let (changes, _) = broadcast::channel(SETTINGS_CHANNEL_CAPACITY);
        SettingsHub {
            current: RwLock::new(settings),
            changes,
        }
    }

    /// Returns a copy of the settings in effect.
    pub fn current(&self) -> TerminalSettings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reads one value without cloning the whole settings struct.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&TerminalSettings) -> R,
    {
        let settings = self.current.read().unwrap_or_else(PoisonError::into_inner);
        f(&settings)
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChanged> {
        self.changes.subscribe()
    }

    /// Validates and installs new settings.
    ///
    /// Returns the change event, or `None` if nothing differed (no event is
    /// published in that case).
    pub fn update(&self, settings: TerminalSettings) -> SessionResult<Option<SettingsChanged>> {
        settings.validate()?;

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let changed_fields = diff_fields(&current, &settings);
        if changed_fields.is_empty() {
            debug!("Settings update with no changes ignored");
            return Ok(None);
        }

        *current = settings.clone();
        let event = SettingsChanged {
            settings,
            changed_fields,
        };
        info!(fields = ?event.changed_fields, "Terminal settings changed");

        // Published under the write lock so events arrive in update order.
        let _ = self.changes.send(event.clone());
        Ok(Some(event))
    }
}

impl Default for SettingsHub {
    fn default() -> Self {
        Self::new(TerminalSettings::default())
    }
}

fn diff_fields(old: &TerminalSettings, new: &TerminalSettings) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if old.store_name != new.store_name {
        fields.push("store_name");
    }
    if old.currency_code != new.currency_code {
        fields.push("currency_code");
    }
    if old.currency_symbol != new.currency_symbol {
        fields.push("currency_symbol");
    }
    if old.currency_decimals != new.currency_decimals {
        fields.push("currency_decimals");
    }
    if old.max_note_length != new.max_note_length {
        fields.push("max_note_length");
    }
    fields
}
