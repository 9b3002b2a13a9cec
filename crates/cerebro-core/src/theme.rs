//! Light/dark preference, persisted independently of the session.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::storage::{KeyValueStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreference {
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// The terminal's own preference, read from `COLORFGBG`; dark when unknown.
pub fn ambient_preference() -> ThemePreference {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| preference_from_colorfgbg(&v))
        .unwrap_or(ThemePreference::Dark)
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); the last field is the
/// background palette index.
fn preference_from_colorfgbg(value: &str) -> Option<ThemePreference> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(match bg {
        7 | 15 => ThemePreference::Light,
        _ => ThemePreference::Dark,
    })
}

/// Sole owner of the persisted theme.
pub struct ThemeController {
    store: Arc<dyn KeyValueStore>,
    preference: ThemePreference,
}

impl ThemeController {
    /// Load the stored preference, falling back to `ambient` when nothing
    /// valid is stored.
    pub fn restore(store: Arc<dyn KeyValueStore>, ambient: ThemePreference) -> Self {
        let stored = match store.get(THEME_KEY) {
            Ok(value) => value.and_then(|v| v.parse().ok()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored theme");
                None
            }
        };
        Self {
            store,
            preference: stored.unwrap_or(ambient),
        }
    }

    pub fn get(&self) -> ThemePreference {
        self.preference
    }

    /// Flip the preference and persist it immediately.
    pub fn toggle(&mut self) {
        self.preference = self.preference.toggled();
        if let Err(e) = self.store.set(THEME_KEY, self.preference.as_str()) {
            tracing::warn!(error = %e, "failed to persist theme");
        }
    }
}
