use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{NotesError, Result};
use crate::storage::{
    read_shared, remove_shared, write_shared, KeyValueStore, SharedStore, OPACITY_KEY,
};

/// Background opacity, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opacity(f64);

impl Opacity {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 0.9;
    pub const STEP: f64 = 0.05;
    pub const DEFAULT: f64 = 0.2;

    /// Clamp any finite value into range. NaN becomes the default.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Round to the nearest slider step, then clamp.
    pub fn snapped(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        let steps_per_unit = (1.0 / Self::STEP).round();
        Self::clamped((value * steps_per_unit).round() / steps_per_unit)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl std::fmt::Display for Opacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Opacity {
    type Err = NotesError;

    /// Strict parse for user input: out-of-range values are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| NotesError::InvalidOpacity(s.to_string()))?;
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(NotesError::InvalidOpacity(s.to_string()));
        }
        Ok(Self(value))
    }
}

/// Persisted panel settings.
pub struct Settings<S: KeyValueStore> {
    store: SharedStore<S>,
    opacity: Opacity,
}

impl<S: KeyValueStore> Settings<S> {
    /// Load settings, falling back to defaults for anything unreadable.
    pub fn load(store: SharedStore<S>) -> Self {
        let opacity = match read_shared(&store, OPACITY_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<f64>() {
                Ok(value) => Opacity::clamped(value),
                Err(_) => {
                    warn!(value = %raw, "stored opacity is malformed, clearing it");
                    if let Err(e) = remove_shared(&store, OPACITY_KEY) {
                        warn!(error = %e, "failed to clear stored opacity");
                    }
                    Opacity::default()
                }
            },
            Ok(None) => Opacity::default(),
            Err(e) => {
                warn!(error = %e, "failed to read stored opacity, using default");
                Opacity::default()
            }
        };
        Self { store, opacity }
    }

    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    /// Set and persist the opacity. The value is clamped into range.
    pub fn set_opacity(&mut self, value: f64) -> Opacity {
        self.opacity = Opacity::clamped(value);
        debug!(opacity = %self.opacity, "opacity changed");
        if let Err(e) = write_shared(&self.store, OPACITY_KEY, &self.opacity.to_string()) {
            warn!(error = %e, "failed to persist opacity");
        }
        self.opacity
    }
}
