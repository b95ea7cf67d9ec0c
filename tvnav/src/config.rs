// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigator configuration.

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::{SmallVec, smallvec};

use crate::input::{KeyCodeMap, keys};

/// Default prefix of override attributes (`data-focus-left`, ...).
pub const DEFAULT_OVERRIDE_PREFIX: &str = "data-focus-";

/// Everything a [`Navigator`](crate::Navigator) can be configured with.
///
/// With the `serde` feature this round-trips through any serde format, so hosts
/// can ship key bindings and focusable selectors as data. Missing fields take
/// their defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigatorConfig {
    /// Whether key input moves focus.
    pub enabled: bool,
    /// Directional key bindings.
    pub key_codes: KeyCodeMap,
    /// Codes that activate the focused element on release.
    pub accept_codes: SmallVec<[u32; 4]>,
    /// Extra selectors whose matches are focusable.
    pub focusable_selectors: Vec<String>,
    /// Prefix of override attribute names.
    pub override_prefix: String,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_codes: KeyCodeMap::default(),
            accept_codes: smallvec![keys::GAMEPAD_A, keys::NAVIGATION_ACCEPT],
            focusable_selectors: Vec::new(),
            override_prefix: String::from(DEFAULT_OVERRIDE_PREFIX),
        }
    }
}

impl NavigatorConfig {
    /// Returns `true` if `code` is an accept code.
    #[must_use]
    pub fn is_accept_code(&self, code: u32) -> bool {
        self.accept_codes.contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    #[test]
    fn defaults() {
        let config = NavigatorConfig::default();
        assert!(config.enabled);
        assert!(config.is_accept_code(keys::GAMEPAD_A));
        assert!(!config.is_accept_code(keys::ARROW_UP));
        assert_eq!(config.key_codes.direction_for(keys::ARROW_UP), Some(Direction::Up));
        assert_eq!(config.override_prefix, "data-focus-");
    }
}
