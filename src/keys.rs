// src/keys.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Represents a keyboard modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2; // Also known as Option on macOS
        const SUPER = 1 << 3; // Also known as Windows key or Command key
    }
}

/// Represents a key symbol.
///
/// A modal picker only ever reacts to a handful of keys, so this enum is
/// deliberately small: the cancel key, a couple of confirm keys, and a
/// catch-all for printable characters the host may forward anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySymbol {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
}

impl KeySymbol {
    /// Whether this key aborts a running modal gesture.
    pub fn is_cancel(&self) -> bool {
        matches!(self, KeySymbol::Escape)
    }
}
