use std::fmt;
use std::str::FromStr;

use super::ModuleKind;
use crate::protocol::{Error, Result};

/// Capacity of one user module type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Largest module that fits a slot
    pub max_slot_size: u32,
    /// Largest per-program data block
    pub max_program_size: u32,
    /// Number of slots
    pub slot_count: u8,
}

impl ModuleInfo {
    /// Decoded size of a user module info reply
    pub const SIZE: usize = 9;

    /// Parse a decoded user module info reply
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(Error::BufferTooSmall {
                needed: Self::SIZE,
                got: bytes.len(),
            });
        }

        Ok(Self {
            max_slot_size: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            max_program_size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            slot_count: bytes[8],
        })
    }
}

/// Target of a user data command: a whole module type or one of its slots
///
/// Written as `osc` or `osc/3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleSlot {
    kind: ModuleKind,
    slot: Option<u8>,
}

impl ModuleSlot {
    /// Address every slot of a module type
    #[must_use]
    pub const fn module(kind: ModuleKind) -> Self {
        Self { kind, slot: None }
    }

    /// Address a single slot
    #[must_use]
    pub const fn slot(kind: ModuleKind, slot: u8) -> Self {
        Self {
            kind,
            slot: Some(slot),
        }
    }

    /// Get module type
    #[must_use]
    pub const fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// Get slot index, `None` for a whole module type
    #[must_use]
    pub const fn slot_index(&self) -> Option<u8> {
        self.slot
    }

    /// Request header bytes: `[module]` or `[module, slot]`
    #[must_use]
    pub fn header_bytes(&self) -> Vec<u8> {
        match self.slot {
            Some(slot) => vec![self.kind.id(), slot],
            None => vec![self.kind.id()],
        }
    }
}

impl fmt::Display for ModuleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(slot) => write!(f, "{}/{slot}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl FromStr for ModuleSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidModuleSlot(s.to_string());

        let (name, slot) = match s.split_once('/') {
            Some((name, slot)) => (name, Some(slot.parse::<u8>().map_err(|_| invalid())?)),
            None => (s, None),
        };

        let kind = ModuleKind::from_name(name);
        if kind == ModuleKind::Unknown {
            return Err(invalid());
        }

        Ok(Self { kind, slot })
    }
}
