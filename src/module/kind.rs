use std::fmt;

/// User module types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModuleKind {
    /// Unrecognized module ID
    Unknown = 0,
    /// Modulation effect
    ModFx = 1,
    /// Delay effect
    DelFx = 2,
    /// Reverb effect
    RevFx = 3,
    /// Oscillator
    Osc = 4,
}

impl ModuleKind {
    /// Kind for a header module ID; unrecognized IDs map to [`ModuleKind::Unknown`]
    #[must_use]
    pub const fn from_id(id: u8) -> Self {
        match id {
            1 => Self::ModFx,
            2 => Self::DelFx,
            3 => Self::RevFx,
            4 => Self::Osc,
            _ => Self::Unknown,
        }
    }

    /// Kind for a manifest module name; unrecognized names map to [`ModuleKind::Unknown`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "modfx" => Self::ModFx,
            "delfx" => Self::DelFx,
            "revfx" => Self::RevFx,
            "osc" => Self::Osc,
            _ => Self::Unknown,
        }
    }

    /// Header module ID
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Manifest module name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::ModFx => "modfx",
            Self::DelFx => "delfx",
            Self::RevFx => "revfx",
            Self::Osc => "osc",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        for kind in [ModuleKind::ModFx, ModuleKind::DelFx, ModuleKind::RevFx, ModuleKind::Osc] {
            assert_eq!(ModuleKind::from_id(kind.id()), kind);
            assert_eq!(ModuleKind::from_name(kind.name()), kind);
        }
        assert_eq!(ModuleKind::from_id(9), ModuleKind::Unknown);
        assert_eq!(ModuleKind::from_name("synth"), ModuleKind::Unknown);
        assert_eq!(ModuleKind::Unknown.id(), 0);
    }
}
