//! RDS group classification.
//!
//! Block B layout used here (bit 15 first):
//!
//! ```text
//! 15..12  group type code
//! 11      version (0 = A, 1 = B)
//! 10      traffic programme
//! 9..5    programme type
//! 4       radiotext A/B flag (group 2)
//! 3..0    radiotext segment address (group 2)
//! 1..0    programme service segment address (group 0)
//! ```

/// Group version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupVersion {
    A,
    B,
}

/// What a group carries, as far as this decoder is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Group 0: two station-name characters in block D
    StationName { segment: u8 },
    /// Group 2: radiotext characters (C+D for version A, D for version B)
    RadioText {
        segment: u8,
        text_ab: bool,
        version: GroupVersion,
    },
    /// Any group type this decoder does not handle
    Other { group_type: u8, version: GroupVersion },
}

/// One RDS group: blocks A..D exactly as read from RDSA..RDSD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdsGroup {
    pub blocks: [u16; 4],
}

impl RdsGroup {
    pub fn new(a: u16, b: u16, c: u16, d: u16) -> Self {
        Self {
            blocks: [a, b, c, d],
        }
    }

    /// Programme identification code (block A)
    pub fn pi(&self) -> u16 {
        self.blocks[0]
    }

    /// Group type code, block B bits 15..12
    pub fn group_type(&self) -> u8 {
        (self.blocks[1] >> 12) as u8 & 0x0F
    }

    /// Group version, block B bit 11
    pub fn version(&self) -> GroupVersion {
        if self.blocks[1] & 0x0800 == 0 {
            GroupVersion::A
        } else {
            GroupVersion::B
        }
    }

    /// Classify the group by its type code
    pub fn kind(&self) -> GroupKind {
        let b = self.blocks[1];
        match self.group_type() {
            0 => GroupKind::StationName {
                segment: (b & 0x03) as u8,
            },
            2 => GroupKind::RadioText {
                segment: (b & 0x0F) as u8,
                text_ab: b & 0x0010 != 0,
                version: self.version(),
            },
            group_type => GroupKind::Other {
                group_type,
                version: self.version(),
            },
        }
    }

    /// Both characters of block C, high byte first
    pub fn block_c_chars(&self) -> [u8; 2] {
        self.blocks[2].to_be_bytes()
    }

    /// Both characters of block D, high byte first
    pub fn block_d_chars(&self) -> [u8; 2] {
        self.blocks[3].to_be_bytes()
    }
}

impl From<[u16; 4]> for RdsGroup {
    fn from(blocks: [u16; 4]) -> Self {
        Self { blocks }
    }
}
