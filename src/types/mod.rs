//! Core types shared by the readers.

use crate::io::dwg::SectionMapLayout;

/// DWG version enumeration, keyed by the six-byte magic at the start of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DwgVersion {
    /// Unknown version
    Unknown,
    /// AutoCAD R13 (AC1012)
    AC1012,
    /// AutoCAD R14 (AC1014)
    AC1014,
    /// AutoCAD 2000 (AC1015)
    AC1015,
    /// AutoCAD 2004 (AC1018)
    AC1018,
    /// AutoCAD 2007 (AC1021)
    AC1021,
    /// AutoCAD 2010 (AC1024)
    AC1024,
    /// AutoCAD 2013 (AC1027)
    AC1027,
    /// AutoCAD 2018 (AC1032)
    AC1032,
}

impl DwgVersion {
    /// Get the version string (e.g., "AC1015")
    pub fn as_str(&self) -> &'static str {
        match self {
            DwgVersion::Unknown => "UNKNOWN",
            DwgVersion::AC1012 => "AC1012",
            DwgVersion::AC1014 => "AC1014",
            DwgVersion::AC1015 => "AC1015",
            DwgVersion::AC1018 => "AC1018",
            DwgVersion::AC1021 => "AC1021",
            DwgVersion::AC1024 => "AC1024",
            DwgVersion::AC1027 => "AC1027",
            DwgVersion::AC1032 => "AC1032",
        }
    }

    /// Parse version from string (e.g., "AC1015")
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AC1012" => Some(DwgVersion::AC1012),
            "AC1014" => Some(DwgVersion::AC1014),
            "AC1015" => Some(DwgVersion::AC1015),
            "AC1018" => Some(DwgVersion::AC1018),
            "AC1021" => Some(DwgVersion::AC1021),
            "AC1024" => Some(DwgVersion::AC1024),
            "AC1027" => Some(DwgVersion::AC1027),
            "AC1032" => Some(DwgVersion::AC1032),
            _ => None,
        }
    }

    /// Parse version from version string, mapping anything unrecognised to
    /// [`DwgVersion::Unknown`].
    pub fn from_version_string(s: &str) -> Self {
        Self::parse(s).unwrap_or(DwgVersion::Unknown)
    }

    /// Version named by a six-byte file magic such as `b"AC1018"`.
    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        let magic = magic.get(..6)?;
        std::str::from_utf8(magic).ok().and_then(Self::parse)
    }

    /// The section map layout this version stores, or `None` for
    /// [`DwgVersion::Unknown`].
    pub fn section_map_layout(&self) -> Option<SectionMapLayout> {
        match self {
            DwgVersion::Unknown => None,
            DwgVersion::AC1012 | DwgVersion::AC1014 | DwgVersion::AC1015 => {
                Some(SectionMapLayout::Legacy)
            }
            DwgVersion::AC1021 => Some(SectionMapLayout::Paged),
            // AC1024, AC1027 and AC1032 went back to the AC1018 layout.
            DwgVersion::AC1018 | DwgVersion::AC1024 | DwgVersion::AC1027 | DwgVersion::AC1032 => {
                Some(SectionMapLayout::Compressed)
            }
        }
    }
}

impl std::fmt::Display for DwgVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
