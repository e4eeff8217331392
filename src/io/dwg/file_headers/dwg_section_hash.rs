//! DWG section hash values used for AC21 section identification.

use super::dwg_section_definition::DwgSectionDefinition;

/// Hash values for well-known DWG sections.
///
/// Paged section map entries carry these in their `hashcode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DwgSectionHash {
    AcDbUnknown = 0x0000_0000,
    AcDbSecurity = 0x4A02_04EA_u32 as i32,
    AcDbFileDepList = 0x6C42_05CA_u32 as i32,
    AcDbVbaProject = 0x586E_0544_u32 as i32,
    AcDbAppInfo = 0x3FA0_043E_u32 as i32,
    AcDbPreview = 0x40AA_0473_u32 as i32,
    AcDbSummaryInfo = 0x717A_060F_u32 as i32,
    AcDbRevHistory = 0x60A2_05B3_u32 as i32,
    AcDbAcDbObjects = 0x674C_05A9_u32 as i32,
    AcDbObjFreeSpace = 0x77E2_061F_u32 as i32,
    AcDbTemplate = 0x4A14_04CE_u32 as i32,
    AcDbHandles = 0x3F6E_0450_u32 as i32,
    AcDbClasses = 0x3F54_045F_u32 as i32,
    AcDbAuxHeader = 0x54F0_050A_u32 as i32,
    AcDbHeader = 0x32B8_03D9_u32 as i32,
    AcDbSignature = -1,
}

const ALL: [DwgSectionHash; 16] = [
    DwgSectionHash::AcDbUnknown,
    DwgSectionHash::AcDbSecurity,
    DwgSectionHash::AcDbFileDepList,
    DwgSectionHash::AcDbVbaProject,
    DwgSectionHash::AcDbAppInfo,
    DwgSectionHash::AcDbPreview,
    DwgSectionHash::AcDbSummaryInfo,
    DwgSectionHash::AcDbRevHistory,
    DwgSectionHash::AcDbAcDbObjects,
    DwgSectionHash::AcDbObjFreeSpace,
    DwgSectionHash::AcDbTemplate,
    DwgSectionHash::AcDbHandles,
    DwgSectionHash::AcDbClasses,
    DwgSectionHash::AcDbAuxHeader,
    DwgSectionHash::AcDbHeader,
    DwgSectionHash::AcDbSignature,
];

impl DwgSectionHash {
    /// Try to convert a raw `i32` value into a `DwgSectionHash`.
    pub fn from_i32(value: i32) -> Option<Self> {
        ALL.iter().copied().find(|hash| hash.as_i32() == value)
    }

    /// Look up a 64-bit hashcode as stored in a section map entry. Only the
    /// 32-bit range can match.
    pub fn from_hashcode(hashcode: u64) -> Option<Self> {
        u32::try_from(hashcode)
            .ok()
            .and_then(|value| Self::from_i32(value as i32))
    }

    /// Get the raw `i32` hash value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// The value as it appears in a section map entry's `hashcode` field.
    pub fn hashcode(self) -> u64 {
        self.as_i32() as u32 as u64
    }

    /// Section name, or an empty string for [`DwgSectionHash::AcDbUnknown`].
    pub fn name(self) -> &'static str {
        match self {
            Self::AcDbUnknown => "",
            Self::AcDbSecurity => DwgSectionDefinition::SECURITY,
            Self::AcDbFileDepList => DwgSectionDefinition::FILE_DEP_LIST,
            Self::AcDbVbaProject => DwgSectionDefinition::VBA_PROJECT,
            Self::AcDbAppInfo => DwgSectionDefinition::APP_INFO,
            Self::AcDbPreview => DwgSectionDefinition::PREVIEW,
            Self::AcDbSummaryInfo => DwgSectionDefinition::SUMMARY_INFO,
            Self::AcDbRevHistory => DwgSectionDefinition::REV_HISTORY,
            Self::AcDbAcDbObjects => DwgSectionDefinition::ACDB_OBJECTS,
            Self::AcDbObjFreeSpace => DwgSectionDefinition::OBJ_FREE_SPACE,
            Self::AcDbTemplate => DwgSectionDefinition::TEMPLATE,
            Self::AcDbHandles => DwgSectionDefinition::HANDLES,
            Self::AcDbClasses => DwgSectionDefinition::CLASSES,
            Self::AcDbAuxHeader => DwgSectionDefinition::AUX_HEADER,
            Self::AcDbHeader => DwgSectionDefinition::HEADER,
            Self::AcDbSignature => DwgSectionDefinition::SIGNATURE,
        }
    }
}
