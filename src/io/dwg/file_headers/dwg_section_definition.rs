//! Well-known section names and the R13–R2000 header sentinel.

/// End sentinel of an R13–R2000 file header; follows the locator table and
/// its CRC.
pub const AC15_END_SENTINEL: [u8; 16] = [
    0x95, 0xA0, 0x4E, 0x28, 0x99, 0x82, 0x1A, 0xE5, 0x5E, 0x41, 0xE0, 0x5F, 0x9D, 0x3A, 0x4D,
    0x00,
];

/// Well-known DWG section names.
pub struct DwgSectionDefinition;

impl DwgSectionDefinition {
    pub const ACDB_OBJECTS: &'static str = "AcDb:AcDbObjects";
    pub const APP_INFO: &'static str = "AcDb:AppInfo";
    pub const AUX_HEADER: &'static str = "AcDb:AuxHeader";
    pub const HEADER: &'static str = "AcDb:Header";
    pub const CLASSES: &'static str = "AcDb:Classes";
    pub const HANDLES: &'static str = "AcDb:Handles";
    pub const OBJ_FREE_SPACE: &'static str = "AcDb:ObjFreeSpace";
    pub const TEMPLATE: &'static str = "AcDb:Template";
    pub const SUMMARY_INFO: &'static str = "AcDb:SummaryInfo";
    pub const FILE_DEP_LIST: &'static str = "AcDb:FileDepList";
    pub const PREVIEW: &'static str = "AcDb:Preview";
    pub const REV_HISTORY: &'static str = "AcDb:RevHistory";
    pub const SECURITY: &'static str = "AcDb:Security";
    pub const VBA_PROJECT: &'static str = "AcDb:VBAProject";
    pub const SIGNATURE: &'static str = "AcDb:Signature";

    /// Map a section name to its R13–R2000 locator record number.
    ///
    /// Returns `None` for sections that have no locator record.
    pub fn get_section_locator_by_name(name: &str) -> Option<i32> {
        match name {
            Self::HEADER => Some(0),
            Self::CLASSES => Some(1),
            Self::HANDLES => Some(2),
            Self::OBJ_FREE_SPACE => Some(3),
            Self::TEMPLATE => Some(4),
            Self::AUX_HEADER => Some(5),
            _ => None,
        }
    }
}
