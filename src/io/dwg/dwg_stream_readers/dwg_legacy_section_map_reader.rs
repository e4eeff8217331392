//! Section locator table of R13–R2000 files.

use log::{debug, trace, warn};

use crate::error::{DwgError, Result};
use crate::io::dwg::crc::crc8_value;
use crate::io::dwg::dwg_section_io::{search_sentinel, DwgSectionContext};
use crate::io::dwg::file_headers::{SectionDirectory, SectionRecord, AC15_END_SENTINEL};
use crate::notification::NotificationType;

use super::dwg_byte_cursor::DwgByteCursor;

const READER: &str = "legacy section map";

/// Size of one `(number, address, size)` triple.
const RECORD_SIZE: u64 = 9;

/// CRC seed of the R13–R2000 file header.
pub const AC15_CRC_SEED: u16 = 0xC0C1;

/// Reads the flat triple table:
///
/// ```text
/// u32 count
/// count × { i8 number, u32 address, u32 size }
/// u16 crc
/// ... end sentinel
/// ```
pub struct DwgLegacySectionMapReader;

impl DwgLegacySectionMapReader {
    /// Read the table at the cursor. The CRC covers the table from its first
    /// byte.
    pub fn read(cursor: &mut DwgByteCursor<'_>, ctx: &mut DwgSectionContext) -> Result<SectionDirectory> {
        let origin = cursor.position();
        Self::read_with_checksum_origin(cursor, origin, ctx)
    }

    /// Read the table at the cursor with the CRC covering
    /// `[checksum_origin, end of table)`. Whole files use origin `0`.
    pub fn read_with_checksum_origin(
        cursor: &mut DwgByteCursor<'_>,
        checksum_origin: u64,
        ctx: &mut DwgSectionContext,
    ) -> Result<SectionDirectory> {
        let table_start = cursor.position();
        if checksum_origin > table_start {
            return Err(DwgError::unsupported(
                READER,
                table_start,
                format!("checksum origin {checksum_origin:#x} is after the table"),
            ));
        }

        cursor.require(4, READER)?;
        let count = cursor.read_u32()? as u64;
        trace!("{READER}: {} records at {:#x}", count, table_start);

        ctx.check_section_count(READER, count)?;
        cursor.require(count * RECORD_SIZE, READER)?;

        let mut records = Vec::new();
        records
            .try_reserve_exact(count as usize)
            .map_err(|_| DwgError::ResourceExhausted {
                reader: READER,
                requested: count,
                limit: ctx.configuration.max_section_count,
            })?;

        for _ in 0..count {
            let number = cursor.read_i8()? as i32;
            let address = cursor.read_u32()? as u64;
            let size = cursor.read_u32()? as u64;
            trace!("{READER}: number {} address {:#x} size {:#x}", number, address, size);
            records.push(SectionRecord::new(number, address, size));
        }

        let table_end = cursor.position();
        let covered = cursor.slice(checksum_origin, table_end)?;
        let computed = crc8_value(AC15_CRC_SEED, covered, 0, covered.len());

        cursor.require(2, READER)?;
        let stored = cursor.read_u16()?;
        trace!("{READER}: crc stored {:#06x} computed {:#06x}", stored, computed);
        ctx.check_checksum(READER, table_end, stored as u32, computed as u32)?;

        match search_sentinel(cursor, &AC15_END_SENTINEL) {
            Some(end) => trace!("{READER}: header end sentinel ends at {:#x}", end),
            None => {
                let message = format!("{READER}: header end sentinel not found after {:#x}", cursor.position());
                warn!("{}", message);
                ctx.notify(message, NotificationType::Warning);
            }
        }

        debug!("{READER}: decoded {} records for {}", records.len(), ctx.version);
        Ok(SectionDirectory::from_records(records))
    }
}
