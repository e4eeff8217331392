//! Print the section map of a DWG file.
//!
//! Usage: `dwg-section-map [--strict] <file.dwg>`
//!
//! Checksum mismatches are reported as warnings unless `--strict` is given.
//! Set `RUST_LOG=trace` to see every decoded field.

use anyhow::{bail, Context, Result};
use dwg_section_map::{DwgReaderConfiguration, DwgSectionMapReader, SectionMap};

fn main() -> Result<()> {
    env_logger::init();

    let mut strict = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => strict = true,
            "-h" | "--help" => {
                println!("usage: dwg-section-map [--strict] <file.dwg>");
                return Ok(());
            }
            _ if path.is_none() => path = Some(arg),
            _ => bail!("unexpected argument {arg:?}"),
        }
    }
    let Some(path) = path else {
        bail!("usage: dwg-section-map [--strict] <file.dwg>");
    };

    let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
    let configuration = if strict {
        DwgReaderConfiguration::default()
    } else {
        DwgReaderConfiguration::lenient()
    };

    let file = DwgSectionMapReader::new()
        .read_file(&bytes, configuration)
        .with_context(|| format!("decoding the section map of {path}"))?;

    println!("{path}: {} ({} entries)", file.version, file.section_map.len());
    match &file.section_map {
        SectionMap::Flat(directory) => {
            for record in directory {
                println!("  {record}");
            }
        }
        SectionMap::Paged(catalog) => {
            for entry in catalog {
                println!(
                    "  {:<28} hash {:#010x} size {:#x} pages {}",
                    entry.name.as_deref().unwrap_or("<unnamed>"),
                    entry.hashcode,
                    entry.data_size,
                    entry.pages.len()
                );
                for page in &entry.pages {
                    println!(
                        "    page {:>4} offset {:#x} size {:#x} comp {:#x}",
                        page.id, page.offset, page.size, page.compressed_size
                    );
                }
            }
        }
    }

    for notification in &file.notifications {
        eprintln!("{:?}: {}", notification.notification_type, notification.message);
    }

    Ok(())
}
