/// Section map decoding benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dwg_section_map::io::dwg::crc::crc8_value;
use dwg_section_map::io::dwg::dwg_checksum_calculator::calculate;
use dwg_section_map::io::dwg::file_headers::AC15_END_SENTINEL;
use dwg_section_map::io::dwg::{DwgCompressedSectionMapReader, DwgLegacySectionMapReader};
use dwg_section_map::{DwgByteCursor, DwgReaderConfiguration, DwgSectionContext, DwgVersion};

fn legacy_table(count: usize) -> Vec<u8> {
    let mut out = (count as u32).to_le_bytes().to_vec();
    for i in 0..count {
        out.push((i % 6) as u8);
        out.extend_from_slice(&((i as u32) * 0x100).to_le_bytes());
        out.extend_from_slice(&0x100u32.to_le_bytes());
    }
    let crc = crc8_value(0xC0C1, &out, 0, out.len());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&AC15_END_SENTINEL);
    out
}

fn compressed_map(count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count * 12);
    for i in 0..count {
        if i % 16 == 15 {
            out.extend_from_slice(&(-(i as i32)).to_le_bytes());
            out.extend_from_slice(&0x7400i32.to_le_bytes());
            out.extend_from_slice(&[0u8; 16]);
        } else {
            out.extend_from_slice(&(i as i32 + 1).to_le_bytes());
            out.extend_from_slice(&0x7400i32.to_le_bytes());
        }
    }
    out
}

fn legacy_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("legacy_section_map");
    for count in [6usize, 64, 1024] {
        let table = legacy_table(count);
        group.throughput(Throughput::Bytes(table.len() as u64));
        group.bench_with_input(BenchmarkId::new("read", count), &table, |b, table| {
            b.iter(|| {
                let mut ctx =
                    DwgSectionContext::new(DwgVersion::AC1015, DwgReaderConfiguration::default());
                let mut cursor = DwgByteCursor::new(black_box(table));
                DwgLegacySectionMapReader::read(&mut cursor, &mut ctx).unwrap()
            })
        });
    }
    group.finish();
}

fn compressed_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("compressed_section_map");
    let ctx = DwgSectionContext::new(DwgVersion::AC1018, DwgReaderConfiguration::default());
    for count in [64usize, 1024, 16 * 1024] {
        let map = compressed_map(count);
        group.throughput(Throughput::Bytes(map.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", count), &map, |b, map| {
            b.iter(|| DwgCompressedSectionMapReader::parse(black_box(map), &ctx).unwrap())
        });
    }
    group.finish();
}

fn checksum_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksums");
    let data: Vec<u8> = (0..64 * 1024).map(|i| (i * 31 % 251) as u8).collect();
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("crc8", |b| b.iter(|| crc8_value(0xC0C1, black_box(&data), 0, data.len())));
    group.bench_function("adler32_variant", |b| {
        b.iter(|| calculate(0, black_box(&data), 0, data.len()))
    });
    group.finish();
}

criterion_group!(benches, legacy_benchmarks, compressed_benchmarks, checksum_benchmarks);
criterion_main!(benches);
