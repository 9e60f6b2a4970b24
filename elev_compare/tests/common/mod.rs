//! FIT byte builders shared by the integration tests of both crates.
#![allow(dead_code)]

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

pub const HEADER_LEN: usize = 14;

pub fn fit_crc(bytes: &[u8]) -> u16 {
    let mut crc = 0u16;
    for &byte in bytes {
        let mut tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[(byte & 0xF) as usize];
        tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize];
    }
    crc
}

/// Wrap `data` in a 14-byte header and trailing CRC.
pub fn fit_container(data: &[u8]) -> Vec<u8> {
    let mut out = vec![HEADER_LEN as u8, 0x10];
    out.extend_from_slice(&2132u16.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(b".FIT");
    let header_crc = fit_crc(&out);
    out.extend_from_slice(&header_crc.to_le_bytes());
    out.extend_from_slice(data);
    let file_crc = fit_crc(&out);
    out.extend_from_slice(&file_crc.to_le_bytes());
    out
}

/// Record messages with raw distance (cm) and raw altitude
/// ((m + 500) * 5) values.
pub fn record_messages(samples: &[(u32, u16)]) -> Vec<u8> {
    // Definition for local type 0: global message 20 (record), little endian,
    // fields distance (#5, uint32) and altitude (#2, uint16).
    let mut data = vec![0x40, 0x00, 0x00, 20, 0x00, 2, 5, 4, 0x86, 2, 2, 0x84];
    for &(distance, altitude) in samples {
        data.push(0x00);
        data.extend_from_slice(&distance.to_le_bytes());
        data.extend_from_slice(&altitude.to_le_bytes());
    }
    data
}

pub fn raw_altitude(meters: f64) -> u16 {
    ((meters + 500.0) * 5.0) as u16
}

/// Complete FIT file from (distance cm, altitude m) pairs.
pub fn fit_file(samples: &[(u32, f64)]) -> Vec<u8> {
    let raw: Vec<(u32, u16)> = samples
        .iter()
        .map(|&(distance, altitude)| (distance, raw_altitude(altitude)))
        .collect();
    fit_container(&record_messages(&raw))
}

/// Three records: 100 m, 105 m and 102 m at 0, 10 and 25 m.
pub fn sample_file() -> Vec<u8> {
    fit_file(&[(0, 100.0), (1000, 105.0), (2500, 102.0)])
}

/// Flip bits in the header CRC of the section starting at `section_start`.
pub fn corrupt_header_crc(bytes: &mut [u8], section_start: usize) {
    bytes[section_start + HEADER_LEN - 2] ^= 0xFF;
}

/// Flip bits in the trailing data CRC of a single-section file.
pub fn corrupt_data_crc(bytes: &mut [u8]) {
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
}
