//! CRC32 checksums of pack bodies and version list files

use crate::error::Result;
use crc::{CRC_32_ISO_HDLC, Crc};
use std::io::Read;

const CRC32_ALGO: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

const CHUNK_SIZE: usize = 64 * 1024;

/// CRC32 of a buffer
pub fn crc32(data: &[u8]) -> u32 {
    CRC32_ALGO.checksum(data)
}

/// CRC32 of everything left in a reader, with the number of bytes read
pub fn crc32_stream<R: Read>(reader: &mut R) -> Result<(u32, u64)> {
    let mut digest = CRC32_ALGO.digest();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        digest.update(&buffer[..read]);
        total += read as u64;
    }
    Ok((digest.finalize(), total))
}
