//! Binary data reader for version list files

use crate::error::{PackError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// Little-endian reader over an in-memory buffer
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    /// Create a new binary reader from byte slice
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        let length = self.cursor.get_ref().len();
        length.saturating_sub(self.cursor.position() as usize)
    }

    fn ensure(&self, count: usize) -> Result<()> {
        if self.remaining() >= count {
            Ok(())
        } else {
            Err(PackError::not_enough_data(count, self.remaining()))
        }
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    /// Read an unsigned 32-bit integer
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    /// Read an unsigned 64-bit integer
    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.cursor.read_u64::<LittleEndian>()?)
    }

    /// Read a fixed number of bytes
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.ensure(count)?;
        let mut buffer = vec![0u8; count];
        self.cursor.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a fixed-size byte array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut buffer = [0u8; N];
        self.cursor.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a 32-bit value stored 7 bits per byte, low group first
    pub fn read_7bit_encoded_u32(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(PackError::invalid_format("7-bit encoded u32 is too long"))
    }

    /// Read a 64-bit value stored 7 bits per byte, low group first
    pub fn read_7bit_encoded_u64(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        for shift in (0..70).step_by(7) {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(PackError::invalid_format("7-bit encoded u64 is too long"))
    }

    /// Read a 7-bit encoded count or index
    pub fn read_7bit_encoded_usize(&mut self) -> Result<usize> {
        let value = self.read_7bit_encoded_u32()?;
        usize::try_from(value).map_err(|_| PackError::invalid_data("count overflows usize"))
    }

    /// Read a string XOR-ed with `key`, prefixed by a one byte length
    ///
    /// A zero length decodes as `None`.
    pub fn read_encrypted_string(&mut self, key: &[u8]) -> Result<Option<String>> {
        let length = self.read_u8()? as usize;
        if length == 0 {
            return Ok(None);
        }
        let mut bytes = self.read_bytes(length)?;
        crate::encryption::xor_in_place(&mut bytes, key);
        Ok(Some(String::from_utf8(bytes)?))
    }
}
