//! Binary data writer for version list files

use crate::encryption::xor_in_place;
use crate::error::{PackError, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Longest string a one byte length prefix can describe
pub const MAX_ENCRYPTED_STRING_LENGTH: usize = u8::MAX as usize;

/// Little-endian writer for version list files
pub struct BinaryWriter<W: Write> {
    inner: W,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.inner.write_u8(value)?)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.inner.write_u32::<LittleEndian>(value)?)
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        Ok(self.inner.write_u64::<LittleEndian>(value)?)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.inner.write_all(bytes)?)
    }

    pub fn write_7bit_encoded_u32(&mut self, value: u32) -> Result<()> {
        self.write_7bit_encoded_u64(u64::from(value))
    }

    pub fn write_7bit_encoded_u64(&mut self, mut value: u64) -> Result<()> {
        while value >= 0x80 {
            self.write_u8((value as u8 & 0x7F) | 0x80)?;
            value >>= 7;
        }
        self.write_u8(value as u8)
    }

    /// Write a count or index
    pub fn write_7bit_encoded_usize(&mut self, value: usize) -> Result<()> {
        let value = u32::try_from(value)
            .map_err(|_| PackError::invalid_data(format!("count {} does not fit in u32", value)))?;
        self.write_7bit_encoded_u32(value)
    }

    /// Write `value` XOR-ed with `key` behind a one byte length
    ///
    /// `None` and the empty string both encode as a zero length.
    pub fn write_encrypted_string(&mut self, value: Option<&str>, key: &[u8]) -> Result<()> {
        let Some(value) = value.filter(|value| !value.is_empty()) else {
            return self.write_u8(0);
        };
        if value.len() > MAX_ENCRYPTED_STRING_LENGTH {
            return Err(PackError::invalid_data(format!(
                "string '{}' is longer than {} bytes",
                value, MAX_ENCRYPTED_STRING_LENGTH
            )));
        }
        let mut bytes = value.as_bytes().to_vec();
        xor_in_place(&mut bytes, key);
        self.write_u8(bytes.len() as u8)?;
        self.write_bytes(&bytes)
    }

    pub fn flush(&mut self) -> Result<()> {
        Ok(self.inner.flush()?)
    }
}
