//! Binary encoding of [`BloomFilter`]
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! byte 0      preamble bytes (24)
//! byte 1      serial version
//! byte 2      family id
//! byte 3      flags
//! bytes 4-7   number of hashes (u32)
//! bytes 8-15  number of bits (u64)
//! bytes 16-23 number of insertions (u64)
//! bytes 24-   bit-vector, ceil(bits / 8) bytes, first bit in the high bit
//! ```

use crate::bloom::BloomFilter;
use crate::{BloomError, Result};
use bit_vec::BitVec;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{self, Read, Write};

const PREAMBLE_BYTES: u8 = 24;
const SERIAL_VERSION: u8 = 1;
const FAMILY_ID: u8 = 0x42;
const EMPTY_FLAG_MASK: u8 = 1;

impl BloomFilter {
    /// Serialized size in bytes
    pub fn serialized_size(&self) -> usize {
        PREAMBLE_BYTES as usize + bit_bytes_len(self.num_bits())
    }

    /// Encode the filter. The hasher carries no state, so only the bits,
    /// hash count and insertion count are stored.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.serialized_size());
        bytes.extend_from_slice(&self.encode_preamble());
        bytes.extend_from_slice(&self.bits().to_bytes());
        bytes
    }

    /// Encode the filter into `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.encode_preamble())?;
        writer.write_all(&self.bits().to_bytes())
    }

    fn encode_preamble(&self) -> [u8; PREAMBLE_BYTES as usize] {
        let mut preamble = [0u8; PREAMBLE_BYTES as usize];
        preamble[0] = PREAMBLE_BYTES;
        preamble[1] = SERIAL_VERSION;
        preamble[2] = FAMILY_ID;
        preamble[3] = if self.is_empty() { EMPTY_FLAG_MASK } else { 0 };
        LittleEndian::write_u32(&mut preamble[4..8], self.num_hashes());
        LittleEndian::write_u64(&mut preamble[8..16], self.num_bits());
        LittleEndian::write_u64(&mut preamble[16..24], self.len());
        preamble
    }

    /// Decode a filter produced by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// `Decode` for truncated input, trailing bytes, or a header that does not
    /// describe a valid filter.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut cursor = io::Cursor::new(bytes);
        let filter = Self::read_from(&mut cursor)?;

        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(BloomError::Decode(format!(
                "{} trailing bytes after bit-vector",
                bytes.len() - consumed
            )));
        }

        Ok(filter)
    }

    /// Decode one filter from `reader`, consuming exactly its encoded bytes.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let preamble_bytes = reader
            .read_u8()
            .map_err(|e| insufficient_data("preamble_bytes", e))?;
        let serial_version = reader
            .read_u8()
            .map_err(|e| insufficient_data("serial_version", e))?;
        let family_id = reader
            .read_u8()
            .map_err(|e| insufficient_data("family_id", e))?;

        if family_id != FAMILY_ID {
            return Err(BloomError::Decode(format!(
                "invalid family id: expected {:#04x}, got {:#04x}",
                FAMILY_ID, family_id
            )));
        }
        if serial_version != SERIAL_VERSION {
            return Err(BloomError::Decode(format!(
                "unsupported serial version: expected {}, got {}",
                SERIAL_VERSION, serial_version
            )));
        }
        if preamble_bytes != PREAMBLE_BYTES {
            return Err(BloomError::Decode(format!(
                "invalid preamble length: expected {}, got {}",
                PREAMBLE_BYTES, preamble_bytes
            )));
        }

        let flags = reader
            .read_u8()
            .map_err(|e| insufficient_data("flags", e))?;
        let num_hashes = reader
            .read_u32::<LittleEndian>()
            .map_err(|e| insufficient_data("num_hashes", e))?;
        let num_bits = reader
            .read_u64::<LittleEndian>()
            .map_err(|e| insufficient_data("num_bits", e))?;
        let count = reader
            .read_u64::<LittleEndian>()
            .map_err(|e| insufficient_data("count", e))?;

        if num_bits == 0 {
            return Err(BloomError::Decode("bit-vector length is zero".to_string()));
        }
        if num_hashes == 0 {
            return Err(BloomError::Decode("hash count is zero".to_string()));
        }
        if num_hashes as u64 > num_bits {
            return Err(BloomError::Decode(format!(
                "hash count {} exceeds bit-vector length {}",
                num_hashes, num_bits
            )));
        }
        if ((flags & EMPTY_FLAG_MASK) != 0) != (count == 0) {
            return Err(BloomError::Decode(format!(
                "empty flag disagrees with insertion count {}",
                count
            )));
        }

        let len = usize::try_from(num_bits).map_err(|_| {
            BloomError::Decode(format!("bit-vector length {} is not addressable", num_bits))
        })?;

        // Read through `take` so a forged length cannot force a huge up-front allocation
        let expected = bit_bytes_len(num_bits);
        let mut raw = Vec::new();
        reader
            .by_ref()
            .take(expected as u64)
            .read_to_end(&mut raw)
            .map_err(|e| insufficient_data("bit_vector", e))?;
        if raw.len() != expected {
            return Err(BloomError::Decode(format!(
                "bit-vector truncated: expected {} bytes, got {}",
                expected,
                raw.len()
            )));
        }

        let mut bits = BitVec::from_bytes(&raw);
        if bits.iter().skip(len).any(|bit| bit) {
            return Err(BloomError::Decode(
                "padding bits beyond the bit-vector length are set".to_string(),
            ));
        }
        bits.truncate(len);

        tracing::debug!(num_bits, num_hashes, count, "decoded bloom filter");

        Ok(BloomFilter::from_parts(bits, num_hashes, count))
    }
}

fn bit_bytes_len(num_bits: u64) -> usize {
    num_bits.div_ceil(8) as usize
}

fn insufficient_data(field: &str, err: io::Error) -> BloomError {
    BloomError::Decode(format!("insufficient data for {}: {}", field, err))
}
