use crc::{Crc, CRC_8_MAXIM_DOW};

/// CRC-8/MAXIM (a.k.a. DOW-CRC): poly 0x31, reflected in and out, init 0, no final xor.
pub const CRC8_MAXIM: Crc<u8> = Crc::<u8>::new(&CRC_8_MAXIM_DOW);

/// Checksum the device appends to every frame, computed over the payload bytes.
pub fn compute_crc8_maxim(bytes: &[u8]) -> u8 {
    CRC8_MAXIM.checksum(bytes)
}
