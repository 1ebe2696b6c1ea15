//! Byte obfuscation for persisted files.
//!
//! Every byte is XORed with a fixed single-byte key. This only keeps the
//! files from being readable at a glance; anyone with the key (which ships
//! in this crate) can reverse it. It is not encryption and must not be
//! relied on to protect anything.

use tracing::trace;

use crate::config::DEFAULT_KEY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorCodec {
    key: u8,
}

impl Default for XorCodec {
    fn default() -> Self {
        Self::new(DEFAULT_KEY)
    }
}

impl XorCodec {
    pub const fn new(key: u8) -> Self {
        Self { key }
    }

    pub fn key(&self) -> u8 {
        self.key
    }

    /// XOR `data` with the key in place. Applying it twice is a no-op.
    pub fn apply(&self, data: &mut [u8]) {
        trace!("Applying XOR codec to {} bytes", data.len());
        for byte in data.iter_mut() {
            *byte ^= self.key;
        }
    }

    pub fn obscure(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut out = plaintext.to_vec();
        self.apply(&mut out);
        out
    }

    pub fn reveal(&self, data: &[u8]) -> Vec<u8> {
        // XOR is its own inverse
        self.obscure(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_byte_values() {
        let codec = XorCodec::default();
        let input: Vec<u8> = (0..=255).collect();
        assert_eq!(codec.reveal(&codec.obscure(&input)), input);
    }

    #[test]
    fn test_obscure_is_involutory() {
        let codec = XorCodec::new(0x5a);
        let input = b"name:Alice|games:2".to_vec();
        let once = codec.obscure(&input);
        assert_ne!(once, input);
        assert_eq!(codec.obscure(&once), input);
    }

    #[test]
    fn test_known_byte() {
        let codec = XorCodec::new(157);
        // 'A' (0x41) ^ 0x9d = 0xdc
        assert_eq!(codec.obscure(b"A"), vec![0xdc]);
    }

    #[test]
    fn test_empty_input() {
        let codec = XorCodec::default();
        assert!(codec.obscure(&[]).is_empty());
    }
}
