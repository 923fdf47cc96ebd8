//! Bolt handshake preamble and version proposal encoding.
//!
//! This core proposes exactly one Bolt version and three zero-filled slots;
//! it does not negotiate a range of versions the way a full driver would.

/// Bolt magic preamble bytes, sent by the client before any version proposal.
pub const BOLT_MAGIC: [u8; 4] = [0x60, 0x60, 0xB0, 0x17];

/// The single version this core proposes: Bolt 4.2.
pub const PROPOSED_VERSION: (u8, u8) = (4, 2);

/// Encodes a `(major, minor)` pair as the 4-byte big-endian wire form
/// `[0x00, 0x00, minor, major]`.
pub fn encode_version(major: u8, minor: u8) -> [u8; 4] {
    [0, 0, minor, major]
}

/// Builds the 16-byte version-proposal block: one real proposal followed by
/// three zero-filled slots, high-priority first.
pub fn proposal_block(major: u8, minor: u8) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[..4].copy_from_slice(&encode_version(major, minor));
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_version_bytes() {
        assert_eq!(encode_version(4, 2), [0x00, 0x00, 0x02, 0x04]);
    }

    #[test]
    fn proposal_block_has_one_nonzero_slot() {
        let block = proposal_block(4, 2);
        assert_eq!(&block[..4], &[0x00, 0x00, 0x02, 0x04]);
        assert_eq!(&block[4..], &[0u8; 12]);
    }
}
