//! XOR masking (RFC 6455 section 5.3).

/// Apply XOR mask to data in-place, starting `offset` bytes into the key period.
///
/// Masking is its own inverse, so this both masks and unmasks. Passing the
/// running byte offset of `data` within its frame lets a payload be processed
/// in chunks of any size.
pub fn apply_mask(data: &mut [u8], key: [u8; 4], offset: u64) {
    let start = (offset % 4) as usize;
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= key[(start + i) % 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_is_self_inverse() {
        let key = [0x37, 0xfa, 0x21, 0x3d];
        let mut payload = b"Hello".to_vec();

        apply_mask(&mut payload, key, 0);
        assert_eq!(payload, [0x7f, 0x9f, 0x4d, 0x51, 0x58]);

        apply_mask(&mut payload, key, 0);
        assert_eq!(payload, b"Hello");
    }

    #[test]
    fn test_mask_split_at_unaligned_offsets() {
        let key = [0x01, 0x02, 0x04, 0x08];
        let original: Vec<u8> = (0..23).collect();

        let mut whole = original.clone();
        apply_mask(&mut whole, key, 0);

        let mut pieces = original.clone();
        let mut offset = 0u64;
        for len in [3usize, 1, 7, 5, 7] {
            let start = offset as usize;
            apply_mask(&mut pieces[start..start + len], key, offset);
            offset += len as u64;
        }
        assert_eq!(pieces, whole);
    }

    #[test]
    fn test_zero_key_is_identity() {
        let mut payload = b"unchanged".to_vec();
        apply_mask(&mut payload, [0; 4], 3);
        assert_eq!(payload, b"unchanged");
    }
}
