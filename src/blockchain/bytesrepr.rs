//! Canonical byte encoding used for deploy hashing.
//!
//! Integers are little-endian, variable-length values carry a `u32`
//! length prefix, and `U512` amounts are written as a length byte followed
//! by the minimal little-endian magnitude.

/// Types with a canonical byte encoding.
pub trait ToBytes {
    /// Append the encoding of `self` to `out`.
    fn write_bytes(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_bytes(&mut out);
        out
    }
}

impl ToBytes for u8 {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }
}

impl ToBytes for bool {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }
}

impl ToBytes for u32 {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl ToBytes for u64 {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl ToBytes for str {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_length_prefixed(self.as_bytes(), out);
    }
}

impl ToBytes for String {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.as_str().write_bytes(out);
    }
}

impl<T: ToBytes> ToBytes for [T] {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        (self.len() as u32).write_bytes(out);
        for item in self {
            item.write_bytes(out);
        }
    }
}

impl<T: ToBytes> ToBytes for Vec<T> {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.as_slice().write_bytes(out);
    }
}

/// Write an opaque byte blob with its `u32` length prefix.
pub fn write_length_prefixed(bytes: &[u8], out: &mut Vec<u8>) {
    (bytes.len() as u32).write_bytes(out);
    out.extend_from_slice(bytes);
}

/// Encode an unsigned amount in the `U512` wire form.
pub fn u512_bytes(value: u64) -> Vec<u8> {
    let le = value.to_le_bytes();
    let significant = le.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    let mut out = Vec::with_capacity(significant + 1);
    out.push(significant as u8);
    out.extend_from_slice(&le[..significant]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_little_endian() {
        assert_eq!(100u32.to_bytes(), vec![0x64, 0, 0, 0]);
        assert_eq!(1u64.to_bytes(), vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_string_is_length_prefixed() {
        assert_eq!(
            "casper-test".to_bytes(),
            [&[11u8, 0, 0, 0][..], b"casper-test"].concat()
        );
    }

    #[test]
    fn test_list_carries_count() {
        let items: Vec<u32> = vec![1, 2];
        assert_eq!(items.to_bytes(), vec![2, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0]);

        let empty: Vec<u32> = Vec::new();
        assert_eq!(empty.to_bytes(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_u512_minimal_encoding() {
        assert_eq!(u512_bytes(0), vec![0]);
        assert_eq!(u512_bytes(255), vec![1, 0xff]);
        assert_eq!(u512_bytes(256), vec![2, 0x00, 0x01]);
        // 200 CSPR in motes
        assert_eq!(
            u512_bytes(200_000_000_000),
            vec![5, 0x00, 0xd0, 0xed, 0x90, 0x2e]
        );
    }
}
