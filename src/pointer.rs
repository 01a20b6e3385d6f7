use std::fmt;

/// A segment:offset far pointer, as stored in an EXE relocation table.
///
/// Equality is by field, not by linear address: `0000:0010` and `0001:0000`
/// are different relocation entries even though they name the same byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pointer {
    pub segment: u16,
    pub offset: u16,
}

impl Pointer {
    pub fn abs(&self) -> u32 {
        self.segment as u32 * 16 + self.offset as u32
    }

    /// Appends the pointer in relocation-table order (offset first).
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend(&u16::to_le_bytes(self.offset));
        buf.extend(&u16::to_le_bytes(self.segment));
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.segment, self.offset)
    }
}

#[test]
fn test_pointer_write() {
    let mut buf = Vec::new();
    Pointer { segment: 0x1234, offset: 0x0005 }.write(&mut buf);
    assert_eq!(buf, [0x05, 0x00, 0x34, 0x12]);
    assert_eq!(Pointer { segment: 0x0001, offset: 0x0002 }.abs(), 0x12);
}
