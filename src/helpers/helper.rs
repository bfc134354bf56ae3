// Little-endian field access on already bounds-checked image slices.
//
// Callers pass positions that the relocator validated against the image
// extent; these helpers index directly.

pub fn read_u8(buf: &[u8], at: usize) -> u8 {
    buf[at]
}

pub fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(b)
}

pub fn read_i32(buf: &[u8], at: usize) -> i32 {
    read_u32(buf, at) as i32
}

pub fn read_f32(buf: &[u8], at: usize) -> f32 {
    f32::from_bits(read_u32(buf, at))
}

pub fn read_u64(buf: &[u8], at: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(b)
}

pub fn read_i64(buf: &[u8], at: usize) -> i64 {
    read_u64(buf, at) as i64
}

pub fn write_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

pub fn write_u64(buf: &mut [u8], at: usize, v: u64) {
    buf[at..at + 8].copy_from_slice(&v.to_le_bytes());
}

/// Length of the NUL-terminated run starting at `at`, without the terminator.
/// `None` when no terminator occurs before the end of `buf`.
pub fn c_str_len(buf: &[u8], at: usize) -> Option<usize> {
    buf.get(at..)?.iter().position(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_reads() {
        let buf = [0x78, 0x56, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(read_u32(&buf, 0), 0x1234_5678);
        assert_eq!(read_i32(&buf, 4), -1);
        assert_eq!(read_u64(&buf, 0), 0xffff_ffff_1234_5678);
        assert_eq!(read_u8(&buf, 3), 0x12);
    }

    #[test]
    fn test_write_round_trip() {
        let mut buf = [0u8; 12];
        write_u32(&mut buf, 0, 1.5f32.to_bits());
        write_u64(&mut buf, 4, (-2i64) as u64);
        assert_eq!(read_f32(&buf, 0), 1.5);
        assert_eq!(read_i64(&buf, 4), -2);
    }

    #[test]
    fn test_c_str_len() {
        let buf = b"abc\0de";
        assert_eq!(c_str_len(buf, 0), Some(3));
        assert_eq!(c_str_len(buf, 3), Some(0));
        assert_eq!(c_str_len(buf, 4), None);
        assert_eq!(c_str_len(buf, 40), None);
    }
}
