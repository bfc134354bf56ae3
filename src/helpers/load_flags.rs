use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LoadFlags: u32 {
        /// Table and column names must be valid UTF-8
        const STRICT_NAMES    = 0b0000_0001;

        /// Image CRC32 must match `LoadOptions::expected_checksum`
        const VERIFY_CHECKSUM = 0b0000_0010;
    }
}
