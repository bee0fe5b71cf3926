/// Position of a raw record within the input source.
pub type Offset = u64;
pub type Step = u32;

/// A single undecoded record as delivered by the input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub offset: Offset,
    pub bytes: Vec<u8>
}

impl RawRecord {
    pub fn new(offset: Offset, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into()
        }
    }
}

pub type Batch = Vec<RawRecord>;
