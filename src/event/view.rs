use super::TIMESTAMP_UNSET;

/// Read-only view of one filled slot.
#[derive(Debug, Clone, Copy)]
pub struct EventView<'a> {
    pub payload: &'a [u8],
    pub timestamp: u64,
}

impl EventView<'_> {
    #[inline]
    pub fn has_timestamp(&self) -> bool {
        self.timestamp != TIMESTAMP_UNSET
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
