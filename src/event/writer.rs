use super::{EventView, TIMESTAMP_UNSET};
use crate::error::SourceError;
use std::{fmt, io};

/// Slot `i` owns bytes `[i * event_size, (i + 1) * event_size)` of one shared buffer.
#[derive(Default)]
pub struct EventWriters {
    buf: Vec<u8>,
    event_size: usize,
    lens: Vec<usize>,
    timestamps: Vec<u64>,
}

impl EventWriters {
    pub fn new(batch_size: u32, event_size: u32) -> Result<Self, SourceError> {
        if batch_size == 0 {
            return Err(SourceError::InvalidBatchSize(batch_size));
        }
        if event_size == 0 {
            return Err(SourceError::InvalidEventSize(event_size));
        }

        let too_large = || SourceError::BufferTooLarge {
            batch_size,
            event_size,
        };
        let total = (batch_size as usize)
            .checked_mul(event_size as usize)
            .filter(|total| *total <= isize::MAX as usize)
            .ok_or_else(too_large)?;

        Ok(Self {
            buf: try_filled(total, 0).ok_or_else(too_large)?,
            lens: try_filled(batch_size as usize, 0).ok_or_else(too_large)?,
            timestamps: try_filled(batch_size as usize, TIMESTAMP_UNSET).ok_or_else(too_large)?,
            event_size: event_size as usize,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lens.is_empty()
    }

    #[inline]
    pub fn event_size(&self) -> usize {
        self.event_size
    }

    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> EventView<'_> {
        let start = index * self.event_size;
        EventView {
            payload: &self.buf[start..start + self.lens[index]],
            timestamp: self.timestamps[index],
        }
    }

    pub fn get_mut(&mut self, index: usize) -> EventWriter<'_> {
        let start = index * self.event_size;
        EventWriter {
            data: &mut self.buf[start..start + self.event_size],
            len: &mut self.lens[index],
            timestamp: &mut self.timestamps[index],
        }
    }

    pub fn filled(&self, count: usize) -> impl Iterator<Item = EventView<'_>> {
        (0..count.min(self.len())).map(move |i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = EventView<'_>> {
        self.filled(self.len())
    }
}

// None when the allocator refuses the request
fn try_filled<T: Clone>(len: usize, value: T) -> Option<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).ok()?;
    v.resize(len, value);
    Some(v)
}

impl fmt::Debug for EventWriters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventWriters")
            .field("len", &self.len())
            .field("event_size", &self.event_size)
            .finish()
    }
}

#[derive(Debug)]
pub struct EventWriter<'a> {
    data: &'a mut [u8],
    len: &'a mut usize,
    timestamp: &'a mut u64,
}

impl EventWriter<'_> {
    /// Starts a fresh payload for this slot and returns its byte sink.
    ///
    /// The sink never grows past the slot capacity: a write that does not fit
    /// is accepted partially, and `write` reports how many bytes went in.
    pub fn writer(&mut self) -> PayloadWriter<'_> {
        *self.len = 0;
        PayloadWriter {
            data: &mut *self.data,
            len: &mut *self.len,
        }
    }

    #[inline]
    pub fn set_timestamp(&mut self, timestamp: u64) {
        *self.timestamp = timestamp;
    }

    #[inline]
    pub fn timestamp(&self) -> u64 {
        *self.timestamp
    }

    pub fn reset(&mut self) {
        *self.len = 0;
        *self.timestamp = TIMESTAMP_UNSET;
    }

    #[inline]
    pub fn len(&self) -> usize {
        *self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        *self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug)]
pub struct PayloadWriter<'a> {
    data: &'a mut [u8],
    len: &'a mut usize,
}

impl io::Write for PayloadWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let start = *self.len;
        let n = buf.len().min(self.data.len() - start);
        self.data[start..start + n].copy_from_slice(&buf[..n]);
        *self.len += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
