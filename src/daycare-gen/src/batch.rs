use std::slice::Chunks;

use crate::error::Error;
use crate::error::Result;

pub const DEFAULT_BATCH_SIZE: usize = 10_000;

pub fn batch_count(len: usize, size: usize) -> Result<usize> {
    if size == 0 {
        return Err(Error::InvalidBatchSize);
    }

    Ok(len.div_ceil(size))
}

/// Contiguous slices of at most `size` records, in order. Only the last one may be shorter.
pub fn batches<T>(records: &[T], size: usize) -> Result<Chunks<'_, T>> {
    if size == 0 {
        return Err(Error::InvalidBatchSize);
    }

    Ok(records.chunks(size))
}
