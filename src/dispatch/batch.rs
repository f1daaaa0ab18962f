//! Order-preserving partitioning of a recipient list into batches.

/// One contiguous slice of a job's recipient list, with the aligned
/// slice of per-recipient variable sets when the job carries one.
///
/// Batches exist only for the duration of one concurrent send-and-wait
/// cycle; they borrow from the job and are never persisted.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// Zero-based batch number.
    pub index: usize,
    /// Recipients in this batch, original order.
    pub recipients: &'a [String],
    /// Per-recipient variable sets aligned with `recipients`.
    pub overrides: Option<&'a [Vec<String>]>,
}

/// Splits `recipients` (and the aligned `overrides`, if present) into
/// consecutive chunks of at most `size`.
///
/// The final chunk may be shorter. Original order is preserved; no
/// recipient is dropped or duplicated. Alignment of `overrides` with
/// `recipients` is the caller's invariant (enforced at job creation).
pub fn batches<'a>(
    recipients: &'a [String],
    overrides: Option<&'a [Vec<String>]>,
    size: usize,
) -> impl Iterator<Item = Batch<'a>> {
    debug_assert!(size > 0, "batch size must be positive");
    recipients
        .chunks(size)
        .enumerate()
        .map(move |(index, chunk)| {
            let start = index * size;
            let overrides = overrides.map(|sets| {
                let end = (start + chunk.len()).min(sets.len());
                &sets[start.min(sets.len())..end]
            });
            Batch {
                index,
                recipients: chunk,
                overrides,
            }
        })
}

/// Number of batches a list of `len` recipients yields at `size`.
#[must_use]
pub const fn batch_count(len: usize, size: usize) -> usize {
    len.div_ceil(size)
}
