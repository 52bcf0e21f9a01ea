/*!
 * Batch planning.
 *
 * Texts too short to be worth translating are filtered out, the remaining
 * ones are grouped into fixed-size chunks, and an index map remembers where
 * each submitted text came from so results can be put back in place.
 */

/// Texts whose trimmed length is at most this many characters are never submitted
pub const MIN_TEXT_CHARS: usize = 2;

/// Whether a cleaned text is long enough to be sent for translation
pub fn is_translatable(text: &str) -> bool {
    text.trim().chars().count() > MIN_TEXT_CHARS
}

/// Maps each position of the filtered sequence to its position in the original one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    positions: Vec<usize>,
}

impl IndexMap {
    /// Original position of a filtered item
    pub fn original_position(&self, filtered_position: usize) -> Option<usize> {
        self.positions.get(filtered_position).copied()
    }

    /// Number of filtered items
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing was kept
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Original positions in filtered order
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

/// The chunks a run will submit and how to map their results back
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// Length of the original text sequence
    original_len: usize,

    /// Filtered position to original position
    index_map: IndexMap,

    /// Texts that will be submitted, in order
    filtered: Vec<String>,

    /// Maximum number of texts per chunk
    batch_size: usize,
}

impl BatchPlan {
    /// Plan the chunks for a sequence of cleaned texts
    pub fn new<S: AsRef<str>>(texts: &[S], batch_size: usize) -> Self {
        let mut positions = Vec::new();
        let mut filtered = Vec::new();

        for (position, text) in texts.iter().enumerate() {
            let text = text.as_ref();
            if is_translatable(text) {
                positions.push(position);
                filtered.push(text.to_string());
            }
        }

        Self {
            original_len: texts.len(),
            index_map: IndexMap { positions },
            filtered,
            batch_size: batch_size.max(1),
        }
    }

    /// Consecutive chunks of at most `batch_size` texts
    pub fn chunks(&self) -> std::slice::Chunks<'_, String> {
        self.filtered.chunks(self.batch_size)
    }

    /// Number of chunks the plan will submit
    pub fn chunk_count(&self) -> usize {
        self.filtered.len().div_ceil(self.batch_size)
    }

    /// Texts that will be submitted
    pub fn filtered(&self) -> &[String] {
        &self.filtered
    }

    /// Filtered position to original position mapping
    pub fn index_map(&self) -> &IndexMap {
        &self.index_map
    }

    /// Number of texts that were filtered out
    pub fn skipped_count(&self) -> usize {
        self.original_len - self.filtered.len()
    }

    /// Batch size the plan was built with
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Put results of the filtered sequence back at their original positions.
    ///
    /// Every position not covered by `filtered_results` keeps its text from
    /// `originals`, so the output always has the length of `originals`.
    pub fn scatter<S: AsRef<str>>(&self, filtered_results: &[String], originals: &[S]) -> Vec<String> {
        let mut merged: Vec<String> = originals.iter().map(|t| t.as_ref().to_string()).collect();

        for (filtered_position, result) in filtered_results.iter().enumerate() {
            let target = self
                .index_map
                .original_position(filtered_position)
                .and_then(|position| merged.get_mut(position));
            if let Some(slot) = target {
                *slot = result.clone();
            }
        }

        merged
    }
}
