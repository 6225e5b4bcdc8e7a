// ============================================================
// Layer 3 — SparseVector Domain Type
// ============================================================
// One document as it arrives on the ingestion stream:
// a list of (term index, term count) pairs in input order.
//
// Indices are neither sorted nor unique. When the vector is
// expanded into the dense visible layer, a later entry for
// the same index overwrites an earlier one.
//
// Example:
//   Input lines:  "3\t5\n7\t2\n\f\n"
//   SparseVector: [(3, 5), (7, 2)]
//   Dense (z=10): [0, 0, 0, 5, 0, 0, 0, 2, 0, 0]   total = 7
//
// Reference: Rust Book §8 (Vectors)

/// A single (term index, term count) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseEntry {
    /// Position in the visible layer (the vocabulary id)
    pub index: usize,

    /// How many times the term occurred in the document
    pub count: u8,
}

impl SparseEntry {
    pub fn new(index: usize, count: u8) -> Self {
        Self { index, count }
    }
}

/// A document's term counts in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseVector {
    entries: Vec<SparseEntry>,
}

impl SparseVector {
    /// Create an empty vector
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append one pair, keeping input order
    pub fn push(&mut self, index: usize, count: u8) {
        self.entries.push(SparseEntry::new(index, count));
    }

    /// Forget all pairs but keep the allocation for the next document
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SparseEntry] {
        &self.entries
    }

    /// Expand into the dense buffer `target`.
    ///
    /// The buffer is zeroed first. Entries whose index does not fit
    /// are dropped with a warning: the machine is simply too small
    /// for that vocabulary entry, the rest of the document still counts.
    ///
    /// Returns the total observed count N over the populated entries,
    /// which is the document length used by the replicated softmax.
    pub fn populate_dense(&self, target: &mut [f32]) -> usize {
        target.iter_mut().for_each(|x| *x = 0.0);

        let mut total = 0usize;
        for entry in &self.entries {
            if entry.index >= target.len() {
                tracing::warn!(
                    "not populating entry {}, machine's network too small ({} visible units)",
                    entry.index,
                    target.len()
                );
                continue;
            }
            total += entry.count as usize;
            target[entry.index] = entry.count as f32;
        }
        total
    }
}

impl FromIterator<(usize, u8)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (usize, u8)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(index, count)| SparseEntry::new(index, count))
                .collect(),
        }
    }
}
