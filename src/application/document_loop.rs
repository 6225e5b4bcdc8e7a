// ============================================================
// Layer 2 — Document Loop
// ============================================================
// train, prop and dream all walk the input the same way:
//
//   loop:
//     stop flag raised?  → leave, Interrupted
//     next document      → None: leave, Exhausted
//     empty document     → skip
//     otherwise          → hand it to the use case
//
// The stop flag is only looked at between documents, so an
// interrupt never lands inside a Gibbs step.

use anyhow::Result;

use crate::domain::sparse_vector::SparseVector;
use crate::domain::traits::DocumentSource;
use crate::infra::interrupt::StopFlag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEnd {
    /// The input ran out
    Exhausted,
    /// The stop flag was raised
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    /// Documents handed to the use case
    pub documents: usize,
    /// Empty documents passed over
    pub skipped:   usize,
    pub end:       LoopEnd,
}

pub fn run_documents<D, F>(source: &mut D, stop: &StopFlag, mut handle: F) -> Result<LoopStats>
where
    D: DocumentSource,
    F: FnMut(&SparseVector) -> Result<()>,
{
    let mut documents = 0usize;
    let mut skipped   = 0usize;

    let end = loop {
        if stop.is_raised() {
            tracing::info!("Interrupted after {} document(s)", documents);
            break LoopEnd::Interrupted;
        }

        let Some(doc) = source.next_document()? else {
            break LoopEnd::Exhausted;
        };

        if doc.is_empty() {
            tracing::debug!("Skipping empty document");
            skipped += 1;
            continue;
        }

        handle(doc)?;
        documents += 1;
    };

    Ok(LoopStats { documents, skipped, end })
}
