// ============================================================
// Layer 4 — Term-Frequency Reader
// ============================================================
// Parses the ingestion stream protocol:
//
//   <index>\t<count>\n     one term of the current document
//   \f...                  a line starting with a form feed ends
//                          the current document (not the stream)
//   EOF                    end of all input
//
// Malformed lines are skipped: the stream may be hand-edited,
// and one bad line should not cost the whole document. With
// `strict` enabled they are reported as IngestError::Malformed
// instead.
//
// The reader keeps its line buffer and its SparseVector alive
// between calls, so a long stream of documents does not
// allocate per document. close() releases both.
//
// Reference: Rust Book §9 (Error Handling), §12 (I/O)

use std::io::{self, BufRead};

use thiserror::Error;

use crate::domain::sparse_vector::SparseVector;
use crate::domain::traits::DocumentSource;

/// Errors produced while reading the ingestion stream.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read input stream: {0}")]
    Io(#[from] io::Error),

    /// Only produced when the reader runs in strict mode
    #[error("malformed input on line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}

// ─── TermFreqReader ───────────────────────────────────────────────────────────
pub struct TermFreqReader<R: BufRead> {
    input:   R,
    /// Raw bytes of the line being parsed (reused)
    line:    Vec<u8>,
    /// The document being assembled (reused)
    current: SparseVector,
    /// 1-based number of the last line read, for error messages
    line_no: usize,
    strict:  bool,
}

impl<R: BufRead> TermFreqReader<R> {
    /// Lenient reader: malformed lines are skipped
    pub fn new(input: R) -> Self {
        Self {
            input,
            line:    Vec::with_capacity(64),
            current: SparseVector::new(),
            line_no: 0,
            strict:  false,
        }
    }

    /// Reject malformed lines instead of skipping them
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read the next document.
    ///
    /// Returns `Some` when a form-feed line closes a document (which
    /// may then be empty), or when EOF arrives after at least one
    /// entry. Returns `None` at EOF with nothing pending.
    pub fn read_document(&mut self) -> Result<Option<&SparseVector>, IngestError> {
        self.current.clear();

        loop {
            self.line.clear();
            let n = self.input.read_until(b'\n', &mut self.line)?;

            // ── End of all input ──────────────────────────────────────────────
            if n == 0 {
                if self.current.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(&self.current));
            }
            self.line_no += 1;

            // ── Document boundary ─────────────────────────────────────────────
            if self.line[0] == b'\x0c' {
                return Ok(Some(&self.current));
            }

            // ── Term record ───────────────────────────────────────────────────
            match parse_record(&self.line) {
                Some((index, count)) => self.current.push(index, count),
                None if self.strict => {
                    return Err(IngestError::Malformed {
                        line:    self.line_no,
                        content: String::from_utf8_lossy(&self.line).into_owned(),
                    });
                }
                None => {
                    tracing::debug!("skipping malformed input line {}", self.line_no);
                }
            }
        }
    }

    /// Release the retained buffers and hand back the underlying input
    pub fn close(self) -> R {
        tracing::debug!("closing ingestion stream after {} lines", self.line_no);
        self.input
    }
}

impl<R: BufRead> DocumentSource for TermFreqReader<R> {
    fn next_document(&mut self) -> anyhow::Result<Option<&SparseVector>> {
        Ok(self.read_document()?)
    }
}

/// Parse `<index>\t<count>\n`.
///
/// Both fields must be plain decimal digits. Counts above 255 are
/// saturated to 255 since the visible layer stores them as u8.
fn parse_record(line: &[u8]) -> Option<(usize, u8)> {
    let body = line.strip_suffix(b"\n")?;
    let tab  = body.iter().position(|&b| b == b'\t')?;
    let (index, count) = (&body[..tab], &body[tab + 1..]);

    let index = parse_digits(index)?;
    let count = parse_digits(count)?;
    Some((usize::try_from(index).ok()?, count.min(u8::MAX as u64) as u8))
}

fn parse_digits(field: &[u8]) -> Option<u64> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(field).ok()?.parse().ok()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str) -> TermFreqReader<Cursor<Vec<u8>>> {
        TermFreqReader::new(Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn test_single_document_then_eof() {
        let mut r = reader("3\t5\n7\t2\n\x0c\n");

        let doc = r.read_document().unwrap().unwrap().clone();
        let expected: SparseVector = vec![(3, 5), (7, 2)].into_iter().collect();
        assert_eq!(doc, expected);

        // Nothing after the form feed → end of input
        assert!(r.read_document().unwrap().is_none());

        let mut dense = vec![0.0f32; 10];
        assert_eq!(doc.populate_dense(&mut dense), 7);
        assert_eq!(dense, vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0]);

        // Closing hands back the input, fully consumed
        let input = r.close();
        assert_eq!(input.position() as usize, input.get_ref().len());
    }

    #[test]
    fn test_form_feed_separates_documents() {
        let mut r = reader("1\t1\n\x0c\n2\t2\n\x0c\n");

        let first = r.read_document().unwrap().unwrap().clone();
        let second = r.read_document().unwrap().unwrap().clone();

        assert_eq!(first.entries()[0].index, 1);
        assert_eq!(second.entries()[0].index, 2);
        assert!(r.read_document().unwrap().is_none());
    }

    #[test]
    fn test_trailing_document_without_form_feed() {
        let mut r = reader("4\t1\n");
        let doc = r.read_document().unwrap().unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let mut r = reader("hello\n5\t\n\t3\n-1\t2\n8 1\n6\t1x\n9\t4\n\x0c\n");
        let doc = r.read_document().unwrap().unwrap();

        // Only the last record is well formed
        assert_eq!(doc.entries(), &[crate::domain::sparse_vector::SparseEntry::new(9, 4)]);
    }

    #[test]
    fn test_record_without_newline_is_malformed() {
        let mut r = reader("4\t1");
        assert!(r.read_document().unwrap().is_none());
    }

    #[test]
    fn test_strict_mode_reports_line_number() {
        let mut r = reader("1\t1\nbogus\n").strict(true);
        match r.read_document() {
            Err(IngestError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {:?}", other.map(|d| d.cloned())),
        }
    }

    #[test]
    fn test_large_count_saturates() {
        let mut r = reader("0\t300\n");
        let doc = r.read_document().unwrap().unwrap();
        assert_eq!(doc.entries()[0].count, 255);
    }

    #[test]
    fn test_empty_document_between_form_feeds() {
        let mut r = reader("\x0c\n1\t1\n");
        assert!(r.read_document().unwrap().unwrap().is_empty());
        assert_eq!(r.read_document().unwrap().unwrap().len(), 1);
    }
}
