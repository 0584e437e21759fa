//! The document page stream consumed by the core.

use crate::error::Error;
use crate::runs::RawRun;

/// Read-only, random access to the runs of a document's physical pages.
///
/// This trait keeps the core free of any PDF dependency: the `pdf` crate
/// implements it for parsed documents, tests implement it with in-memory
/// fixtures.
pub trait PageSource {
    /// Number of physical pages.
    fn page_count(&self) -> usize;

    /// Runs of the page at 0-based physical `index`, in reading order.
    fn page_runs(&self, index: usize) -> Result<Vec<RawRun>, Error>;

    /// Plain-text tokens of a page, used to spot printed page numbers.
    fn page_tokens(&self, index: usize) -> Result<Vec<String>, Error> {
        Ok(self
            .page_runs(index)?
            .into_iter()
            .map(|run| run.text)
            .collect())
    }

    /// Runs of `index` followed by the runs of `index + 1`, when it exists.
    ///
    /// Entries often continue onto the next page.
    fn spread_runs(&self, index: usize) -> Result<Vec<RawRun>, Error> {
        let mut runs = self.page_runs(index)?;
        if index + 1 < self.page_count() {
            runs.extend(self.page_runs(index + 1)?);
        }
        Ok(runs)
    }
}

/// In-memory pages, one `Vec<RawRun>` per physical page.
impl PageSource for Vec<Vec<RawRun>> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_runs(&self, index: usize) -> Result<Vec<RawRun>, Error> {
        self.get(index).cloned().ok_or(Error::PageOutOfRange {
            index: index as i64,
            count: self.len(),
        })
    }
}
