//! Page-offset resolution.
//!
//! Catalog page numbers are the numbers printed on the pages; documents are
//! addressed by physical index. The two differ by a constant offset (cover,
//! front matter), found by voting: every page that shows the token
//! `index - offset` confirms `offset`.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::source::PageSource;

/// Candidate offsets and the acceptance rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetWindow {
    /// Smallest candidate offset.
    pub min: i64,
    /// Largest candidate offset, inclusive.
    pub max: i64,
    /// Confirmations the winner needs before it can be accepted.
    pub min_confirmations: usize,
}

impl Default for OffsetWindow {
    fn default() -> Self {
        OffsetWindow {
            min: -5,
            max: 4,
            min_confirmations: 3,
        }
    }
}

/// Running tally of confirmations per candidate offset.
#[derive(Debug, Clone)]
pub struct OffsetVote {
    window: OffsetWindow,
    /// `(offset, confirmations)` in ascending offset order.
    tally: Vec<(i64, usize)>,
}

impl OffsetVote {
    pub fn new(window: OffsetWindow) -> Self {
        let tally = (window.min..=window.max).map(|o| (o, 0)).collect();
        OffsetVote { window, tally }
    }

    /// Count the page at physical `index` whose text tokens are `tokens`.
    pub fn observe<S: AsRef<str>>(&mut self, index: usize, tokens: &[S]) {
        for (offset, count) in self.tally.iter_mut() {
            let printed = index as i64 - *offset;
            if printed < 0 {
                continue;
            }
            let needle = printed.to_string();
            if tokens.iter().any(|t| t.as_ref().trim() == needle) {
                *count += 1;
            }
        }
    }

    /// The leading offset, if it has enough confirmations and more than
    /// twice the confirmations of any other candidate.
    pub fn decision(&self) -> Option<i64> {
        // Ties go to the larger offset.
        let &(best_offset, best_count) = self
            .tally
            .iter()
            .max_by_key(|(offset, count)| (*count, *offset))?;
        if best_count < self.window.min_confirmations {
            return None;
        }
        let runner_up = self
            .tally
            .iter()
            .filter(|(offset, _)| *offset != best_offset)
            .map(|(_, count)| 2 * count)
            .max()
            .unwrap_or(0);
        (best_count > runner_up).then_some(best_offset)
    }

    pub fn confirmations(&self, offset: i64) -> usize {
        self.tally
            .iter()
            .find(|(o, _)| *o == offset)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }
}

/// Scan `source` from its first page until the vote is decided.
///
/// Returns `o` such that `printed = physical - o`. Fails with
/// [`Error::PageOffsetUnresolved`] when every page has been scanned without a
/// decision.
pub fn resolve_page_offset<S: PageSource + ?Sized>(
    source: &S,
    window: &OffsetWindow,
) -> Result<i64, Error> {
    let mut vote = OffsetVote::new(window.clone());
    let count = source.page_count();
    for index in 0..count {
        let tokens = source.page_tokens(index)?;
        vote.observe(index, &tokens);
        if let Some(offset) = vote.decision() {
            log::debug!("page offset {offset} confirmed after {} pages", index + 1);
            return Ok(offset);
        }
    }
    Err(Error::PageOffsetUnresolved {
        pages_scanned: count,
    })
}
