//! Unified-diff hunks
//!
//! Changes closer to each other than twice the context size share a hunk, so
//! context lines are never printed twice.

use crate::artifacts::diff::diff_algorithm::{DiffAlgorithm, Edit, MyersDiff};

/// A contiguous slice of an edit script, with surrounding context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<'l> {
    pub a_start: usize,
    pub a_count: usize,
    pub b_start: usize,
    pub b_count: usize,
    pub edits: Vec<Edit<&'l str>>,
}

impl<'l> Hunk<'l> {
    /// Group an edit script into hunks with `context` lines around each change
    pub fn build(edits: &[Edit<&'l str>], context: usize) -> Vec<Hunk<'l>> {
        Self::group_changes(edits, context)
            .into_iter()
            .map(|(first, last)| {
                let start = first.saturating_sub(context);
                let end = (last + context).min(edits.len() - 1);

                Self::from_range(edits, start, end)
            })
            .collect()
    }

    /// `(first, last)` edit indices of each run of changes
    fn group_changes(edits: &[Edit<&'l str>], context: usize) -> Vec<(usize, usize)> {
        let mut groups: Vec<(usize, usize)> = Vec::new();

        for (idx, _) in edits.iter().enumerate().filter(|(_, edit)| edit.is_change()) {
            match groups.last_mut() {
                // equal lines between the two changes fit in the shared context
                Some((_, last)) if idx - *last - 1 <= 2 * context => *last = idx,
                _ => groups.push((idx, idx)),
            }
        }

        groups
    }

    fn from_range(edits: &[Edit<&'l str>], start: usize, end: usize) -> Hunk<'l> {
        let a_before = edits[..start].iter().filter(|edit| edit.in_a()).count();
        let b_before = edits[..start].iter().filter(|edit| edit.in_b()).count();

        let edits = edits[start..=end].to_vec();
        let a_count = edits.iter().filter(|edit| edit.in_a()).count();
        let b_count = edits.iter().filter(|edit| edit.in_b()).count();

        Hunk {
            // an empty side points at the line before the hunk
            a_start: if a_count > 0 { a_before + 1 } else { a_before },
            a_count,
            b_start: if b_count > 0 { b_before + 1 } else { b_before },
            b_count,
            edits,
        }
    }

    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.a_start, self.a_count, self.b_start, self.b_count
        )
    }
}

impl std::fmt::Display for Hunk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header())?;
        for edit in &self.edits {
            writeln!(f, "{}", edit.as_string())?;
        }

        Ok(())
    }
}

/// Hunks of a line diff between two texts
///
/// A trailing newline does not produce an extra empty line.
pub fn diff_hunks(old: &str, new: &str, context: usize) -> String {
    let a = old.lines().collect::<Vec<_>>();
    let b = new.lines().collect::<Vec<_>>();
    let edits = MyersDiff::new(&a, &b).diff();

    Hunk::build(&edits, context)
        .iter()
        .map(|hunk| hunk.to_string())
        .collect()
}
