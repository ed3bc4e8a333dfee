//! Comment tree reconstruction
//!
//! Turns the flat, page-ordered comment listing into a rooted forest using each
//! record's declared depth and parent identifier. Linear in the number of
//! comments; sibling order is encounter order, never re-sorted.

use log::debug;
use std::collections::HashMap;

use crate::page_extractor::CommentRecord;
use crate::utils::MAX_REPLY_NESTING;

/// Result of reconstructing one post's comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentForest {
    /// Depth-0 records in encounter order, replies populated recursively
    pub roots: Vec<CommentRecord>,
    /// Records dropped because their parent chain does not reach a root
    pub orphaned: usize,
}

impl CommentForest {
    /// Number of records reachable from the roots
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.roots.iter().map(CommentRecord::subtree_len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Rebuild the comment forest from a flat listing
///
/// - Every depth-0 record is a root, whatever its parent identifier says.
/// - A deeper record is attached to the record its parent identifier names,
///   provided that parent exists and is strictly shallower. Otherwise it is an
///   orphan and is dropped along with everything beneath it.
/// - When identifiers repeat, the last record with that identifier is the one
///   children attach to.
/// - Threads nest at most `MAX_REPLY_NESTING` levels. Descendants below the
///   last level become direct replies of their ancestor there, in page order.
#[must_use]
pub fn reconstruct(flat: Vec<CommentRecord>) -> CommentForest {
    let total = flat.len();
    if total == 0 {
        return CommentForest::default();
    }

    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(total);
    for (index, record) in flat.iter().enumerate() {
        by_id.insert(record.id.as_str(), index);
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); total];

    for (index, record) in flat.iter().enumerate() {
        if record.depth == 0 {
            roots.push(index);
            continue;
        }
        if record.parent_id.is_empty() {
            continue;
        }
        if let Some(&parent) = by_id.get(record.parent_id.as_str())
            && flat[parent].depth < record.depth
        {
            children[parent].push(index);
        }
    }

    let mut slots: Vec<Option<CommentRecord>> = flat
        .into_iter()
        .map(|mut record| {
            record.replies.clear();
            Some(record)
        })
        .collect();

    let roots: Vec<CommentRecord> = roots
        .into_iter()
        .filter_map(|index| assemble(index, 1, &mut slots, &children))
        .collect();

    let forest = CommentForest {
        orphaned: 0,
        roots,
    };
    let orphaned = total - forest.reachable_count();
    if orphaned > 0 {
        debug!("Dropped {orphaned} of {total} comments with unresolvable parents");
    }

    CommentForest { orphaned, ..forest }
}

fn assemble(
    index: usize,
    level: usize,
    slots: &mut [Option<CommentRecord>],
    children: &[Vec<usize>],
) -> Option<CommentRecord> {
    let mut record = slots[index].take()?;
    record.replies = if level + 1 >= MAX_REPLY_NESTING {
        flatten_descendants(index, slots, children)
    } else {
        children[index]
            .iter()
            .filter_map(|&child| assemble(child, level + 1, slots, children))
            .collect()
    };
    Some(record)
}

/// Every descendant of `index` in depth-first page order, without nesting
fn flatten_descendants(
    index: usize,
    slots: &mut [Option<CommentRecord>],
    children: &[Vec<usize>],
) -> Vec<CommentRecord> {
    let mut flattened = Vec::new();
    let mut stack: Vec<usize> = children[index].iter().rev().copied().collect();
    while let Some(next) = stack.pop() {
        if let Some(record) = slots[next].take() {
            flattened.push(record);
            stack.extend(children[next].iter().rev());
        }
    }
    flattened
}
