//! The minimal `.dot`/`.ord`/`.sgf` reader/writer pair needed to drive the
//! orchestrator end to end. These formats are "external collaborators" per
//! §1/§6: in scope only to the extent the core consumes or produces them: no
//! standalone converter binary, no generators, no ILP/LP emission.

pub mod dot;
pub mod graph_io;
pub mod ord;
pub mod sgf;

pub use graph_io::{read_graph, write_graph_dot, write_graph_ord};
pub use sgf::{read_sgf, write_sgf};

/// Which objective's best-so-far order a snapshot file reports, selecting
/// the `[_TAG]` suffix of `BASE-PRE+HEUR[_TAG].ord` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotTag {
    TotalCrossings,
    PostProcessedTotalCrossings,
    BottleneckCrossings,
    TotalStretch,
    BottleneckStretch,
}

impl SnapshotTag {
    fn suffix(self) -> &'static str {
        match self {
            SnapshotTag::TotalCrossings => "",
            SnapshotTag::PostProcessedTotalCrossings => "-post",
            SnapshotTag::BottleneckCrossings => "_edge",
            SnapshotTag::TotalStretch => "_stretch",
            SnapshotTag::BottleneckStretch => "_bs",
        }
    }
}

/// Builds `BASE-PRE+HEUR[_TAG].ord`, grounded in the reference
/// implementation's `createOrdFileName`.
pub fn snapshot_file_name(base: &str, preprocessor: Option<&str>, heuristic: &str, tag: SnapshotTag) -> String {
    let pre = preprocessor.unwrap_or("");
    format!("{base}-{pre}+{heuristic}{}.ord", tag.suffix())
}

/// Builds `BASE-PRE+HEUR-ITERATION.ord`, the `-c ITER` capture filename.
/// Grounded in the reference implementation's `end_of_iteration`, which
/// calls `createOrdFileName` with the appendix `"-%d"` formatted from the
/// current iteration.
pub fn capture_file_name(base: &str, preprocessor: Option<&str>, heuristic: &str, iteration: u64) -> String {
    let pre = preprocessor.unwrap_or("");
    format!("{base}-{pre}+{heuristic}-{iteration}.ord")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_default_snapshot_name() {
        let name = snapshot_file_name("widgets", None, "bary", SnapshotTag::TotalCrossings);
        assert_eq!(name, "widgets-+bary.ord");
    }

    #[test]
    fn builds_a_tagged_snapshot_name_with_a_preprocessor() {
        let name = snapshot_file_name("widgets", Some("dfs"), "mce", SnapshotTag::BottleneckStretch);
        assert_eq!(name, "widgets-dfs+mce_bs.ord");
    }

    #[test]
    fn builds_a_capture_file_name() {
        let name = capture_file_name("widgets", Some("dfs"), "mce", 7);
        assert_eq!(name, "widgets-dfs+mce-7.ord");
    }
}
