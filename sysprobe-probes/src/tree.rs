//! Node Tree Build Stage
//!
//! Allocation-heavy tree construction: append a fixed number of leaf
//! nodes to a parent and time the build.

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use sysprobe_core::{ProbeError, Stopwatch};

/// One node in the scratch tree.
#[derive(Debug)]
struct Node {
    text: &'static str,
    children: Vec<Node>,
}

impl Node {
    fn leaf(text: &'static str) -> Self {
        Self {
            text,
            children: Vec::new(),
        }
    }
}

/// Build a flat tree of `tree_nodes` leaves under one parent.
pub fn stage_tree_build(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let count = cx.settings.tree_nodes;

    let watch = Stopwatch::start();
    let mut parent = Node {
        text: "root",
        children: Vec::new(),
    };
    for _ in 0..count {
        parent.children.push(Node::leaf("x"));
    }
    let elapsed = watch.elapsed_ms();

    // Keep the tree alive through the measurement.
    let built = std::hint::black_box(parent.children.len());
    if built != count as usize {
        return Err(ProbeError::stage(format!(
            "built {} nodes, expected {}",
            built, count
        )));
    }
    debug_assert_eq!(parent.text, "root");

    Ok(StageOutcome::timed_ms(elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ProbeSettings;
    use crate::runner::test_support::simulated_context;

    #[test]
    fn builds_exactly_the_configured_node_count() {
        let mut cx = simulated_context(ProbeSettings::minimal());
        let outcome = stage_tree_build(&mut cx).expect("tree build");
        assert!(outcome.metric.expect("metric") >= 0.0);
        assert!(outcome.detail.ends_with("ms"));
    }
}
