//! Shared test helpers

use std::collections::BTreeSet;

use tracing_subscriber::EnvFilter;

use crate::node::Key;
use crate::tree::RedBlackTree;

/// Routes `RUST_LOG`-filtered tracing output through the test harness
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Asserts every structural invariant and returns the black-height
pub(crate) fn assert_valid(tree: &RedBlackTree) -> usize {
    let black_height = match tree.validate() {
        Ok(black_height) => black_height,
        Err(violation) => panic!("invalid tree: {}", violation),
    };

    for leaf in tree.leaf_nodes() {
        assert!(leaf.color().is_black(), "red leaf {:?}", leaf);
        assert_eq!(leaf.black_depth(), black_height + 1, "leaf {:?}", leaf);
    }
    for node in tree.all_nodes() {
        if node.color().is_red() {
            for child in [node.left(), node.right()].into_iter().flatten() {
                assert!(child.color().is_black(), "red {:?} under red {:?}", child, node);
            }
        }
    }

    let keys: Vec<Key> = tree.keys().collect();
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]), "keys out of order: {:?}", keys);

    black_height
}

/// Keys of the key-bearing nodes, ignoring traversal order
pub(crate) fn key_set(tree: &RedBlackTree) -> BTreeSet<Key> {
    tree.non_leaf_nodes()
        .iter()
        .filter_map(|node| node.key())
        .collect()
}
