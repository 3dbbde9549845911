use std::collections::HashSet;

use order_stat_tree::{Bst, InvariantError, NodeId, SearchTree};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const SCENARIO: [i32; 11] = [15, 6, 18, 3, 7, 17, 20, 2, 4, 13, 9];

fn keys(tree: &Bst<i32>) -> Vec<i32> {
    tree.iter().copied().collect()
}

fn scenario() -> Bst<i32> {
    SCENARIO.into_iter().collect()
}

#[test]
fn bst_basic_operations() {
    let tree = scenario();
    assert_eq!(tree.len(), 11);
    assert_eq!(keys(&tree), vec![2, 3, 4, 6, 7, 9, 13, 15, 17, 18, 20]);
    assert_eq!(tree.height(), 5);
    tree.check_invariants().unwrap();

    let root = tree.root().unwrap();
    assert_eq!(*tree.key(root), 15);
    assert_eq!(*tree.key(tree.min(root)), 2);
    assert_eq!(*tree.key(tree.max(root)), 20);

    let seven = tree.search(&7).unwrap();
    assert_eq!(*tree.key(seven), 7);
    assert!(tree.search(&8).is_none());

    let succ = |k: i32| {
        let x = tree.search(&k).unwrap();
        tree.successor(x).map(|s| *tree.key(s))
    };
    assert_eq!(succ(6), Some(7));
    assert_eq!(succ(13), Some(15));
    assert_eq!(succ(4), Some(6));
    assert_eq!(succ(20), None);

    let pred = |k: i32| {
        let x = tree.search(&k).unwrap();
        tree.predecessor(x).map(|p| *tree.key(p))
    };
    assert_eq!(pred(15), Some(13));
    assert_eq!(pred(9), Some(7));
    assert_eq!(pred(2), None);
}

#[test]
fn search_from_subtree() {
    let tree = scenario();
    let six = tree.search(&6).unwrap();
    assert!(tree.search_from(Some(six), &13).is_some());
    assert!(tree.search_from(Some(six), &18).is_none());
    assert!(tree.search_from(None, &6).is_none());
    assert_eq!(tree.height_from(Some(six)), 4);
    assert_eq!(tree.height_from(None), 0);
}

#[test]
fn delete_each_case() {
    // leaf
    let mut tree = scenario();
    let nine = tree.search(&9).unwrap();
    assert_eq!(tree.remove(nine), 9);
    tree.check_invariants().unwrap();
    assert_eq!(keys(&tree), vec![2, 3, 4, 6, 7, 13, 15, 17, 18, 20]);

    // only a right child
    let mut tree = scenario();
    let seven = tree.search(&7).unwrap();
    tree.delete(seven);
    tree.check_invariants().unwrap();
    assert_eq!(*tree.key(tree.right(tree.search(&6).unwrap()).unwrap()), 13);

    // only a left child
    let mut tree = scenario();
    let thirteen = tree.search(&13).unwrap();
    tree.delete(thirteen);
    tree.check_invariants().unwrap();
    assert_eq!(*tree.key(tree.right(tree.search(&7).unwrap()).unwrap()), 9);

    // two children, successor is the right child
    let mut tree = scenario();
    let six = tree.search(&6).unwrap();
    tree.delete(six);
    tree.check_invariants().unwrap();
    assert_eq!(keys(&tree), vec![2, 3, 4, 7, 9, 13, 15, 17, 18, 20]);
    assert_eq!(*tree.key(tree.left(tree.root().unwrap()).unwrap()), 7);

    // two children, successor sits deeper
    let mut tree = scenario();
    let root = tree.root().unwrap();
    tree.delete(root);
    tree.check_invariants().unwrap();
    assert_eq!(*tree.key(tree.root().unwrap()), 17);
    assert_eq!(keys(&tree), vec![2, 3, 4, 6, 7, 9, 13, 17, 18, 20]);
}

#[test]
fn deleted_node_is_detached_until_freed() {
    let mut tree = scenario();
    let six = tree.search(&6).unwrap();
    tree.delete(six);

    assert!(tree.parent(six).is_none());
    assert!(tree.left(six).is_none());
    assert!(tree.right(six).is_none());
    assert_eq!(*tree.key(six), 6);
    assert_eq!(tree.stats().detached(), 1);
    assert!(tree.search(&6).is_none());

    // a detached node can go back in
    tree.insert(six);
    tree.check_invariants().unwrap();
    assert_eq!(tree.search(&6), Some(six));

    tree.delete(six);
    assert_eq!(tree.free_node(six), 6);
    assert_eq!(tree.stats().detached(), 0);
    assert_eq!(tree.len(), 10);
}

#[test]
fn freed_slots_are_reused() {
    let mut tree = Bst::new();
    let a = tree.insert_key(1);
    tree.insert_key(2);
    tree.remove(a);
    let b = tree.create_node(3);
    // same slot, next generation
    assert_eq!(format!("{:?}", a), "#0");
    assert_eq!(format!("{:?}", b), "#0v1");
    assert_ne!(a, b);
    tree.insert(b);
    assert_eq!(keys(&tree), vec![2, 3]);
    assert_eq!(tree.stats().allocated, 2);
    tree.check_invariants().unwrap();
}

fn reused_slot() -> (Bst<i32>, NodeId, NodeId) {
    let mut tree = scenario();
    let three = tree.search(&3).unwrap();
    tree.remove(three);
    let nine = tree.insert_key(9);
    assert_ne!(three, nine);
    (tree, three, nine)
}

#[test]
#[should_panic(expected = "is not allocated")]
fn stale_handle_read_panics_after_slot_reuse() {
    let (tree, three, _) = reused_slot();
    tree.key(three);
}

#[test]
#[should_panic(expected = "is not allocated")]
fn stale_handle_delete_panics_after_slot_reuse() {
    let (mut tree, three, _) = reused_slot();
    tree.delete(three);
}

#[test]
fn stale_handle_leaves_live_node_alone() {
    let (mut tree, three, nine) = reused_slot();
    let stale = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| tree.remove(three)));
    assert!(stale.is_err());
    assert_eq!(tree.key(nine), &9);
    assert_eq!(tree.search(&9).map(|x| tree.key(x)), Some(&9));
}

#[test]
fn destroy_from_releases_one_subtree() {
    let tree_keys = [50, 30, 70, 20, 40, 60, 80, 35, 45, 65];
    let mut tree: Bst<i32> = tree_keys.into_iter().collect();
    let thirty = tree.search(&30).unwrap();
    let mut released = Vec::new();
    assert_eq!(tree.destroy_from(thirty, |key| released.push(key)), 5);
    assert_eq!(released, vec![20, 35, 45, 40, 30]);
    assert_eq!(keys(&tree), vec![50, 60, 65, 70, 80]);
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.stats().allocated, 5);
    tree.check_invariants().unwrap();

    let root = tree.root().unwrap();
    assert_eq!(tree.destroy_from(root, |_| {}), 5);
    assert!(tree.is_empty());
    tree.check_invariants().unwrap();
}

#[test]
fn transplant_replaces_subtree() {
    let mut tree = scenario();
    let six = tree.search(&6).unwrap();
    let three = tree.search(&3).unwrap();
    tree.transplant(six, Some(three));
    assert_eq!(tree.left(tree.root().unwrap()), Some(three));
    assert_eq!(tree.parent(three), tree.root());
    let reachable: Vec<i32> = keys(&tree);
    assert_eq!(reachable, vec![2, 3, 4, 15, 17, 18, 20]);
    // the recorded size no longer matches what hangs off the root
    assert!(matches!(
        tree.check_invariants(),
        Err(InvariantError::NodeCount { reachable: 7, recorded: 11 })
    ));
}

#[test]
fn traversal_is_lazy_and_restartable() {
    let tree = scenario();
    assert_eq!(tree.iter_limited(3).copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    assert_eq!(tree.iter_limited(0).count(), 0);
    assert_eq!(tree.iter_limited(100).count(), 11);
    // no state survives between walks
    assert_eq!(tree.iter_limited(3).copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    assert_eq!(keys(&tree), keys(&tree));
    assert_eq!(tree.walk_silent(), 11);

    let seven = tree.search(&7).unwrap();
    assert_eq!(tree.iter_from(Some(seven)).copied().collect::<Vec<_>>(), vec![7, 9, 13]);
}

#[test]
fn sequential_insert_degenerates() {
    let n = 10_000;
    let mut tree: Bst<i32> = (1..=n).collect();
    assert_eq!(tree.height(), n as usize);
    assert_eq!(tree.walk_silent(), n as usize);
    assert!(tree.iter().copied().eq(1..=n));
    tree.check_invariants().unwrap();

    let mut released = 0;
    assert_eq!(tree.destroy(|_| released += 1), n as usize);
    assert_eq!(released, n as usize);
    assert!(tree.is_empty());
}

#[test]
fn random_insert_stays_shallow() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut keys: Vec<i32> = (1..=1000).collect();
    keys.shuffle(&mut rng);
    let tree: Bst<i32> = keys.into_iter().collect();
    assert!(tree.height() < 40, "height {}", tree.height());
}

#[test]
fn destroy_releases_every_node_once() {
    let tree_keys = [50, 30, 70, 20, 40, 60, 80, 35, 45, 65];
    let mut tree: Bst<i32> = tree_keys.into_iter().collect();
    let mut released = Vec::new();
    let count = tree.destroy(|key| released.push(key));
    assert_eq!(count, tree_keys.len());
    // post-order
    assert_eq!(released, vec![20, 35, 45, 40, 30, 65, 60, 80, 70, 50]);
    assert!(tree.root().is_none());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.stats().allocated, 0);
    assert_eq!(tree.destroy(|_| {}), 0);
}

#[test]
fn duplicate_keys_go_right() {
    let mut tree: Bst<i32> = [5, 5, 3, 5, 7].into_iter().collect();
    tree.check_invariants().unwrap();
    assert_eq!(keys(&tree), vec![3, 5, 5, 5, 7]);

    let root = tree.root().unwrap();
    assert_eq!(*tree.key(tree.right(root).unwrap()), 5);

    while let Some(five) = tree.search(&5) {
        tree.remove(five);
        tree.check_invariants().unwrap();
    }
    assert_eq!(keys(&tree), vec![3, 7]);
}

#[test]
fn random_op_test() {
    let mut tree = Bst::new();
    let n = 5000;
    let mut rng = StdRng::seed_from_u64(2024);

    let mut keys = HashSet::new();
    while keys.len() < n {
        keys.insert(rng.gen::<u16>() as i32);
    }
    let mut keys: Vec<_> = keys.into_iter().collect();

    for &key in keys.iter() {
        tree.insert_key(key);
    }
    tree.check_invariants().unwrap();
    for &key in keys.iter() {
        assert_eq!(tree.search(&key).map(|x| *tree.key(x)), Some(key));
    }

    keys.shuffle(&mut rng);
    let removed_keys = keys.split_off(n / 2);
    for (i, &key) in removed_keys.iter().enumerate() {
        let x = tree.search(&key).unwrap();
        assert_eq!(tree.remove(x), key);
        if i % 250 == 0 {
            tree.check_invariants().unwrap();
        }
    }
    tree.check_invariants().unwrap();

    for &key in removed_keys.iter() {
        assert!(tree.search(&key).is_none());
    }
    for &key in keys.iter() {
        assert!(tree.search(&key).is_some());
    }

    keys.sort_unstable();
    assert!(tree.iter().copied().eq(keys.iter().copied()));
}

#[test]
fn with_capacity_preallocates() {
    let mut tree = Bst::with_capacity(64);
    assert!(tree.raw().capacity() >= 64);
    assert!(tree.is_empty());
    tree.insert_key(1);
    assert_eq!(tree.height(), 1);
}
