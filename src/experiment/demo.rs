//! Scripted walkthroughs of [`Bst`] and [`OsTree`] on the eleven-key sample
//! tree, printed as plain text. The order-statistic walkthrough checks each
//! answer against the sorted keys and marks it.

use std::{fmt::Display, io::Write};

use rand::Rng;

use crate::{
    shuffle::{sequence, ShuffleMethod},
    tree_base::SearchTree,
    Bst, OsTree,
};

/// Keys of the sample tree, in insertion order.
pub const SAMPLE_KEYS: [i32; 11] = [15, 6, 18, 3, 7, 17, 20, 2, 4, 13, 9];

const SHUFFLED_KEYS: usize = 20;
const SHOWN_KEYS: usize = 10;
const RANDOM_DELETES: usize = 5;

fn joined<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn sized_inorder(tree: &OsTree<i32>) -> String {
    joined(
        tree.node_ids()
            .map(|x| format!("{}(size={})", tree.key(x), tree.size_of(Some(x)))),
    )
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

/// Builds the sample tree, queries it, deletes key 6, then shuffles 20 keys
/// with every method and deletes five of them again from a tree built with
/// `RANDOMIZE-IN-PLACE` input.
pub fn bst_demo<W: Write, R: Rng + ?Sized>(out: &mut W, rng: &mut R) -> std::io::Result<()> {
    writeln!(out, "=== Basic BST operations ===")?;
    let mut tree: Bst<i32> = Bst::new();
    for key in SAMPLE_KEYS {
        tree.insert_key(key);
    }
    writeln!(out, "Inserted keys: {}", joined(SAMPLE_KEYS))?;
    writeln!(out, "Inorder traversal: {}", joined(tree.iter()))?;
    writeln!(out, "Tree height: {}", tree.height())?;
    let found = if tree.search(&7).is_some() { "found" } else { "not found" };
    writeln!(out, "Search for 7: {}", found)?;
    if let Some(root) = tree.root() {
        writeln!(out, "Minimum: {}", tree.key(tree.min(root)))?;
        writeln!(out, "Maximum: {}", tree.key(tree.max(root)))?;
    }
    if let Some(succ) = tree.search(&6).and_then(|six| tree.successor(six)) {
        writeln!(out, "Successor of 6: {}", tree.key(succ))?;
    }
    if let Some(six) = tree.search(&6) {
        tree.remove(six);
        writeln!(out, "Deleted 6")?;
    }
    writeln!(out, "Inorder after deletion: {}", joined(tree.iter()))?;
    tree.destroy(|_| {});

    writeln!(out)?;
    writeln!(out, "=== Shuffle methods ({} keys) ===", SHUFFLED_KEYS)?;
    let mut randomized = Vec::new();
    for method in ShuffleMethod::ALL {
        let mut keys = sequence(SHUFFLED_KEYS);
        method.apply(&mut keys, rng);
        writeln!(out, "{}: {} ...", method, joined(&keys[..SHOWN_KEYS]))?;
        if method == ShuffleMethod::RandomizeInPlace {
            randomized = keys;
        }
    }

    let mut tree: Bst<i32> = randomized.iter().copied().collect();
    writeln!(
        out,
        "Tree from RandomizeInPlace keys, first {} inorder: {} ...",
        SHOWN_KEYS,
        joined(tree.iter_limited(SHOWN_KEYS))
    )?;
    writeln!(
        out,
        "Tree height: {} (about {:.1} expected for a random tree)",
        tree.height(),
        2.0 * (SHUFFLED_KEYS as f64).log2()
    )?;
    for key in randomized.iter().take(RANDOM_DELETES) {
        if let Some(x) = tree.search(key) {
            tree.remove(x);
            writeln!(out, "Deleted {}", key)?;
        }
    }
    writeln!(
        out,
        "After deletions, first {} inorder: {} ...",
        SHOWN_KEYS,
        joined(tree.iter_limited(SHOWN_KEYS))
    )?;
    Ok(())
}

/// Builds the sample order-statistic tree and prints select, rank and size
/// checks before and after deleting key 6. Returns whether every check held.
pub fn os_demo<W: Write>(out: &mut W) -> std::io::Result<bool> {
    let mut sorted = SAMPLE_KEYS;
    sorted.sort_unstable();
    let n = SAMPLE_KEYS.len();
    let mut all_ok = true;

    let mut tree: OsTree<i32> = OsTree::new();
    let ids: Vec<_> = SAMPLE_KEYS.iter().map(|&key| tree.insert_key(key)).collect();
    writeln!(out, "=== Order-statistic tree ===")?;
    writeln!(out, "Inorder (key and size): {}", sized_inorder(&tree))?;

    writeln!(out)?;
    writeln!(out, "{:<10} {:<10} {:<10}", "i", "expected", "select(i)")?;
    for (i, expected) in (1..=n).zip(sorted) {
        let got = tree.select_key(i).copied();
        let ok = got == Some(expected);
        all_ok &= ok;
        let shown = got.map_or_else(|| "-".to_string(), |key| key.to_string());
        writeln!(out, "{:<10} {:<10} {:<10} {}", i, expected, shown, mark(ok))?;
    }

    writeln!(out)?;
    writeln!(out, "{:<10} {:<10} {:<10}", "key", "expected", "rank")?;
    for (&key, &x) in SAMPLE_KEYS.iter().zip(&ids) {
        let expected = sorted.iter().position(|&k| k == key).map_or(0, |p| p + 1);
        let rank = tree.rank(x);
        let ok = rank == expected;
        all_ok &= ok;
        writeln!(out, "{:<10} {:<10} {:<10} {}", key, expected, rank, mark(ok))?;
    }

    writeln!(out)?;
    let root_size = tree.size_of(tree.root());
    let ok = root_size == n;
    all_ok &= ok;
    writeln!(out, "Root size {} (expected {}) {}", root_size, n, mark(ok))?;

    if let Some(six) = tree.search(&6) {
        tree.remove(six);
    }
    writeln!(out, "Deleted 6")?;
    writeln!(out, "Inorder (key and size): {}", sized_inorder(&tree))?;
    let root_size = tree.size_of(tree.root());
    let ok = root_size == n - 1;
    all_ok &= ok;
    writeln!(out, "Root size {} (expected {}) {}", root_size, n - 1, mark(ok))?;

    let fifth = tree.select_key(5).copied();
    let ok = fifth == Some(9);
    all_ok &= ok;
    let shown = fifth.map_or_else(|| "-".to_string(), |key| key.to_string());
    writeln!(out, "select(5) after deletion = {} (expected 9) {}", shown, mark(ok))?;
    Ok(all_ok)
}
