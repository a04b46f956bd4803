use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Small key space so that hits, overwrites and removals of present keys are common.
fn key_strategy() -> impl Strategy<Value = u16> {
    0u16..96
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Put(#[proptest(strategy = "key_strategy()")] u16, u64),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "key_strategy()")] u16),
    #[proptest(weight = 2)]
    Get(#[proptest(strategy = "key_strategy()")] u16),
    #[proptest(weight = 1)]
    Contains(#[proptest(strategy = "key_strategy()")] u16),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=600)
}

/// Pre-order (id, key, left id, right id), enough to detect any link change.
fn snapshot<K: Copy, V>(t: &BubbleTree<K, V>) -> Vec<(NodeId, K, Option<NodeId>, Option<NodeId>)> {
    let mut out = Vec::new();
    let mut stack: Vec<_> = t.root_node().into_iter().collect();
    while let Some(n) = stack.pop() {
        out.push((n.id(), *n.key(), n.left().map(|c| c.id()), n.right().map(|c| c.id())));
        stack.extend(n.right());
        stack.extend(n.left());
    }
    out
}

fn in_order<K: Copy, V: Copy>(t: &BubbleTree<K, V>) -> Vec<(K, V)> {
    let mut out = Vec::new();
    let mut stack = Vec::new();
    let mut cur = t.root_node();
    while cur.is_some() || !stack.is_empty() {
        while let Some(n) = cur {
            stack.push(n);
            cur = n.left();
        }
        if let Some(n) = stack.pop() {
            out.push((*n.key(), *n.value()));
            cur = n.right();
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(ops in ops_strategy()) {
        let mut t: BubbleTree<u16, u64> = BubbleTree::new();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in ops {
            let len_before = t.len();
            match op {
                Op::Put(key, value) => {
                    let existed = m.contains_key(&key);
                    let old_t = t.put(key, value);
                    let old_m = m.insert(key, value);
                    prop_assert_eq!(old_t, old_m);
                    prop_assert_eq!(t.root_key(), Some(&key));
                    prop_assert_eq!(t.len(), if existed { len_before } else { len_before + 1 });
                    prop_assert_eq!(t.get(&key).copied(), Some(value));
                }
                Op::Remove(key) => {
                    let existed = m.contains_key(&key);
                    let old_t = t.remove(&key);
                    let old_m = m.remove(&key);
                    prop_assert_eq!(old_t, old_m);
                    prop_assert_eq!(t.len(), if existed { len_before - 1 } else { len_before });
                    prop_assert_eq!(t.peek(&key), None);
                }
                Op::Get(key) => {
                    let got_t = t.get(&key).copied();
                    let got_m = m.get(&key).copied();
                    prop_assert_eq!(got_t, got_m);
                    if got_m.is_some() {
                        prop_assert_eq!(t.root_key(), Some(&key));
                    }
                }
                Op::Contains(key) => {
                    prop_assert_eq!(t.contains(&key), m.contains_key(&key));
                }
            }

            prop_assert_eq!(t.len(), m.len());
            prop_assert_eq!(t.is_empty(), t.len() == 0);
            prop_assert_eq!(t.validate(), Ok(()));
        }

        let got = in_order(&t);
        let expected: Vec<(u16, u64)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_misses_leave_tree_untouched(
        keys in prop::collection::vec(key_strategy(), 0..=200),
        probes in prop::collection::vec(key_strategy(), 1..=50),
    ) {
        let mut t: BubbleTree<u16, ()> = keys.iter().map(|&k| (k, ())).collect();
        for probe in probes {
            if t.peek(&probe).is_some() {
                continue;
            }
            let before = snapshot(&t);
            let height = t.height();
            prop_assert_eq!(t.get(&probe), None);
            prop_assert!(!t.contains(&probe));
            prop_assert_eq!(t.remove(&probe), None);
            prop_assert_eq!(snapshot(&t), before);
            prop_assert_eq!(t.height(), height);
        }
    }

    #[test]
    fn prop_two_child_removal_keeps_order(
        keys in prop::collection::btree_set(key_strategy(), 3..=40),
        pick in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<u16> = keys.into_iter().collect();
        // Any key with a smaller and a larger neighbour has two children once
        // it sits at the root.
        let inner = &keys[1..keys.len() - 1];
        let target = inner[pick.index(inner.len())];

        let mut t: BubbleTree<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        prop_assert!(t.contains(&target));
        let root = t.root_node().unwrap();
        prop_assert!(root.left().is_some() && root.right().is_some());

        let mut expected = in_order(&t);
        expected.retain(|&(k, _)| k != target);
        prop_assert_eq!(t.remove(&target), Some(target));
        prop_assert_eq!(in_order(&t), expected);
        prop_assert!(t.keeps_invariant());
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [u8; 6] = [4, 1, 6, 0, 3, 5];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t: BubbleTree<u8, u64> = BubbleTree::new();
        let mut m: BTreeMap<u8, u64> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u64;
            assert_eq!(t.put(k, v), m.insert(k, v));
            assert_eq!(t.root_key(), Some(&k));
            assert!(t.keeps_invariant());
        }

        let expected: Vec<(u8, u64)> = m.into_iter().collect();
        assert_eq!(in_order(&t), expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let mut base_tree: BubbleTree<u8, u64> = BubbleTree::new();
    let mut base_map: BTreeMap<u8, u64> = BTreeMap::new();
    for (i, &k) in SMALL_SET.iter().enumerate() {
        let v = i as u64;
        assert_eq!(base_tree.put(k, v), base_map.insert(k, v));
    }

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base_tree.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.remove(&k), m.remove(&k));
            assert_eq!(t.len(), m.len());
            assert_eq!(t.validate(), Ok(()));
            let expected: Vec<(u8, u64)> = m.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(in_order(&t), expected);
        }
        assert_eq!(t.len(), 0);
        assert!(t.root.is_none());
    });
}

#[test]
fn exhaustive_lookup_order_small_set() {
    let base: BubbleTree<u8, u64> = SMALL_SET.iter().map(|&k| (k, u64::from(k))).collect();

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base.clone();
        for k in perm {
            assert_eq!(t.get(&k), Some(&u64::from(k)));
            assert_eq!(t.root_key(), Some(&k));
            assert_eq!(t.len(), SMALL_SET.len());
            assert!(t.keeps_invariant());
        }
    });
}
