use super::{CollidingKey, assert_invariants, same_map_shape};
use crate::ChampMap;

/// Insertion order must not affect the resulting structure.
#[test]
fn insert_order_abc_cba_bca() {
    let orders: [&[(i32, i32)]; 3] = [
        &[(1, 10), (2, 20), (3, 30)],
        &[(3, 30), (2, 20), (1, 10)],
        &[(2, 20), (3, 30), (1, 10)],
    ];

    let maps: Vec<ChampMap<i32, i32>> = orders
        .iter()
        .map(|pairs| {
            let mut m = ChampMap::new();
            for &(k, v) in *pairs {
                m = m.put(k, v);
            }
            m
        })
        .collect();

    assert!(same_map_shape(&maps[0], &maps[1]));
    assert!(same_map_shape(&maps[1], &maps[2]));
    assert_eq!(maps[0], maps[1]);
}

/// Larger set: 1000 entries, three orderings.
#[test]
fn insert_order_1000_entries() {
    let entries: Vec<(u64, u64)> = (0..1000).map(|i| (i, i * 7)).collect();

    let mut forward = ChampMap::new();
    for &(k, v) in &entries {
        forward = forward.put(k, v);
    }

    let mut backward = ChampMap::new();
    for &(k, v) in entries.iter().rev() {
        backward = backward.put(k, v);
    }

    let mut interleaved = ChampMap::new();
    for &(k, v) in entries.iter().step_by(2) {
        interleaved = interleaved.put(k, v);
    }
    for &(k, v) in entries.iter().skip(1).step_by(2) {
        interleaved = interleaved.put(k, v);
    }

    assert!(same_map_shape(&forward, &backward));
    assert!(same_map_shape(&forward, &interleaved));
    assert_eq!(forward.len(), 1000);
}

/// After overwrite, order independence still holds.
#[test]
fn overwrite_preserves_canonicity() {
    let map_a = ChampMap::new().put(1, 10).put(2, 20).put(1, 11);
    let map_b = ChampMap::new().put(2, 20).put(1, 11);

    assert!(same_map_shape(&map_a, &map_b));
    assert_eq!(map_a, map_b);
}

/// After delete, order independence holds.
#[test]
fn delete_preserves_canonicity() {
    let map_a = ChampMap::new().put(1, 10).put(2, 20).put(3, 30).remove(&2);
    let map_b = ChampMap::new().put(3, 30).put(1, 10);

    assert!(same_map_shape(&map_a, &map_b));
    assert_eq!(map_a, map_b);
}

/// Removing half of a large map yields the trie built from the other half.
#[test]
fn bulk_delete_matches_fresh_build() {
    let full: ChampMap<u64, u64> = (0..2000).map(|i| (i, i)).collect();
    let mut pruned = full.clone();
    for i in (0..2000).filter(|i| i % 3 != 0) {
        pruned = pruned.remove(&i);
    }
    let fresh: ChampMap<u64, u64> = (0..2000).filter(|i| i % 3 == 0).map(|i| (i, i)).collect();

    assert!(same_map_shape(&pruned, &fresh));
    assert_invariants(&pruned);
}

/// Collision buckets compare as sets, so their order may differ.
#[test]
fn colliding_keys_in_any_order() {
    let keys: Vec<CollidingKey> = (0..4).map(|i| CollidingKey::new(i, 0x4242)).collect();

    let mut forward = ChampMap::new();
    for k in &keys {
        forward = forward.put(k.clone(), k.id);
    }
    let mut backward = ChampMap::new();
    for k in keys.iter().rev() {
        backward = backward.put(k.clone(), k.id);
    }

    assert!(same_map_shape(&forward, &backward));
    assert_eq!(forward, backward);
}
