use crate::ChampMap;

/// Putting into a snapshot never changes the snapshot.
#[test]
fn put_leaves_original_untouched() {
    let base = ChampMap::new().put(1, 10).put(2, 20);
    let next = base.put(3, 30).put(1, 11);

    assert_eq!(base.len(), 2);
    assert_eq!(base.get(&1), Some(&10));
    assert_eq!(base.get(&3), None);

    assert_eq!(next.len(), 3);
    assert_eq!(next.get(&1), Some(&11));
    assert_eq!(next.get(&3), Some(&30));
}

/// Removing from a snapshot never changes the snapshot.
#[test]
fn remove_leaves_original_untouched() {
    let base = ChampMap::new().put("a", 1).put("b", 2);
    let next = base.remove(&"a");

    assert_eq!(base.len(), 2);
    assert_eq!(base.get(&"a"), Some(&1));
    assert_eq!(next.len(), 1);
    assert_eq!(next.get(&"a"), None);
    assert_eq!(next.get(&"b"), Some(&2));
}

/// Siblings derived from one base do not see each other's edits.
#[test]
fn sibling_versions_diverge() {
    let base: ChampMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    let left = base.put(1000, 1).remove(&5);
    let right = base.put(2000, 2).put(5, 55);

    assert_eq!(left.get(&1000), Some(&1));
    assert_eq!(left.get(&2000), None);
    assert_eq!(left.get(&5), None);
    assert_eq!(right.get(&2000), Some(&2));
    assert_eq!(right.get(&1000), None);
    assert_eq!(right.get(&5), Some(&55));
    assert_eq!(base.get(&5), Some(&5));
    assert_eq!(base.len(), 100);
}

/// Every intermediate version in a chain stays readable.
#[test]
fn version_chain_is_fully_persistent() {
    let mut versions = vec![ChampMap::new()];
    for i in 0_u64..300 {
        let next = versions[versions.len() - 1].put(i, i * 2);
        versions.push(next);
    }
    for (n, map) in versions.iter().enumerate() {
        assert_eq!(map.len(), n);
        for i in 0..n as u64 {
            assert_eq!(map.get(&i), Some(&(i * 2)));
        }
        assert_eq!(map.get(&(n as u64)), None);
    }
}

/// `put_mut` on a clone leaves the other handle alone.
#[test]
fn put_mut_on_clone_is_isolated() {
    let original = ChampMap::new().put(1, "one");
    let mut copy = original.clone();
    copy.put_mut(1, "uno");
    copy.put_mut(2, "dos");

    assert_eq!(original.len(), 1);
    assert_eq!(original.get(&1), Some(&"one"));
    assert_eq!(copy.get(&1), Some(&"uno"));
    assert_eq!(copy.len(), 2);
}

/// Re-putting an equal value returns the identical root.
#[test]
fn equal_value_put_is_identity() {
    let map: ChampMap<u32, String> = (0..50).map(|i| (i, i.to_string())).collect();
    let same = map.put(17, String::from("17"));
    assert!(same.ptr_eq(&map));
    assert_eq!(same.len(), map.len());
}

/// Removing an absent key returns the identical root.
#[test]
fn absent_remove_is_identity() {
    let map: ChampMap<u32, u32> = (0..50).map(|i| (i, i)).collect();
    assert!(map.remove(&999).ptr_eq(&map));
}

/// A changed value yields a distinct root.
#[test]
fn different_value_put_is_new_root() {
    let map = ChampMap::new().put(1, 1);
    let changed = map.put(1, 2);
    assert!(!changed.ptr_eq(&map));
    assert_ne!(changed, map);
}
