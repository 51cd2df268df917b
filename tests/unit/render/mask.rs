use super::*;
use crate::render::surface::Surface;

#[test]
fn ensure_allocates_only_the_requested_level() {
    let mut store = MaskStore::new();
    let level = store.ensure_level(2);
    assert_eq!(level.mask.width(), 1);
    assert_eq!(level.back.height(), 1);

    assert_eq!(store.allocated(), 1);
    assert!(store.level_mut(0).is_none());
    assert!(store.level_mut(1).is_none());
    assert!(store.level_mut(2).is_some());
}

#[test]
fn ensure_twice_reuses_the_pair() {
    let mut store = MaskStore::new();
    store.ensure_level(0).mask.resize(8, 8);
    assert_eq!(store.ensure_level(0).mask.width(), 8);
    assert_eq!(store.allocated(), 1);
}

#[test]
fn take_and_put_roundtrip() {
    let mut store = MaskStore::new();
    let mut pair = store.take_level(1);
    pair.back.resize(16, 16);
    assert_eq!(store.allocated(), 0);

    store.put_level(1, pair);
    assert_eq!(store.allocated(), 1);
    assert_eq!(store.level_mut(1).unwrap().back.width(), 16);
}

#[test]
fn remove_all_is_idempotent() {
    let mut store = MaskStore::new();
    store.remove_all(); // nothing allocated yet

    store.ensure_level(0);
    store.ensure_level(3);
    assert_eq!(store.allocated(), 2);

    store.remove_all();
    assert_eq!(store.allocated(), 0);
    store.remove_all();
    assert_eq!(store.allocated(), 0);
}
