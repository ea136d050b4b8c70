//! Integration tests for the `line_pool` package.
//!
//! These tests exercise the public API of `LinePool` and `SyncLinePool` against the
//! behavioral guarantees of the pool: round trips, occupancy bookkeeping, full-line
//! rejection, slot reuse, constant size reporting, geometry validation and the
//! allocation order within a line.

use std::collections::HashSet;

use line_pool::{Error, Handle, LinePool, OCCUPANCY_WORD_BITS, SyncLinePool};

/// A 24-byte value without internal pointers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Object {
    a: u64,
    b: u64,
    c: u64,
}

impl Object {
    const fn new(a: u64, b: u64, c: u64) -> Self {
        Self { a, b, c }
    }
}

fn four_by_sixty_four() -> LinePool<Object> {
    LinePool::builder()
        .lines(4, 64)
        .build(Object::default())
        .unwrap()
}

#[test]
fn round_trip_returns_inserted_value() {
    let mut pool = four_by_sixty_four();

    for line in 0..4 {
        for i in 0..10 {
            let value = Object::new(line, i, 0xFFFF_FFFF);
            let handle = pool.insert(value, usize::try_from(line).unwrap()).unwrap();

            let stored = pool.get(handle).unwrap();
            assert_eq!(stored, value);
            assert_eq!((stored.a, stored.b, stored.c), (line, i, 0xFFFF_FFFF));
        }
    }
}

#[test]
fn occupancy_matches_live_handles() {
    let mut pool = four_by_sixty_four();
    let mut live: Vec<Handle> = Vec::new();

    // A fixed pseudo-random walk of inserts and removes on line 2.
    let mut state: u32 = 12345;

    for step in 0..1000_u64 {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);

        let want_insert = live.is_empty() || (state >> 16) % 3 != 0;

        if want_insert {
            match pool.insert(Object::new(step, 0, 0), 2) {
                Ok(handle) => live.push(handle),
                Err(Error::LineFull { line: 2 }) => assert_eq!(live.len(), 64),
                Err(other) => panic!("unexpected error: {other}"),
            }
        } else {
            let victim = (state as usize) % live.len();
            let handle = live.swap_remove(victim);
            pool.remove(handle).unwrap();
        }

        assert_eq!(pool.line_len(2).unwrap(), live.len());
        assert_eq!(pool.len(), live.len());
    }

    for handle in &live {
        assert!(pool.contains(*handle));
    }
}

#[test]
fn full_line_rejects_insert_and_keeps_state() {
    let mut pool = four_by_sixty_four();

    let handles = (0..64)
        .map(|i| pool.insert(Object::new(i, i, i), 1).unwrap())
        .collect::<Vec<_>>();

    let result = pool.insert(Object::new(999, 999, 999), 1);
    assert!(matches!(result, Err(Error::LineFull { line: 1 })));

    assert_eq!(pool.line_len(1).unwrap(), 64);

    for (i, handle) in (0..64).zip(&handles) {
        assert_eq!(pool.get(*handle).unwrap(), Object::new(i, i, i));
    }
}

#[test]
fn removed_slot_is_reused_by_next_insert() {
    let mut pool = four_by_sixty_four();

    let handles = (0..10)
        .map(|i| pool.insert(Object::new(i, 0, 0), 0).unwrap())
        .collect::<Vec<_>>();

    let removed = *handles.get(4).unwrap();
    pool.remove(removed).unwrap();

    let reused = pool.insert(Object::new(100, 0, 0), 0).unwrap();

    assert_eq!(reused, removed);
    assert_eq!(pool.get(reused).unwrap(), Object::new(100, 0, 0));
}

#[test]
fn removed_slot_in_full_line_makes_room() {
    let mut pool = four_by_sixty_four();

    let handles = (0..64)
        .map(|i| pool.insert(Object::new(i, 0, 0), 3).unwrap())
        .collect::<Vec<_>>();

    let removed = *handles.get(37).unwrap();
    pool.remove(removed).unwrap();

    assert!(!pool.is_line_full(3).unwrap());

    let reused = pool.insert(Object::new(7, 7, 7), 3).unwrap();
    assert_eq!(reused.entry(), 37);
    assert!(pool.is_line_full(3).unwrap());
}

#[test]
fn reserved_bytes_is_constant() {
    let mut pool = four_by_sixty_four();

    assert_eq!(pool.reserved_bytes(), 24 * 256);
    assert_eq!(pool.reserved_bytes(), 6144);

    let mut handles = Vec::new();

    for i in 0..64 {
        for line in 0..4 {
            handles.push(pool.insert(Object::new(i, 0, 0), line).unwrap());
        }

        assert_eq!(pool.reserved_bytes(), 6144);
    }

    for handle in handles.into_iter().rev() {
        pool.remove(handle).unwrap();
        assert_eq!(pool.reserved_bytes(), 6144);
    }
}

#[test]
fn construction_rejects_capacity_of_63() {
    let result = LinePool::new(Object::default(), &[64, 64, 63, 64]);

    match result {
        Err(Error::InvalidLineCapacity { line, capacity }) => {
            assert_eq!(line, 2);
            assert_eq!(capacity, 63);
        }
        other => panic!("expected InvalidLineCapacity, got {other:?}"),
    }
}

#[test]
fn construction_error_message_names_line_and_value() {
    let error = LinePool::new(Object::default(), &[63]).unwrap_err();

    let message = error.to_string();
    assert!(message.contains("line 0"), "{message}");
    assert!(message.contains("63"), "{message}");
}

#[test]
fn construction_with_multiples_matches_request() {
    let capacities = [64, 128, 256, 64];
    let pool = LinePool::new(Object::default(), &capacities).unwrap();

    assert_eq!(pool.line_count(), capacities.len());

    for (line, &capacity) in capacities.iter().enumerate() {
        assert_eq!(pool.line_capacity(line).unwrap(), capacity);
        assert_eq!(pool.line_len(line).unwrap(), 0);
    }

    assert_eq!(pool.capacity(), 512);
}

#[test]
fn allocation_order_is_lowest_index_first() {
    let run = || {
        let mut pool = LinePool::new(0_u32, &[3 * OCCUPANCY_WORD_BITS]).unwrap();

        (0..150)
            .map(|value| pool.insert(value, 0).unwrap().entry())
            .collect::<Vec<_>>()
    };

    let first = run();
    let second = run();

    assert_eq!(first, (0..150).collect::<Vec<_>>());
    assert_eq!(first, second);
}

#[test]
fn non_contiguous_holes_are_filled_lowest_first() {
    let mut pool = LinePool::new(0_u32, &[128]).unwrap();

    let handles = (0..128)
        .map(|value| pool.insert(value, 0).unwrap())
        .collect::<Vec<_>>();

    for entry in [90, 3, 64, 63] {
        pool.remove(*handles.get(entry).unwrap()).unwrap();
    }

    let refilled = (0..4)
        .map(|value| pool.insert(value, 0).unwrap().entry())
        .collect::<Vec<_>>();

    assert_eq!(refilled, vec![3, 63, 64, 90]);
    assert!(matches!(pool.insert(0, 0), Err(Error::LineFull { line: 0 })));
}

#[test]
fn lines_are_independent() {
    let mut pool = LinePool::new(0_u8, &[64, 64]).unwrap();

    for _ in 0..64 {
        pool.insert(1, 0).unwrap();
    }

    assert!(pool.is_line_full(0).unwrap());
    assert_eq!(pool.line_len(1).unwrap(), 0);

    assert_eq!(pool.insert(2, 1).unwrap().entry(), 0);
    assert_eq!(pool.insert(3, 1).unwrap().entry(), 1);
    assert!(matches!(pool.insert(4, 0), Err(Error::LineFull { line: 0 })));
}

#[test]
fn fill_and_drain_in_reverse_leaves_pool_empty() {
    let mut pool = four_by_sixty_four();
    let object = Object::new(2, 1, 0xFFFF_FFFF);

    for _ in 0..3 {
        let mut handles = Vec::with_capacity(256);

        for _ in 0..64 {
            for line in 0..4 {
                handles.push(pool.insert(object, line).unwrap());
            }
        }

        assert_eq!(pool.len(), 256);
        assert_eq!(handles.iter().collect::<HashSet<_>>().len(), 256);

        for handle in handles.into_iter().rev() {
            pool.remove(handle).unwrap();
        }

        assert!(pool.is_empty());
    }
}

#[test]
fn sync_pool_behaves_like_pool() {
    let pool = SyncLinePool::builder()
        .lines(4, 64)
        .build_sync(Object::default())
        .unwrap();

    assert_eq!(pool.reserved_bytes(), 6144);

    let entries = (0..5)
        .map(|i| pool.insert(Object::new(i, 0, 0), 1).unwrap().entry())
        .collect::<Vec<_>>();
    assert_eq!(entries, vec![0, 1, 2, 3, 4]);

    let extra = pool.insert(Object::default(), 1).unwrap();
    assert_eq!(extra.entry(), 5);
    pool.remove(extra).unwrap();

    assert_eq!(pool.line_len(1).unwrap(), 5);
    assert_eq!(pool.reserved_bytes(), 6144);
}
