extern crate quickcheck;
use proptest::prelude::*;
use quickcheck::quickcheck;
use sorted_map::SortedMap;
use std::collections::{BTreeMap as StdMap, HashMap};

mod common;
use common::*;

// Sorted dump of the reference map, for comparison with traversals.
fn sorted_dump(reference: &HashMap<u16, u16>) -> Vec<(u16, u16)> {
    let mut dump: Vec<_> = reference.iter().map(|(&k, &v)| (k, v)).collect();
    dump.sort();
    dump
}

fn owned_entries(m: &SortedMap<u16, u16>) -> Vec<(u16, u16)> {
    m.entries().into_iter().map(|(&k, &v)| (k, v)).collect()
}

fn check_against_reference(ops: Vec<Op>) {
    let mut m = SortedMap::new();
    let mut reference = HashMap::new();

    for (i, op) in ops.into_iter().enumerate() {
        match op {
            Op::Get(k) => assert_eq!(m.get(&k), reference.get(&k)),
            Op::Set(k, v) => assert_eq!(m.set(k, v), reference.insert(k, v)),
            Op::Delete(k) => assert_eq!(m.delete(&k), reference.remove(&k)),
        }

        assert_eq!(m.len(), reference.len());
        if i % 64 == 0 {
            assert_eq!(owned_entries(&m), sorted_dump(&reference));
            m.check().unwrap();
        }
    }

    assert_eq!(owned_entries(&m), sorted_dump(&reference));
    assert_eq_iters(m.stream(), m.entries().into_iter());
    m.check().unwrap();
}

#[test]
fn doubled_values_come_back_sorted() {
    let data = [10, 1, 2, 7, 5, 12, 11, 15, 4];
    let mut m = SortedMap::new();
    for k in data {
        m.set(k, k * 2);
    }

    let actual: Vec<_> =
        m.entries().into_iter().map(|(&k, &v)| (k, v)).collect();
    let mut expected: Vec<_> = data.iter().map(|&k| (k, k * 2)).collect();
    expected.sort();

    assert_eq!(actual, expected);
    assert_eq!(
        actual.iter().map(|e| e.0).collect::<Vec<_>>(),
        [1, 2, 4, 5, 7, 10, 11, 12, 15]
    );
    assert_eq_iters(m.stream(), m.entries().into_iter());
}

#[test]
fn set_then_get() {
    let mut m = SortedMap::new();
    m.set(1, "hello world");
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&1), Some(&"hello world"));
}

#[test]
fn update_keeps_len() {
    let mut m = SortedMap::new();
    m.set(1, "initial");
    m.set(1, "updated");
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&1), Some(&"updated"));
}

#[test]
fn get_each_of_sixteen() {
    let m: SortedMap<_, _> = (0..16).map(|i| (i, i)).collect();
    assert_eq!(m.len(), 16);
    for i in 0..16 {
        assert_eq!(m.get(&i), Some(&i));
    }
}

#[test]
fn delete_every_second() {
    let mut m: SortedMap<_, _> = (0..16).map(|i| (i, i)).collect();
    for i in 0..8 {
        assert_eq!(m.delete(&(i * 2)), Some(i * 2));
    }

    assert_eq!(m.len(), 8);
    for i in 0..8 {
        assert_eq!(m.get(&(2 * i)), None);
    }
    assert!(m.keys().copied().eq((0..16).filter(|i| i % 2 == 1)));
    m.check().unwrap();
}

#[test]
fn custom_comparator_on_strings() {
    // case-insensitive keys: "B" and "b" are the same key
    let mut m = SortedMap::with_comparator(|a: &String, b: &String| {
        a.to_lowercase().cmp(&b.to_lowercase())
    });
    m.set("b".to_string(), 1);
    m.set("A".to_string(), 2);
    assert_eq!(m.set("B".to_string(), 3), Some(1));

    assert_eq!(m.len(), 2);
    assert_eq!(m.get(&"a".to_string()), Some(&2));
    assert_eq!(m.keys().cloned().collect::<Vec<_>>(), ["A", "b"]);
    m.check().unwrap();
}

#[test]
fn sequential_inserts_stay_shallow() {
    // 2^12 - 1 ascending keys must not degrade into a list
    let mut m = SortedMap::new();
    for k in 0..4095u32 {
        m.set(k, ());
    }
    m.check().unwrap();
    for k in (0..4095u32).step_by(3) {
        m.delete(&k);
    }
    m.check().unwrap();
    assert_eq!(m.len(), 4095 - 1365);
}

quickcheck! {
    fn qc_set_get_round_trip(xs: Vec<(u8, u32)>) -> () {
        let mut m = SortedMap::new();
        for (k, v) in xs {
            m.set(k, v);
            assert_eq!(m.get(&k), Some(&v));
        }
    }

    fn qc_delete_removes_exactly_one(xs: Vec<(u8, u32)>, k: u8, v: u32) -> () {
        let mut m: SortedMap<_, _> =
            xs.into_iter().filter(|e| e.0 != k).collect();
        let before = m.len();
        m.set(k, v);
        assert_eq!(m.len(), before + 1);
        assert_eq!(m.delete(&k), Some(v));
        assert_eq!(m.get(&k), None);
        assert_eq!(m.len(), before);
    }

    fn qc_delete_absent_is_noop(xs: Vec<(u8, u32)>, k: u8) -> () {
        let mut m: SortedMap<_, _> =
            xs.into_iter().filter(|e| e.0 != k).collect();
        let before = m.clone();
        assert_eq!(m.delete(&k), None);
        assert_eq!(m, before);
        m.check().unwrap();
    }

    fn qc_cmp_with_btree(xs: Vec<(u8, u32)>) -> () {
        let mut btree = StdMap::new();
        let mut m = SortedMap::new();

        for (k, v) in xs.iter() {
            assert_eq!(btree.len(), m.len());
            assert_eq!(btree.insert(*k, *v), m.set(*k, *v));
            assert!(btree.iter().eq(m.stream()));
        }

        assert_eq!(m.first_key_value(), btree.first_key_value());
        assert_eq!(m.last_key_value(), btree.last_key_value());
    }
}

proptest! {
    #[test]
    fn test_reference_model(session in ops(4096)) {
        check_against_reference(session);
    }

    #[test]
    fn test_strings_sorted(v in string_u16_pairs()) {
        let m: SortedMap<_, _> = v.clone().into_iter().collect();
        let std_map: StdMap<_, _> = v.into_iter().collect();
        assert_eq_iters(m.stream(), std_map.iter());
        m.check().unwrap();
    }

    #[test]
    fn test_into_iter(v in small_int_pairs()) {
        let m: SortedMap<_, _> = v.clone().into_iter().collect();
        let std_map: StdMap<_, _> = v.into_iter().collect();
        assert_eq_iters(m.into_iter(), std_map.into_iter());
    }
}
