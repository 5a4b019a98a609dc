use super::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_sorts_ascending() {
    let mut sorter = StreamSorter::new(8);
    for (key, value) in [(5, 'a'), (-3, 'b'), (12, 'c'), (0, 'd')] {
        sorter.push(key, value).expect("room left");
    }
    let out: Vec<_> = sorter.finish().collect();
    assert_eq!(out, [(-3, 'b'), (0, 'd'), (5, 'a'), (12, 'c')]);
    assert!(sorter.is_empty());
}

#[test]
fn test_equal_keys_keep_arrival_order() {
    let mut sorter = StreamSorter::new(8);
    for (i, key) in [2, 1, 2, 1, 2].into_iter().enumerate() {
        sorter.push(key, i).expect("room left");
    }
    let values: Vec<_> = sorter.finish().map(|(_, v)| v).collect();
    assert_eq!(values, [1, 3, 0, 2, 4]);
}

#[test]
fn test_full_sorter_rejects_and_keeps_contents() {
    let mut sorter = StreamSorter::new(2);
    sorter.push(3, ()).expect("room left");
    sorter.push(1, ()).expect("room left");
    assert_eq!(
        sorter.push(0, ()),
        Err(ChessError::SorterFull { capacity: 2 })
    );
    assert_eq!(sorter.len(), 2);
    let keys: Vec<_> = sorter.finish().map(|(k, _)| k).collect();
    assert_eq!(keys, [1, 3]);

    // Reusable after finishing.
    sorter.push(7, ()).expect("room after finish");
    assert_eq!(sorter.len(), 1);
}

#[test]
fn test_zero_capacity() {
    let mut sorter: StreamSorter<i32, ()> = StreamSorter::new(0);
    assert!(sorter.push(1, ()).is_err());
    assert_eq!(sorter.finish().count(), 0);
}

#[test]
fn test_matches_stable_sort_random() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let n = rng.gen_range(0..64);
        let input: Vec<(i32, usize)> = (0..n).map(|i| (rng.gen_range(-20..20), i)).collect();

        let mut sorter = StreamSorter::new(64);
        for &(k, v) in &input {
            sorter.push(k, v).expect("room left");
        }
        let mut expected = input.clone();
        expected.sort_by_key(|&(k, _)| k);
        let got: Vec<_> = sorter.finish().collect();
        assert_eq!(got, expected);
    }
}
