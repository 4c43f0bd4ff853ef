use ordered_collections::avl_tree::AvlMap;
use rand::Rng;
use std::collections::BTreeMap;

#[test]
fn int_test_avl_map() {
    let mut rng = rand::thread_rng();
    let mut map = AvlMap::new();
    let mut expected = BTreeMap::new();

    for _ in 0..10_000 {
        let key: u32 = rng.gen_range(0, 1024);
        if rng.gen_range(0, 3) > 0 {
            let value: u32 = rng.gen();
            assert_eq!(map.insert(key, value), expected.insert(key, value).is_none());
        } else {
            assert_eq!(map.remove(&key), expected.remove(&key).map(|value| (key, value)));
        }

        assert_eq!(map.len(), expected.len());
        assert_eq!(map.is_empty(), expected.is_empty());
        assert_eq!(map.min(), expected.keys().next());
        assert_eq!(map.max(), expected.keys().next_back());

        let height = map.height() as f64;
        let bound = 1.4405 * ((map.len() + 2) as f64).log2();
        assert!(height <= bound);
    }

    for (key, value) in &expected {
        assert_eq!(map.get(key), Some(value));
        assert_eq!(map.at(key), Ok(value));
        assert_eq!(map.find(key).current(), Some((key, value)));
    }

    let forward: Vec<(u32, u32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
    let mut backward: Vec<(u32, u32)> = map.iter().rev().map(|(key, value)| (*key, *value)).collect();
    backward.reverse();
    let reference: Vec<(u32, u32)> = expected.iter().map(|(key, value)| (*key, *value)).collect();
    assert_eq!(forward, reference);
    assert_eq!(backward, reference);

    let mut visited = Vec::new();
    map.traverse_ascending(|key, value| visited.push((*key, *value)));
    assert_eq!(visited, reference);

    let mut breadth = Vec::new();
    map.traverse_breadth(|key, _| breadth.push(*key));
    assert_eq!(breadth.len(), map.len());

    assert_eq!(map.into_iter().collect::<Vec<(u32, u32)>>(), reference);
}

#[test]
fn int_test_avl_map_cursor_walk() {
    let mut rng = rand::thread_rng();
    let mut map = AvlMap::new();
    let mut expected = BTreeMap::new();

    for _ in 0..512 {
        let key: u32 = rng.gen_range(0, 4096);
        let value: u32 = rng.gen();
        map.insert(key, value);
        expected.insert(key, value);
    }

    let mut cursor = map.cursor();
    cursor.move_next();
    for (key, value) in &expected {
        assert_eq!(cursor.current(), Some((key, value)));
        cursor.move_next();
    }
    assert_eq!(cursor.current(), None);

    for (key, value) in expected.iter().rev() {
        cursor.move_prev();
        assert_eq!(cursor.current(), Some((key, value)));
    }
}

#[test]
fn int_test_avl_map_clone_and_swap() {
    let mut rng = rand::thread_rng();
    let mut map = AvlMap::new();

    for _ in 0..512 {
        let key: u32 = rng.gen_range(0, 4096);
        map.insert(key, key);
    }

    let cloned = map.clone();
    assert_eq!(map, cloned);

    let mut other = AvlMap::new();
    map.swap(&mut other);
    assert!(map.is_empty());
    assert_eq!(other, cloned);
}
