use avl_bst::{equal_paths, AvlTreeMap, KeyError, TreeNode};

fn main() -> Result<(), KeyError> {
    env_logger::init();

    let mut map = AvlTreeMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "two");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.get(&1), Some(&"one"));
    map.remove(&1);
    assert!(map.get(&1).is_none());

    println!("{} entries, height {}", map.len(), map.height());
    println!("smallest: {:?}", map.first_key_value());
    println!("largest: {:?}", map.last_key_value());
    println!("at 3: {}", map.at(&3)?);
    if let Err(err) = map.at(&1) {
        println!("at 1: {}", err);
    }

    let tree = TreeNode::new('a')
        .with_left(TreeNode::new('b'))
        .with_right(TreeNode::new('c').with_left(TreeNode::new('d')));
    println!("equal leaf depths: {}", equal_paths(Some(&tree)));
    Ok(())
}
