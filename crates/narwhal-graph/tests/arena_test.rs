use narwhal_graph::{Arena, NodeId};

#[test]
fn push_assigns_dense_ids_in_order() {
    let mut arena: Arena<NodeId, &'static str> = Arena::new();
    let a = arena.push("a");
    let b = arena.push("b");
    let c = arena.push("c");
    assert_eq!(a, NodeId(0));
    assert_eq!(b, NodeId(1));
    assert_eq!(c, NodeId(2));
    assert_eq!(arena.len(), 3);
}

#[test]
fn index_and_index_mut_round_trip() {
    let mut arena: Arena<NodeId, i32> = Arena::new();
    let id = arena.push(10);
    arena[id] += 5;
    assert_eq!(arena[id], 15);
}

#[test]
fn empty_arena_has_zero_len() {
    let arena: Arena<NodeId, i32> = Arena::new();
    assert!(arena.is_empty());
    assert_eq!(arena.len(), 0);
}
