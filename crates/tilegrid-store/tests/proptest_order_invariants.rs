//! Property and fuzz-style invariants for orders and the board.
//!
//! Random operation streams run against [`OrderStore`] through
//! [`SharedStore::update`]; after every step the published board must
//! validate, and a failed step must leave the published snapshot untouched.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use tilegrid_store::{
    ContainerId, Item, ItemId, NestingLimitPolicy, Order, OrderStore, SharedStore, StoreError,
};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % (bound as u64 + 1)) as usize
    }
}

fn distinct_order() -> impl Strategy<Value = Order> {
    prop::collection::btree_set(0u64..1000, 1..24)
        .prop_map(|ids| ids.into_iter().map(ItemId).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(Order::from)
}

fn sorted(order: &Order) -> Vec<ItemId> {
    let mut ids: Vec<ItemId> = order.iter().collect();
    ids.sort();
    ids
}

fn all_ids(board: &OrderStore) -> Vec<ItemId> {
    let mut ids = Vec::new();
    for item in board.main().items().values() {
        item.walk(&mut |entry| ids.push(entry.id));
    }
    ids.sort();
    ids
}

fn containers(board: &OrderStore) -> Vec<ContainerId> {
    let mut out = vec![ContainerId::Main];
    for item in board.main().items().values() {
        item.walk(&mut |entry| {
            if entry.is_folder() {
                out.push(ContainerId::Folder(entry.id));
            }
        });
    }
    out
}

fn random_step(shared: &SharedStore, rng: &mut Lcg) -> Result<(), StoreError> {
    let snapshot = shared.load();
    let scopes = containers(&snapshot);
    let scope = scopes[rng.choose_index(scopes.len())];
    let order: Vec<ItemId> = snapshot
        .order(scope)
        .map(|o| o.iter().collect())
        .unwrap_or_default();
    let pick = |rng: &mut Lcg| -> ItemId {
        if order.is_empty() {
            ItemId(0)
        } else {
            order[rng.choose_index(order.len())]
        }
    };
    match rng.choose_index(7) {
        0 => {
            let id = pick(rng);
            let index = rng.below(order.len() + 2);
            shared.update(|board| board.move_within(scope, id, index).map(|_| ()))
        }
        1 => {
            let (host, guest) = (pick(rng), pick(rng));
            let policy = NestingLimitPolicy::default();
            shared.update(|board| board.merge_into_folder(scope, host, guest, &policy).map(|_| ()))
        }
        2 => {
            let id = pick(rng);
            shared.update(|board| board.delete_item(scope, id).map(|_| ()))
        }
        3 => shared.update(|board| {
            let id = board.next_item_id()?;
            board.add_to_front(scope, Item::tile(id, "added"))
        }),
        4 => shared.update(|board| board.create_folder(scope, "New Folder").map(|_| ())),
        5 => {
            let id = pick(rng);
            shared.update(|board| board.transfer_to_front(scope, id, ContainerId::Main))
        }
        _ => match order.first() {
            Some(&id) => {
                let result =
                    shared.update(|board| board.add_to_front(ContainerId::Main, Item::tile(id, "dup")));
                assert_eq!(result, Err(StoreError::DuplicateItem(id)));
                result
            }
            None => shared.update(|_| Ok(())),
        },
    }
}

fn run_sequence(seed: u64, steps: usize) -> Arc<SharedStore> {
    let board = OrderStore::from_items((1..=8).map(|id| Item::tile(id, "t")).collect())
        .expect("valid board");
    let shared = Arc::new(SharedStore::new(board).expect("valid store"));
    let mut rng = Lcg::new(seed);
    for _ in 0..steps {
        let before = shared.load();
        match random_step(&shared, &mut rng) {
            Ok(()) => {
                assert_eq!(shared.revision(), before.revision + 1);
            }
            Err(_) => {
                assert!(Arc::ptr_eq(&before, &shared.load()));
            }
        }
        let snapshot = shared.load();
        assert_eq!(snapshot.validate(), Ok(()));
        let ids = all_ids(&snapshot);
        let unique: BTreeSet<ItemId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "ids must stay unique board-wide");
    }
    shared
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn move_within_keeps_permutation_and_lands_at_clamped_index(
        order in distinct_order(),
        pick in 0usize..64,
        index in 0usize..64,
    ) {
        let id = order.get(pick % order.len()).expect("non-empty");
        let mut moved = order.clone();
        let landed = moved.move_within(id, index);
        prop_assert_eq!(landed, Some(index.min(order.len() - 1)));
        prop_assert_eq!(moved.get(index.min(order.len() - 1)), Some(id));
        prop_assert_eq!(sorted(&moved), sorted(&order));
    }

    #[test]
    fn remove_then_reinsert_at_origin_round_trips(order in distinct_order(), pick in 0usize..64) {
        let id = order.get(pick % order.len()).expect("non-empty");
        let mut edited = order.clone();
        let at = edited.remove(id).expect("present");
        prop_assert!(!edited.contains(id));
        edited.insert_at(at, id);
        prop_assert_eq!(edited, order);
    }

    #[test]
    fn move_to_current_index_is_idempotent(order in distinct_order(), pick in 0usize..64) {
        let index = pick % order.len();
        let id = order.get(index).expect("non-empty");
        let mut moved = order.clone();
        moved.move_within(id, index);
        prop_assert_eq!(moved, order);
    }

    #[test]
    fn merge_places_guest_in_exactly_one_container(len in 2u64..12, host_pick in 0u64..12, guest_pick in 0u64..12) {
        let host = ItemId(1 + host_pick % len);
        let guest = ItemId(1 + guest_pick % len);
        prop_assume!(host != guest);
        let mut board = OrderStore::from_items((1..=len).map(|id| Item::tile(id, "t")).collect())
            .expect("valid board");
        board
            .merge_into_folder(ContainerId::Main, host, guest, &NestingLimitPolicy::default())
            .expect("tile onto tile is allowed");
        prop_assert!(!board.main().order().contains(guest));
        prop_assert_eq!(board.locate(guest), Some(ContainerId::Folder(host)));
        prop_assert_eq!(board.main().len() as u64, len - 1);
        prop_assert_eq!(board.validate(), Ok(()));
    }

    #[test]
    fn random_operation_streams_preserve_invariants(seed in any::<u64>(), steps in 1usize..80) {
        run_sequence(seed, steps);
    }

    #[test]
    fn random_operation_streams_replay_deterministically(seed in any::<u64>(), steps in 1usize..60) {
        let first = run_sequence(seed, steps);
        let second = run_sequence(seed, steps);
        let (a, b) = (first.load(), second.load());
        prop_assert_eq!(&*a, &*b);
    }
}

#[test]
fn order_store_fuzz_seed_corpus_preserves_invariants() {
    for seed in [0, 1, 7, 42, 0xDEAD_BEEF, u64::MAX] {
        run_sequence(seed, 200);
    }
}
