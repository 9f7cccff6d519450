//! Smoke test of the public surface through the prelude.

use std::time::Duration;

use tilegrid::prelude::*;
use tilegrid::{BoardSnapshot, StoreError};
use web_time::Instant;

fn setup() -> Result<Board> {
    let items = (1..=5).map(|id| Item::tile(id, format!("app {id}"))).collect();
    // 390 wide fits three 100px tiles with 8px margins, centred.
    let main = GridGeometry::fit(390.0, 100.0, 100.0, 8.0, 0.0)?;
    let folder = FolderLayout {
        geometry: main,
        container_height: 480.0,
    };
    Ok(Board::new(
        OrderStore::from_items(items)?,
        main,
        folder,
        EngineConfig::default(),
    )?)
}

#[test]
fn fitted_grid_reorders_through_the_facade() -> Result<()> {
    let mut board = setup()?;
    let geometry = *board.main().geometry();
    assert_eq!(geometry.columns_per_row, 3);
    assert_eq!(geometry.offset_x, 21.0);

    let t0 = Instant::now();
    let start = geometry.position_of(0).center();
    let end = geometry.position_of(4).center();
    board.process_main(&PointerEvent::down(7, start, t0));
    board.tick(t0 + Duration::from_millis(300));
    board.process_main(&PointerEvent::moved(7, end, t0 + Duration::from_millis(320)));
    let events = board.process_main(&PointerEvent::up(7, end, t0 + Duration::from_millis(340)));

    assert!(events.contains(&GridEvent::ScrollLock(false)));
    let expected: Order = [2, 3, 4, 5, 1].into_iter().map(ItemId).collect();
    assert_eq!(board.main().order(), expected);
    Ok(())
}

#[test]
fn errors_convert_into_the_facade_error() {
    let bad = GridGeometry::new(0.0, 100.0, 8.0, 3, 0.0, 0.0).map_err(Error::from);
    assert!(matches!(bad, Err(Error::Layout(_))));

    let board = setup().expect("board");
    let missing: Result<()> = board.rename(ItemId(42), "x").map_err(Error::from);
    assert!(matches!(
        missing,
        Err(Error::Store(StoreError::UnknownItem(ItemId(42))))
    ));
}

#[test]
fn snapshots_survive_json() {
    let board = setup().expect("board");
    board.create_folder().expect("folder");
    let snapshot = board.snapshot();
    let json = serde_json::to_string(&*snapshot).expect("serialize");
    let back: BoardSnapshot = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, *snapshot);
    assert!(back.validate().is_ok());
}
