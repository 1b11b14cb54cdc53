use kanban_core::db::{open_db, open_db_in_memory};
use kanban_core::{
    BoardService, Card, CardId, CardPosition, CardStore, ColumnId, DragResult, MoveOutcome,
    SqliteCardStore,
};

fn memory_store() -> SqliteCardStore {
    SqliteCardStore::try_new(open_db_in_memory().unwrap()).unwrap()
}

async fn stored_ids(store: &SqliteCardStore, column: ColumnId) -> Vec<String> {
    store
        .get(column)
        .await
        .unwrap()
        .map(|document| document.cards)
        .unwrap_or_default()
        .into_iter()
        .map(|card| card.id.to_string())
        .collect()
}

#[tokio::test]
async fn hydrate_from_empty_store_gives_empty_board() {
    let service = BoardService::hydrate(memory_store()).await.unwrap();
    assert_eq!(service.board().card_count(), 0);
    assert_eq!(service.board().columns().len(), 3);
}

#[tokio::test]
async fn add_persists_only_target_column() {
    let store = memory_store();
    let mut service = BoardService::hydrate(store.clone()).await.unwrap();

    let added = service
        .add_card(ColumnId::Todo, "write tests")
        .await
        .unwrap();
    assert!(added.is_synced());
    assert_eq!(added.report.results.len(), 1);

    assert_eq!(
        stored_ids(&store, ColumnId::Todo).await,
        vec![added.value.id.to_string()]
    );
    assert!(store.get(ColumnId::Progress).await.unwrap().is_none());
    assert!(store.get(ColumnId::Done).await.unwrap().is_none());
}

#[tokio::test]
async fn cross_column_move_writes_both_columns() {
    let store = memory_store();
    store
        .set(ColumnId::Todo, &[Card::new("1", "A"), Card::new("2", "B")])
        .await
        .unwrap();
    let mut service = BoardService::hydrate(store.clone()).await.unwrap();

    let drag = DragResult::new(
        CardPosition::new(ColumnId::Todo, 0),
        Some(CardPosition::new(ColumnId::Progress, 0)),
    );
    let moved = service.move_card(&drag).await.unwrap();
    assert!(moved.is_synced());
    assert!(matches!(moved.value, MoveOutcome::Moved { .. }));

    assert_eq!(stored_ids(&store, ColumnId::Todo).await, vec!["2"]);
    assert_eq!(stored_ids(&store, ColumnId::Progress).await, vec!["1"]);
}

#[tokio::test]
async fn cancelled_drag_writes_nothing() {
    let store = memory_store();
    store
        .set(ColumnId::Todo, &[Card::new("1", "A")])
        .await
        .unwrap();
    let mut service = BoardService::hydrate(store.clone()).await.unwrap();

    let drag = DragResult::new(CardPosition::new(ColumnId::Todo, 0), None);
    let result = service.move_card(&drag).await.unwrap();
    assert_eq!(result.value, MoveOutcome::Unchanged);
    assert!(result.report.results.is_empty());
    let todo = store.get(ColumnId::Todo).await.unwrap().unwrap();
    assert_eq!(todo.revision, 1);
}

#[tokio::test]
async fn edit_and_delete_rewrite_owning_column_transactionally() {
    let store = memory_store();
    store
        .set(ColumnId::Todo, &[Card::new("1", "A")])
        .await
        .unwrap();
    store
        .set(ColumnId::Done, &[Card::new("2", "B"), Card::new("3", "C")])
        .await
        .unwrap();
    let mut service = BoardService::hydrate(store.clone()).await.unwrap();

    let edited = service
        .edit_card(&CardId::from("3"), "  C revised ")
        .await
        .unwrap();
    assert_eq!(edited.value, ColumnId::Done);
    assert!(edited.is_synced());
    let done = store.get(ColumnId::Done).await.unwrap().unwrap();
    assert_eq!(
        done.cards,
        vec![Card::new("2", "B"), Card::new("3", "C revised")]
    );
    assert_eq!(done.revision, 2);

    let deleted = service.delete_card(&CardId::from("2")).await.unwrap();
    assert!(deleted.is_synced());
    assert_eq!(stored_ids(&store, ColumnId::Done).await, vec!["3"]);
    let todo = store.get(ColumnId::Todo).await.unwrap().unwrap();
    assert_eq!(todo.revision, 1);
}

#[tokio::test]
async fn rejected_actions_leave_board_and_store_alone() {
    let store = memory_store();
    store
        .set(ColumnId::Todo, &[Card::new("1", "A")])
        .await
        .unwrap();
    let mut service = BoardService::hydrate(store.clone()).await.unwrap();
    let before = service.board().clone();

    assert!(service.add_card(ColumnId::Todo, "   ").await.is_err());
    assert!(service.delete_card(&CardId::from("999")).await.is_err());
    let bad_drag = DragResult::new(
        CardPosition::new(ColumnId::Progress, 0),
        Some(CardPosition::new(ColumnId::Todo, 0)),
    );
    assert!(service.move_card(&bad_drag).await.is_err());

    assert_eq!(service.board(), &before);
    let todo = store.get(ColumnId::Todo).await.unwrap().unwrap();
    assert_eq!(todo.revision, 1);
}

#[tokio::test]
async fn board_survives_reopen_of_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let expected = {
        let store = SqliteCardStore::try_new(open_db(&path).unwrap()).unwrap();
        let mut service = BoardService::hydrate(store).await.unwrap();
        service.add_card(ColumnId::Todo, "first").await.unwrap();
        service.add_card(ColumnId::Todo, "second").await.unwrap();
        let third = service
            .add_card(ColumnId::Todo, "third")
            .await
            .unwrap()
            .value;
        let drag = DragResult::new(
            CardPosition::new(ColumnId::Todo, 2),
            Some(CardPosition::new(ColumnId::Done, 0)),
        );
        service.move_card(&drag).await.unwrap();
        service.edit_card(&third.id, "third, done").await.unwrap();
        service.board().clone()
    };

    let store = SqliteCardStore::try_new(open_db(&path).unwrap()).unwrap();
    let reopened = BoardService::hydrate(store).await.unwrap();
    assert_eq!(reopened.board(), &expected);
    assert_eq!(
        reopened.board().column(ColumnId::Done).cards[0].text,
        "third, done"
    );
}
