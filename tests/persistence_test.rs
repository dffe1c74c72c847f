//! Tests for resuming sessions from stored state.

use tictactoe_session::{
    FileStore, KeyValueStore, MemoryStore, Outcome, PersistedGameState, Player, Position, Session,
    SessionConfig, Square, Statistics, StorageKeys, Winner,
};

fn play<S: KeyValueStore>(session: &mut Session<S>, indices: &[usize]) {
    for &index in indices {
        session.apply_move(index).expect("legal move");
    }
}

#[test]
fn test_every_move_is_written() {
    let store = MemoryStore::new();
    let mut session = Session::open(store.clone(), StorageKeys::default());
    play(&mut session, &[4]);

    let json = store.raw("gameState").expect("game state written");
    let state = PersistedGameState::from_json(&json).unwrap();
    assert_eq!(state.board.get(Position::Center), Square::Occupied(Player::X));
    assert_eq!(state.current_player, Player::O);
    assert!(!state.game_over);
    assert_eq!(state.winner, None);
    assert_eq!(state.moves, vec![4]);
    // Statistics are only written once a game finishes.
    assert_eq!(store.raw("statistics"), None);
}

#[test]
fn test_reopen_resumes_game_history_and_statistics() {
    let store = MemoryStore::new();
    {
        let mut session = Session::open(store.clone(), StorageKeys::default());
        play(&mut session, &[0, 4, 1, 5, 2]);
        session.new_game();
        play(&mut session, &[8, 0]);
    }

    let session = Session::open(store.clone(), StorageKeys::default());
    assert!(session.is_persistent());
    assert_eq!(*session.statistics(), Statistics::new(1, 1, 0, 0));
    assert_eq!(session.history().len(), 1);
    assert_eq!(*session.history()[0].winner(), Winner::X);
    assert_eq!(*session.snapshot().current_player(), Player::X);
    assert_eq!(session.snapshot().board().filled(), 2);
    assert_eq!(session.boards().len(), 3);
}

#[test]
fn test_reopen_finished_game_does_not_recount() {
    let store = MemoryStore::new();
    {
        let mut session = Session::open(store.clone(), StorageKeys::default());
        play(&mut session, &[0, 3, 1, 4, 8, 5]);
    }

    let mut session = Session::open(store, StorageKeys::default());
    assert_eq!(session.outcome(), Outcome::Won(Player::O));
    assert_eq!(*session.statistics().total_games(), 1);
    assert!(session.apply_move(2).is_err());
    assert_eq!(*session.statistics().total_games(), 1);
}

#[test]
fn test_state_without_move_order_still_loads() {
    let store = MemoryStore::new();
    store.insert_raw(
        "gameState",
        r#"{"board":["X","","","","O","","","",""],"currentPlayer":"X","gameOver":false,"winner":null,"history":[]}"#,
    );
    store.insert_raw("statistics", r#"{"totalGames":0,"xWins":0,"oWins":0,"draws":0}"#);

    let mut session = Session::open(store, StorageKeys::default());
    assert_eq!(*session.snapshot().current_player(), Player::X);
    assert_eq!(session.boards().len(), 1);

    play(&mut session, &[8]);
    let boards = session.boards();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[1].get(Position::BottomRight), Square::Occupied(Player::X));
}

#[test]
fn test_corrupt_game_state_is_discarded() {
    let store = MemoryStore::new();
    store.insert_raw("gameState", "{not json");
    store.insert_raw("statistics", r#"{"totalGames":2,"xWins":1,"oWins":0,"draws":1}"#);

    let session = Session::open(store, StorageKeys::default());
    assert!(session.is_persistent());
    assert_eq!(session.snapshot().board().filled(), 0);
    assert_eq!(*session.statistics(), Statistics::new(2, 1, 0, 1));
}

#[test]
fn test_impossible_board_is_discarded() {
    let store = MemoryStore::new();
    store.insert_raw(
        "gameState",
        r#"{"board":["X","X","","","","","","",""],"currentPlayer":"O","gameOver":false,"winner":null,"history":[]}"#,
    );

    let session = Session::open(store, StorageKeys::default());
    assert_eq!(session.snapshot().board().filled(), 0);
    assert_eq!(*session.snapshot().current_player(), Player::X);
}

#[test]
fn test_inconsistent_statistics_are_discarded() {
    let store = MemoryStore::new();
    store.insert_raw("statistics", r#"{"totalGames":1,"xWins":3,"oWins":0,"draws":0}"#);

    let session = Session::open(store, StorageKeys::default());
    assert_eq!(*session.statistics(), Statistics::default());
}

#[test]
fn test_full_counters_do_not_crash_session() {
    let store = MemoryStore::new();
    let full = r#"{"totalGames":4294967295,"xWins":4294967295,"oWins":0,"draws":0}"#;
    store.insert_raw("statistics", full);

    let mut session = Session::open(store.clone(), StorageKeys::default());
    assert_eq!(*session.statistics().total_games(), u32::MAX);

    play(&mut session, &[0, 4, 1, 5, 2]);
    assert_eq!(session.outcome(), Outcome::Won(Player::X));
    assert_eq!(*session.statistics(), Statistics::new(u32::MAX, u32::MAX, 0, 0));
    assert!(session.statistics().is_consistent());
    assert_eq!(session.history().len(), 1);
    assert_eq!(store.raw("statistics").as_deref(), Some(full));
}

#[test]
fn test_unavailable_store_runs_in_memory() {
    let store = MemoryStore::new();
    store.set_available(false);

    let mut session = Session::open(store.clone(), StorageKeys::default());
    assert!(!session.is_persistent());

    play(&mut session, &[0, 4, 1, 5, 2]);
    assert_eq!(*session.statistics().x_wins(), 1);

    store.set_available(true);
    session.new_game();
    assert_eq!(store.raw("gameState"), None);
    assert_eq!(store.raw("statistics"), None);
}

#[test]
fn test_store_failing_mid_session_keeps_playing() {
    let store = MemoryStore::new();
    let mut session = Session::open(store.clone(), StorageKeys::default());
    play(&mut session, &[0]);
    let written = store.raw("gameState");

    store.set_available(false);
    play(&mut session, &[4]);
    assert!(!session.is_persistent());
    assert_eq!(session.snapshot().board().filled(), 2);
    assert_eq!(store.raw("gameState"), written);
}

#[test]
fn test_custom_storage_keys() {
    let store = MemoryStore::new();
    let keys = StorageKeys::new("alice-game".to_string(), "alice-stats".to_string());
    let mut session = Session::open(store.clone(), keys);
    play(&mut session, &[0, 4, 1, 5, 2]);

    assert!(store.raw("alice-game").is_some());
    assert_eq!(
        store.raw("alice-stats").as_deref(),
        Some(r#"{"totalGames":1,"xWins":1,"oWins":0,"draws":0}"#)
    );
    assert_eq!(store.raw("gameState"), None);
}

#[test]
fn test_reset_is_persisted() {
    let store = MemoryStore::new();
    {
        let mut session = Session::open(store.clone(), StorageKeys::default());
        play(&mut session, &[0, 4, 1, 5, 2]);
        assert!(session.reset_statistics(true));
    }

    let session = Session::open(store, StorageKeys::default());
    assert_eq!(*session.statistics(), Statistics::default());
    assert!(session.history().is_empty());
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut session = Session::open(FileStore::new(dir.path()), StorageKeys::default());
        play(&mut session, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    }

    assert!(dir.path().join("gameState.json").exists());
    assert!(dir.path().join("statistics.json").exists());

    let session = Session::open(FileStore::new(dir.path()), StorageKeys::default());
    assert_eq!(session.outcome(), Outcome::Draw);
    assert_eq!(*session.statistics(), Statistics::new(1, 0, 0, 1));
    assert_eq!(*session.history()[0].winner(), Winner::Draw);
}

#[test]
fn test_file_store_in_unwritable_location() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the data directory should be.
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, "").unwrap();

    let mut session = Session::open(FileStore::new(&blocked), StorageKeys::default());
    play(&mut session, &[4]);
    assert!(!session.is_persistent());
    assert_eq!(session.snapshot().board().filled(), 1);
}

#[test]
fn test_config_opens_matching_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig::default().with_data_dir(dir.path());
    {
        let mut session = Session::open(config.open_store(), config.storage_keys());
        play(&mut session, &[4]);
    }
    assert!(dir.path().join("gameState.json").exists());

    let memory_only = config.clone().with_persist(false);
    let session = Session::open(memory_only.open_store(), memory_only.storage_keys());
    assert_eq!(session.snapshot().board().filled(), 0);
}
