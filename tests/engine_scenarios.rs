//! End-to-end scenarios through the public engine, worker and session API.

use std::thread;
use std::time::Duration;

use gomoku::eval::heuristic_moves;
use gomoku::{
    AIEngine, AiWorker, Board, GameSession, Pos, SearchConfig, SearchType, Stone, WorkerStatus,
};

fn sim_config(simulations: u32) -> SearchConfig {
    SearchConfig::default()
        .with_simulations(simulations)
        .without_time_limit()
}

#[test]
fn forcing_move_detected_on_open_four() {
    let mut board = Board::square(5, 5).unwrap();
    for c in 0..4 {
        board.apply_move(Pos::new(0, c), Stone::Black).unwrap();
    }

    let moves = heuristic_moves(&board);
    assert!(moves.forcing.contains(&Pos::new(0, 4)));
    assert!(!moves.proximity.contains(&Pos::new(0, 4)));
}

#[test]
fn fast_path_ignores_budget() {
    let board = Board::from_text("XOX\nOXO\nOX.", 3).unwrap();
    assert!(!board.check_result().is_over());

    let mut engine = AIEngine::seeded(sim_config(0), 1);
    let result = engine
        .get_move_with_stats(&board, Stone::White, Some(Pos::new(2, 1)))
        .unwrap();
    assert_eq!(result.best_move, Pos::new(2, 2));
    assert_eq!(result.search_type, SearchType::FastPath);
}

#[test]
fn minimal_budget_returns_available_cell() {
    let board = Board::from_text(
        "X....
         .O...
         .....
         .....
         .....",
        4,
    )
    .unwrap();
    let mut engine = AIEngine::seeded(sim_config(1), 17);
    let result = engine
        .get_move_with_stats(&board, Stone::White, Some(Pos::new(1, 1)))
        .unwrap();
    assert!(board.is_empty(result.best_move));
    assert_eq!(result.simulations, 1);
}

#[test]
fn same_seed_same_move() {
    let board = Board::from_text(
        ".......
         .......
         ..XO...
         ...X...
         ....O..
         .......
         .......",
        5,
    )
    .unwrap();
    let pick = |seed| {
        AIEngine::seeded(sim_config(400), seed)
            .get_move(&board, Stone::White, Some(Pos::new(4, 4)))
            .unwrap()
    };
    let first = pick(2024);
    for _ in 0..3 {
        assert_eq!(pick(2024), first);
    }
}

#[test]
fn worker_handshake_delivers_one_move() {
    let board = Board::square(7, 5).unwrap();
    let mut worker = AiWorker::new(sim_config(200).with_seed(3));
    worker.start(&board, Stone::White, None).unwrap();

    let result = loop {
        match worker.poll() {
            WorkerStatus::Thinking(_) => thread::sleep(Duration::from_millis(2)),
            WorkerStatus::Done(result) => break result,
            other => panic!("unexpected status {:?}", other),
        }
    };
    assert!(board.is_empty(result.best_move));
    assert_eq!(worker.poll(), WorkerStatus::Idle);
}

#[test]
fn engine_plays_full_game_to_completion() {
    let mut game = GameSession::new(Board::square(4, 3).unwrap(), Stone::Black);
    let mut engine = AIEngine::seeded(sim_config(60), 8);
    let mut human_cells = (0..16u8).map(|i| Pos::new(i / 4, i % 4));

    while !game.is_over() {
        if game.is_human_turn() {
            let pos = human_cells
                .find(|&p| game.board().is_empty(p))
                .unwrap();
            game.try_human_move(pos).unwrap();
        } else {
            let (last_mover, last_move) = game.last_played().unwrap();
            let pos = engine
                .get_move(game.board(), last_mover, Some(last_move))
                .unwrap();
            game.apply_ai_move(pos).unwrap();
        }
    }

    let result = game.result().unwrap();
    match result.winner {
        Some(winner) => {
            let line = result.winning_line.as_ref().unwrap();
            assert!(line.len() >= 3);
            assert!(line
                .iter()
                .all(|&p| game.board().stone_at(p) == Some(winner)));
        }
        None => assert!(game.board().is_full()),
    }
}
