//! End-to-end scenario tests exercising the controller through its public
//! API, without a real engine binary: every move here takes the
//! engine-unreachable fallback path into the local validator, which is
//! exactly the path the spec mandates when the engine bridge is
//! unavailable.

use xiangqi::engine::Config;
use xiangqi::game::Status;
use xiangqi::player::Color;
use xiangqi::GameController;

fn new_game(fen: Option<&str>, turn: Color) -> GameController {
    GameController::new(fen, turn, false, 5, Config::default()).unwrap()
}

#[tokio::test]
async fn scenario_b_horse_leg_block_rejects_move_and_leaves_board_unchanged() {
    // Initial position: the leg square (1,8) is empty, so the jump succeeds.
    let mut game = new_game(None, Color::Red);
    game.move_piece(1, 9, 2, 7).await.unwrap();
    assert_eq!(game.turn(), Color::Black);

    // Same jump with the leg square occupied: rejected, board untouched.
    let blocked_fen = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/1P7/RNBAKABNR w - - 0 1";
    let mut blocked = new_game(Some(blocked_fen), Color::Red);
    let before = blocked.fen().to_string();
    let err = blocked.move_piece(1, 9, 2, 7).await.unwrap_err();
    assert!(format!("{err}").to_lowercase().contains("leg") || format!("{err:?}").contains("HorseLeg"));
    assert_eq!(blocked.fen(), before);
    assert_eq!(blocked.turn(), Color::Red);
}

#[tokio::test]
async fn scenario_c_cannon_capture_requires_exactly_one_screen() {
    let one_screen = "3kr4/9/4c4/9/9/9/9/4C4/9/4K4 w - - 0 1";
    let mut game = new_game(Some(one_screen), Color::Red);
    game.move_piece(4, 7, 4, 0).await.unwrap();
    assert_eq!(game.turn(), Color::Black);
    assert!(game.move_history().last().unwrap().contains('x'));

    let zero_screens = "3kr4/9/9/9/9/9/9/4C4/9/4K4 w - - 0 1";
    let mut game = new_game(Some(zero_screens), Color::Red);
    let before = game.fen().to_string();
    assert!(game.move_piece(4, 7, 4, 0).await.is_err());
    assert_eq!(game.fen(), before);

    let two_screens = "3kr4/9/4c4/9/4c4/9/9/4C4/9/4K4 w - - 0 1";
    let mut game = new_game(Some(two_screens), Color::Red);
    let before = game.fen().to_string();
    assert!(game.move_piece(4, 7, 4, 0).await.is_err());
    assert_eq!(game.fen(), before);
}

#[tokio::test]
async fn scenario_e_check_notification_is_consumed_once() {
    let fen = "r8/3k5/9/9/9/9/9/9/9/4K4 b - - 0 1";
    let mut game = new_game(Some(fen), Color::Black);

    game.move_piece(0, 0, 4, 0).await.unwrap();

    assert_eq!(game.consume_notification().as_deref(), Some("check"));
    assert_eq!(game.consume_notification(), None);
    assert_eq!(game.status(), Status::Playing);
}
