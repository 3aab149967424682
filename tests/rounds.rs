use std::time::{Duration, Instant};

use minicade::engine::input::{Direction, Input};
use minicade::engine::{Game, Phase, TickOutcome};
use minicade::games::pong::Pong;
use minicade::games::snake::Snake;
use minicade::games::tower_defense::{tile_center, TdState, TowerDefense, START_LIVES, START_MONEY};
use minicade::session::Session;

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn snake_hits_the_wall_and_keeps_a_better_high_score() {
    let mut snake = Snake::new(3, 50);
    snake.handle_input(Input::Arrow(Direction::Right));
    let mut outcome = TickOutcome::Continue;
    for _ in 0..10 {
        outcome = snake.update(snake.interval());
    }
    assert_eq!(outcome, TickOutcome::Ended { score: 0 });
    assert_eq!(snake.phase(), Phase::Ended);
    assert_eq!(snake.high_score(), 50);

    // Nothing moves once the round is over.
    let head = snake.head();
    snake.handle_input(Input::Arrow(Direction::Up));
    snake.update(snake.interval());
    assert_eq!(snake.head(), head);
}

#[test]
fn snake_eats_then_turns_into_the_floor_below_a_standing_record() {
    let mut snake = Snake::new(11, 500);
    snake.handle_input(Input::Arrow(Direction::Right));
    for _ in 0..5 {
        assert_eq!(snake.update(snake.interval()), TickOutcome::Continue);
    }
    snake.handle_input(Input::Arrow(Direction::Down));
    let mut outcome = TickOutcome::Continue;
    for _ in 0..30 {
        outcome = snake.update(snake.interval());
        if outcome != TickOutcome::Continue {
            break;
        }
    }

    let score = snake.score();
    assert!(snake.eaten() >= 1);
    assert!(score >= 10 && score < 500);
    assert_eq!(outcome, TickOutcome::Ended { score });
    assert_eq!(snake.head().x, 15);
    assert_eq!(snake.head().y, 19);
    assert_eq!(snake.high_score(), 500);
}

#[test]
fn tower_defense_spends_down_to_zero_then_refuses() {
    let mut td = TowerDefense::new();
    let builds = [(2, (1, 0)), (2, (3, 0)), (1, (5, 0)), (1, (7, 0))];
    for (key, (col, row)) in builds {
        td.handle_input(Input::Select(key));
        td.handle_input(Input::Click(tile_center(col, row)));
        td.update(FRAME);
    }
    assert_eq!(td.towers().len(), 4);
    assert_eq!(td.money(), 0);

    td.handle_input(Input::Select(1));
    td.handle_input(Input::Click(tile_center(9, 0)));
    td.update(FRAME);
    assert_eq!(td.towers().len(), 4);
    assert_eq!(td.money(), 0);
    assert_eq!(td.hud().notice.as_deref(), Some("Not enough money!"));
}

#[test]
fn undefended_wave_leaks_every_enemy() {
    let t0 = Instant::now();
    let mut session = Session::new(TowerDefense::new());
    session.activate(t0);
    session.handle_input(Input::Toggle, t0);

    let mut now = t0;
    for _ in 0..2_500 {
        now += FRAME;
        session.poll(now);
    }
    let td = &session.game;
    assert_eq!(td.state(), TdState::Idle);
    assert_eq!(td.wave(), 1);
    assert_eq!(td.lives(), START_LIVES - 5);
    assert_eq!(td.money(), START_MONEY + 110);
    assert!(td.enemies().is_empty());
    assert!(session.driver().is_running());
}

#[test]
fn pong_keeps_its_score_across_a_pause() {
    let t0 = Instant::now();
    let mut session = Session::new(Pong::new(9));
    session.activate(t0);
    session.handle_input(Input::Toggle, t0);

    let mut now = t0;
    for _ in 0..3_000 {
        now += FRAME;
        session.poll(now);
    }
    let before = session.game.scores();
    session.handle_input(Input::Toggle, now);
    assert!(!session.driver().has_pending());

    now += Duration::from_secs(30);
    session.poll(now);
    assert_eq!(session.game.scores(), before);
    assert_eq!(session.game.phase(), Phase::Paused);
}
