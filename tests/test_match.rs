use kokaton_survive::abilities::Shield;
use kokaton_survive::config::MatchConfig;
use kokaton_survive::constants::*;
use kokaton_survive::entities::{Bomb, EnemyState, Entity, Expression};
use kokaton_survive::game::{Match, MatchStatus};
use kokaton_survive::phase::Phase;
use kokaton_survive::terminal_io::{FrameInput, Key};
use kokaton_survive::types::{Rect, Vector2D};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> FrameInput {
    FrameInput::default()
}

fn stray_bomb(rng: &mut StdRng, at: Rect) -> Bomb {
    let spawner = Rect::new(100.0, 50.0, 64.0, 64.0);
    let mut bomb = Bomb::new(&spawner, &at, Phase::Early, Some(Vector2D::new(0.0, 1.0)), rng);
    bomb.rect = at;
    bomb
}

// ── Start of match ────────────────────────────────────────────────────────────

#[test]
fn new_match_starts_clean() {
    let m = Match::new(MatchConfig::default());
    assert_eq!(m.frame, 0);
    assert_eq!(m.status, MatchStatus::Running);
    assert_eq!(m.stock.remaining, ABILITY_USES);
    assert!(m.enemies.is_empty());
    assert!(m.bombs.is_empty());
    assert_eq!(m.countdown(), COUNTDOWN_START_SECONDS);
}

#[test]
fn first_frame_spawns_an_enemy() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.step(&idle(), &mut rng);
    assert_eq!(m.enemies.len(), 1);
    assert_eq!(m.enemies[0].state, EnemyState::Stopped);
    assert_eq!(m.frame, 1);
}

#[test]
fn enemies_arrive_on_checkpoints_only() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.shields.push(Shield::new(u32::MAX));
    for _ in 0..ENEMY_SPAWN_INTERVAL {
        m.step(&idle(), &mut rng);
    }
    assert_eq!(m.enemies.len(), 1);
    m.step(&idle(), &mut rng);
    assert_eq!(m.enemies.len(), 2);
}

// ── Countdown ─────────────────────────────────────────────────────────────────

#[test]
fn countdown_ticks_once_per_second() {
    let mut m = Match::new(MatchConfig::default());
    m.frame = 1;
    assert_eq!(m.countdown(), 179);
    m.frame = FRAMES_PER_SECOND;
    assert_eq!(m.countdown(), 179);
    m.frame = FRAMES_PER_SECOND + 1;
    assert_eq!(m.countdown(), 178);
    m.frame = MATCH_LENGTH_FRAMES;
    assert_eq!(m.countdown(), 0);
}

// ── Losing ────────────────────────────────────────────────────────────────────

#[test]
fn resting_bird_is_eventually_hit() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    let mut first_volley = None;
    for _ in 0..300 {
        let status = m.step(&idle(), &mut rng);
        if first_volley.is_none() && !m.bombs.is_empty() {
            first_volley = Some(m.frame - 1);
        }
        if status != MatchStatus::Running {
            break;
        }
    }
    let volley = first_volley.expect("enemy never fired");
    assert_eq!(volley % m.enemies[0].interval, 0);
    assert_eq!(m.status, MatchStatus::GameOver);
}

#[test]
fn overlapping_bomb_ends_match_on_that_frame() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.frame = 1;
    let bird_rect = m.bird.rect;
    let bomb = stray_bomb(&mut rng, Rect::from_center(bird_rect.center(), 20.0, 20.0));
    m.bombs.push(bomb);

    assert_eq!(m.step(&idle(), &mut rng), MatchStatus::GameOver);
    assert!(m.bombs.is_empty());
    assert_eq!(m.frame, 1);
    // A finished match stays finished.
    assert_eq!(m.step(&idle(), &mut rng), MatchStatus::GameOver);
    assert_eq!(m.frame, 1);
}

#[test]
fn bird_hit_beats_active_shield() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.frame = 1;
    m.shields.push(Shield::new(SHIELD_LIFETIME));
    let bomb = stray_bomb(&mut rng, Rect::from_center(m.bird.rect.center(), 20.0, 20.0));
    m.bombs.push(bomb);
    assert_eq!(m.step(&idle(), &mut rng), MatchStatus::GameOver);
}

// ── Shield ability ────────────────────────────────────────────────────────────

#[test]
fn ability_press_raises_shield_and_spends_a_use() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.step(&FrameInput::pressing(&[Key::Ability]), &mut rng);
    assert_eq!(m.shields.len(), 1);
    assert_eq!(m.stock.remaining, 2);
}

#[test]
fn ability_press_with_no_uses_does_nothing() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.stock.remaining = 0;
    m.step(&FrameInput::pressing(&[Key::Ability]), &mut rng);
    assert!(m.shields.is_empty());
    assert_eq!(m.stock.remaining, 0);
}

#[test]
fn holding_ability_key_does_not_fire_it() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.step(&FrameInput::holding(&[Key::Ability]), &mut rng);
    assert!(m.shields.is_empty());
    assert_eq!(m.stock.remaining, ABILITY_USES);
}

#[test]
fn shield_expires_after_its_lifetime() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.step(&FrameInput::pressing(&[Key::Ability]), &mut rng);
    for _ in 1..SHIELD_LIFETIME {
        m.step(&idle(), &mut rng);
    }
    assert!(m.shields.is_empty());
}

#[test]
fn shield_pops_bombs_into_explosions() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.frame = 1;
    m.shields.push(Shield::new(SHIELD_LIFETIME));
    let spot = Rect::new(80.0, 600.0, 26.0, 26.0);
    let bomb = stray_bomb(&mut rng, spot);
    m.bombs.push(bomb);

    assert_eq!(m.step(&idle(), &mut rng), MatchStatus::Running);
    assert!(m.bombs.is_empty());
    assert_eq!(m.explosions.len(), 1);
    assert_eq!(m.explosions[0].position, spot.center());
    assert_eq!(m.neutralized, 1);
    assert_eq!(m.bird.expression, Expression::Flinch);
}

#[test]
fn explosions_fade_out() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.frame = 1;
    m.shields.push(Shield::new(1));
    let bomb = stray_bomb(&mut rng, Rect::new(80.0, 600.0, 26.0, 26.0));
    m.bombs.push(bomb);
    m.step(&idle(), &mut rng);
    assert!(m.explosions.iter().all(|e| e.is_alive()));
    for _ in 0..EXPLOSION_LIFETIME {
        m.step(&idle(), &mut rng);
        if m.status != MatchStatus::Running {
            break;
        }
    }
    assert!(m.explosions.is_empty());
}

// ── Winning ───────────────────────────────────────────────────────────────────

#[test]
fn last_frame_clears_the_match() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.frame = MATCH_LENGTH_FRAMES - 1;
    assert_eq!(m.step(&idle(), &mut rng), MatchStatus::GameClear);
    assert_eq!(m.step(&idle(), &mut rng), MatchStatus::GameClear);
    assert_eq!(m.frame, MATCH_LENGTH_FRAMES);
}

#[test]
fn shielded_bird_survives_whole_match_and_clears_once() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.shields.push(Shield::new(u32::MAX));

    let mut clears = 0;
    let mut previous = MatchStatus::Running;
    for _ in 0..MATCH_LENGTH_FRAMES + 100 {
        let status = m.step(&idle(), &mut rng);
        assert_ne!(status, MatchStatus::GameOver);
        if status == MatchStatus::GameClear && previous == MatchStatus::Running {
            clears += 1;
        }
        previous = status;
    }
    assert_eq!(clears, 1);
    assert_eq!(m.frame, MATCH_LENGTH_FRAMES);
    assert_eq!(m.enemies.len(), 3);
    assert!(m.neutralized > 0);
}

#[test]
fn endless_match_runs_into_late_phase() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::endless());
    m.frame = MATCH_LENGTH_FRAMES - 1;
    assert_eq!(m.step(&idle(), &mut rng), MatchStatus::Running);
    assert_eq!(m.phase(), Phase::Late);
    assert_eq!(m.step(&idle(), &mut rng), MatchStatus::Running);
    // Checkpoint at 9000 still brings an enemy.
    assert_eq!(m.enemies.len(), 1);
}

#[test]
fn mid_phase_bombs_bounce_instead_of_leaving() {
    let mut rng = seeded_rng();
    let mut m = Match::new(MatchConfig::default());
    m.frame = MID_PHASE_START + 1;
    let mut bomb = stray_bomb(&mut rng, Rect::new(579.0, 600.0, 20.0, 20.0));
    bomb.velocity = Vector2D::new(1.0, 0.0);
    m.bombs.push(bomb);
    m.step(&idle(), &mut rng);
    assert_eq!(m.bombs.len(), 1);
    assert_eq!(m.bombs[0].velocity, Vector2D::new(-1.0, 0.0));
}
