use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use crossterm::{
    event::{self, Event, KeyEventKind},
    style::{Color, ResetColor, SetForegroundColor},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use log::{debug, error, info};

use crate::abilities::{AbilityStock, Explosion, Shield};
use crate::config::{LaunchOptions, MatchConfig};
use crate::constants::*;
use crate::entities::{Bird, Bomb, Enemy, Entity};
use crate::phase::Phase;
use crate::rendering::{countdown_color, GameGrid, OutputTarget};
use crate::terminal_io::{FrameInput, Key, KeyTracker, SimulatedInput, Soundtrack};
use crate::types::Vector2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    Running,
    GameOver,
    GameClear,
}

/// One match: every live entity plus the frame counter that drives phases.
/// `step` is the whole per-frame state machine and does no I/O.
pub struct Match {
    pub frame: u64,
    pub bird: Bird,
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub shields: Vec<Shield>,
    pub explosions: Vec<Explosion>,
    pub stock: AbilityStock,
    pub neutralized: u32,
    pub status: MatchStatus,
    pub config: MatchConfig,
}

impl Match {
    pub fn new(config: MatchConfig) -> Self {
        Match {
            frame: 0,
            bird: Bird::new(Vector2D::new(BIRD_START_X, BIRD_START_Y)),
            enemies: Vec::new(),
            bombs: Vec::new(),
            shields: Vec::new(),
            explosions: Vec::new(),
            stock: AbilityStock::new(),
            neutralized: 0,
            status: MatchStatus::Running,
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::at(self.frame)
    }

    /// Seconds shown on the clock after `frame` frames have run.
    pub fn countdown(&self) -> u64 {
        COUNTDOWN_START_SECONDS.saturating_sub(self.frame.div_ceil(FRAMES_PER_SECOND))
    }

    pub fn step(&mut self, input: &FrameInput, rng: &mut impl Rng) -> MatchStatus {
        if self.status != MatchStatus::Running {
            return self.status;
        }
        let phase = self.phase();

        for key in &input.pressed {
            if *key != Key::Ability {
                continue;
            }
            match self.stock.activate(SHIELD_LIFETIME) {
                Some(shield) => self.shields.push(shield),
                None => debug!("Frame {}: ability pressed with no uses left.", self.frame),
            }
        }

        if self.frame % ENEMY_SPAWN_INTERVAL == 0 {
            let enemy = Enemy::new(phase, rng);
            info!(
                "Frame {}: enemy arrives in {:?} phase, fires every {} frames.",
                self.frame, phase, enemy.interval
            );
            self.enemies.push(enemy);
        }

        for enemy in &self.enemies {
            if enemy.ready_to_fire(self.frame) {
                self.bombs.extend(enemy.fire(&self.bird, phase, rng));
            }
        }

        if self.bird_hit() {
            info!("Frame {}: bird hit. Game over.", self.frame);
            self.status = MatchStatus::GameOver;
            return self.status;
        }
        self.resolve_shield_hits();

        self.shields.retain_mut(|shield| {
            shield.update();
            shield.is_alive()
        });
        self.bird.update(&input.held);
        for enemy in &mut self.enemies {
            enemy.update();
        }
        self.bombs.retain_mut(|bomb| {
            bomb.update(phase, rng);
            bomb.is_alive()
        });
        self.explosions.retain_mut(|explosion| {
            explosion.update();
            explosion.is_alive()
        });

        self.frame += 1;
        if self.config.game_clear && self.frame >= MATCH_LENGTH_FRAMES {
            info!("Frame {}: time is up. Game clear.", self.frame);
            self.status = MatchStatus::GameClear;
        }
        self.status
    }

    /// Removes every bomb touching the bird; any removal ends the match.
    fn bird_hit(&mut self) -> bool {
        let bird_rect = self.bird.rect;
        let before = self.bombs.len();
        self.bombs.retain(|bomb| !bomb.rect.intersects(&bird_rect));
        self.bombs.len() != before
    }

    fn resolve_shield_hits(&mut self) {
        if self.shields.is_empty() {
            return;
        }
        let mut popped = 0;
        for bomb in &mut self.bombs {
            if self.shields.iter().any(|shield| shield.rect().intersects(&bomb.rect)) {
                bomb.kill();
                self.explosions.push(Explosion::new(bomb.rect.center(), EXPLOSION_LIFETIME));
                popped += 1;
            }
        }
        if popped > 0 {
            self.bombs.retain(|bomb| bomb.is_alive());
            self.bird.flinch();
            self.neutralized += popped;
            debug!("Frame {}: shield popped {} bombs.", self.frame, popped);
        }
    }
}

/// Terminal front end: input, pacing, drawing and end screens around a `Match`.
pub struct Game {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    pub soundtrack: Soundtrack,
    simulated_input: Option<SimulatedInput>,
    debug_mode_active: bool,
    max_frames: Option<u64>,
    config: MatchConfig,
    seed: Option<u64>,
}

impl Game {
    pub fn new(
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        options: &LaunchOptions,
    ) -> Self {
        Game {
            terminal_width,
            terminal_height,
            stdout_target,
            soundtrack: Soundtrack::new(options.config.soundtrack),
            simulated_input,
            debug_mode_active: options.debug,
            max_frames: options.max_frames,
            config: options.config,
            seed: options.seed,
        }
    }

    /// Plays one match. Returns `Running` when the player quit or the frame
    /// limit was reached before the match was decided.
    pub fn run(&mut self) -> io::Result<MatchStatus> {
        if !self.debug_mode_active {
            self.show_title_screen()?;
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut current = Match::new(self.config);
        let mut tracker = KeyTracker::new();
        let mut game_grid = GameGrid::new(self.terminal_width, self.arena_rows());
        let mut frames_run = 0;

        self.soundtrack.play();
        while current.status == MatchStatus::Running
            && self.max_frames.is_none_or(|max| frames_run < max)
        {
            let frame_start = Instant::now();

            let events = self.collect_events(current.frame)?;
            let input = tracker.collect(events, current.frame);
            if input.quit_requested() {
                info!("Quit requested at frame {}.", current.frame);
                break;
            }

            current.step(&input, &mut rng);
            self.render(&mut game_grid, &current)?;
            frames_run += 1;

            if !self.debug_mode_active {
                let frame_budget = Duration::from_millis(1000 / FRAMES_PER_SECOND);
                if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
                    thread::sleep(rest);
                }
            }
        }

        match current.status {
            MatchStatus::GameOver => self.show_end_screen("GAME OVER", &current)?,
            MatchStatus::GameClear => self.show_end_screen("GAME CLEAR!", &current)?,
            MatchStatus::Running => self.soundtrack.stop(),
        }
        Ok(current.status)
    }

    fn arena_rows(&self) -> u16 {
        self.terminal_height.saturating_sub(1).max(1)
    }

    fn collect_events(&mut self, frame: u64) -> io::Result<Vec<Event>> {
        if self.debug_mode_active {
            return Ok(self
                .simulated_input
                .as_mut()
                .map(|sim| sim.drain(frame))
                .unwrap_or_default());
        }
        let mut events = Vec::new();
        while event::poll(Duration::ZERO).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
            events.push(event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?);
        }
        Ok(events)
    }

    fn render(&mut self, game_grid: &mut GameGrid, current: &Match) -> io::Result<()> {
        game_grid.clear();
        for shield in &current.shields {
            shield.draw(game_grid);
        }
        for enemy in &current.enemies {
            enemy.draw(game_grid);
        }
        for bomb in &current.bombs {
            bomb.draw(game_grid);
        }
        for explosion in &current.explosions {
            explosion.draw(game_grid);
        }
        current.bird.draw(game_grid);
        game_grid.render(&mut self.stdout_target)?;

        let countdown = current.countdown();
        let hud_row = self.arena_rows();
        self.stdout_target.move_to(0, hud_row)?;
        write!(self.stdout_target, "Bomb: {}  ", current.stock.remaining)?;
        self.stdout_target
            .queue_command(SetForegroundColor(countdown_color(countdown, current.frame)))?;
        write!(self.stdout_target, "Time: {:>3}", countdown)?;
        self.stdout_target.queue_command(ResetColor)?;
        write!(self.stdout_target, "  Popped: {}", current.neutralized)?;
        self.stdout_target.flush()?;

        if let Some(sb) = self.stdout_target.screen_buffer() {
            sb.print_to_log();
        }
        Ok(())
    }

    fn show_title_screen(&mut self) -> io::Result<()> {
        let title_art = [
            r"DON'T DIE, KOKATON!",
            r"",
            r"Arrows / WASD : Move",
            r"Shift         : Slow down",
            r"B             : Shield (3 uses)",
            r"Q / Esc       : Quit",
        ];

        let grid = GameGrid::new(self.terminal_width, self.terminal_height);
        grid.clear_screen_manual(&mut self.stdout_target, self.terminal_width, self.terminal_height)?;
        let title_start_y = (self.terminal_height / 2).saturating_sub(title_art.len() as u16 / 2);
        for (i, line) in title_art.iter().enumerate() {
            self.stdout_target.write_centered(self.terminal_width, title_start_y + i as u16, line)?;
        }
        self.stdout_target.write_centered(
            self.terminal_width,
            self.terminal_height.saturating_sub(3),
            "Press any key to start...",
        )?;
        self.stdout_target.flush()?;

        loop {
            if let Event::Key(key) = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })? {
                if key.kind == KeyEventKind::Press {
                    break;
                }
            }
        }
        Ok(())
    }

    fn show_end_screen(&mut self, headline: &str, current: &Match) -> io::Result<()> {
        let grid = GameGrid::new(self.terminal_width, self.terminal_height);
        grid.clear_screen_manual(&mut self.stdout_target, self.terminal_width, self.terminal_height)?;

        let color = match current.status {
            MatchStatus::GameOver => Color::Red,
            _ => Color::Green,
        };
        let mid = self.terminal_height / 2;
        self.stdout_target.queue_command(SetForegroundColor(color))?;
        self.stdout_target.write_centered(self.terminal_width, mid.saturating_sub(2), headline)?;
        self.stdout_target.queue_command(ResetColor)?;
        if current.status == MatchStatus::GameOver {
            self.stdout_target.write_centered(self.terminal_width, mid, "( T_T )")?;
        }
        let summary = format!(
            "Survived {}s  Shield uses left: {}  Bombs popped: {}",
            current.frame / FRAMES_PER_SECOND,
            current.stock.remaining,
            current.neutralized
        );
        self.stdout_target.write_centered(self.terminal_width, mid + 2, &summary)?;
        self.stdout_target.flush()?;
        if let Some(sb) = self.stdout_target.screen_buffer() {
            sb.print_to_log();
        }
        info!("{} after {} frames.", headline, current.frame);

        self.soundtrack.stop();
        if !self.debug_mode_active {
            thread::sleep(Duration::from_millis(END_SCREEN_PAUSE_MILLIS));
        }
        Ok(())
    }
}
