use crossterm::style::Color;
use log::info;

use crate::constants::{ABILITY_USES, EXPLOSION_FLICKER};
use crate::entities::Entity;
use crate::rendering::GameGrid;
use crate::types::{Rect, Vector2D};

/// Remaining uses of the screen-wide shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityStock {
    pub remaining: u32,
}

impl AbilityStock {
    pub fn new() -> Self {
        AbilityStock { remaining: ABILITY_USES }
    }

    /// Spends one use and raises a shield, or does nothing when empty.
    pub fn activate(&mut self, lifetime: u32) -> Option<Shield> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        info!("Shield raised, {} left.", self.remaining);
        Some(Shield::new(lifetime))
    }
}

impl Default for AbilityStock {
    fn default() -> Self {
        AbilityStock::new()
    }
}

// --- Shield: covers the whole arena until its countdown runs out ---
pub struct Shield {
    pub lifetime: u32,
}

impl Shield {
    pub fn new(lifetime: u32) -> Self {
        Shield { lifetime }
    }

    pub fn update(&mut self) {
        self.lifetime = self.lifetime.saturating_sub(1);
    }
}

impl Entity for Shield {
    fn rect(&self) -> Rect {
        Rect::arena()
    }

    fn is_alive(&self) -> bool {
        self.lifetime > 0
    }

    fn draw(&self, game_grid: &mut GameGrid) {
        game_grid.tint = Some(Color::DarkMagenta);
    }
}

// --- Explosion: cosmetic burst where a bomb was neutralized ---
pub struct Explosion {
    pub position: Vector2D,
    pub lifetime: u32,
}

impl Explosion {
    pub fn new(position: Vector2D, lifetime: u32) -> Self {
        Explosion { position, lifetime }
    }

    pub fn update(&mut self) {
        self.lifetime = self.lifetime.saturating_sub(1);
    }

    /// Which of the two explosion images is showing.
    pub fn image_index(&self) -> u32 {
        (self.lifetime / EXPLOSION_FLICKER) % 2
    }
}

impl Entity for Explosion {
    fn rect(&self) -> Rect {
        Rect::from_center(self.position, 0.0, 0.0)
    }

    fn is_alive(&self) -> bool {
        self.lifetime > 0
    }

    fn draw(&self, game_grid: &mut GameGrid) {
        let (glyph, color) = if self.image_index() == 0 {
            ('*', Color::Yellow)
        } else {
            ('+', Color::Red)
        };
        if let Some((x, y)) = game_grid.to_cell(self.position) {
            game_grid.set_cell(x, y, glyph, color);
        }
    }
}
