use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::constants::{
    ARENA_HEIGHT, ARENA_WIDTH, COUNTDOWN_FLASH_INTERVAL, COUNTDOWN_WARNING_SECONDS,
};
use crate::types::{Rect, Vector2D};

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer
            .get(y as usize)
            .map(|row| row.iter().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row(y).contains(needle))
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, MoveTo(x, y)),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(x, y);
                Ok(())
            }
        }
    }

    /// Styling and cursor commands only reach a real terminal.
    pub fn queue_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }

    pub fn screen_buffer(&self) -> Option<&ScreenBuffer> {
        match self {
            OutputTarget::ScreenBuffer(sb) => Some(sb),
            OutputTarget::Stdout(_) => None,
        }
    }

    /// Writes `text` horizontally centered on row `y`.
    pub fn write_centered(&mut self, width: u16, y: u16, text: &str) -> io::Result<()> {
        let x = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
        self.move_to(x, y)?;
        write!(self, "{}", text)
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };
}

// --- GameGrid: the arena scaled down to terminal cells ---
pub struct GameGrid {
    pub grid: Vec<Vec<Cell>>,
    pub width: u16,
    pub height: u16,
    pub tint: Option<Color>,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![Cell::BLANK; width as usize]; height as usize],
            width,
            height,
            tint: None,
        }
    }

    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, color: Color) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = Cell { ch, color };
        }
    }

    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        self.grid.get(y as usize)?.get(x as usize).map(|cell| cell.ch)
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![Cell::BLANK; self.width as usize]; self.height as usize];
        self.tint = None;
    }

    /// Maps an arena position to the grid cell that covers it. Positions
    /// outside the arena land outside the grid and are ignored by `set_cell`.
    pub fn to_cell(&self, position: Vector2D) -> Option<(u16, u16)> {
        let cx = (position.x / ARENA_WIDTH * self.width as f64).floor();
        let cy = (position.y / ARENA_HEIGHT * self.height as f64).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.width as f64 || cy >= self.height as f64 {
            return None;
        }
        Some((cx as u16, cy as u16))
    }

    /// Paints every cell the box covers; tiny boxes still get their center cell.
    pub fn fill_rect(&mut self, rect: &Rect, ch: char, color: Color) {
        let cell_w = ARENA_WIDTH / self.width as f64;
        let cell_h = ARENA_HEIGHT / self.height as f64;
        let x0 = (rect.left / cell_w).ceil().max(0.0) as i64;
        let x1 = (rect.right() / cell_w).floor() as i64;
        let y0 = (rect.top / cell_h).ceil().max(0.0) as i64;
        let y1 = (rect.bottom() / cell_h).floor() as i64;
        if x0 >= x1 || y0 >= y1 {
            if let Some((x, y)) = self.to_cell(rect.center()) {
                self.set_cell(x, y, ch, color);
            }
            return;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                if x < self.width as i64 && y < self.height as i64 {
                    self.set_cell(x as u16, y as u16, ch, color);
                }
            }
        }
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        if let Some(tint) = self.tint {
            stdout.queue_command(SetBackgroundColor(tint))?;
        }
        for y in 0..self.height {
            stdout.move_to(0, y)?;
            let mut current = None;
            for cell in &self.grid[y as usize] {
                if current != Some(cell.color) {
                    stdout.queue_command(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                write!(stdout, "{}", cell.ch)?;
            }
        }
        stdout.queue_command(ResetColor)?;
        Ok(())
    }

    pub fn clear_screen_manual(&self, stdout: &mut OutputTarget, terminal_width: u16, terminal_height: u16) -> io::Result<()> {
        stdout.queue_command(ResetColor)?;
        for y in 0..terminal_height {
            stdout.move_to(0, y)?;
            write!(stdout, "{}", " ".repeat(terminal_width as usize))?;
        }
        stdout.move_to(0, 0)?;
        Ok(())
    }
}

/// Countdown text color: terminal default normally, red in the final seconds with a
/// white flash every few frames.
pub fn countdown_color(seconds_left: u64, frame: u64) -> Color {
    if seconds_left > COUNTDOWN_WARNING_SECONDS {
        Color::Reset
    } else if frame % COUNTDOWN_FLASH_INTERVAL == 0 {
        Color::White
    } else {
        Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_corners_map_inside_grid() {
        let grid = GameGrid::new(60, 35);
        assert_eq!(grid.to_cell(Vector2D::new(0.0, 0.0)), Some((0, 0)));
        assert_eq!(grid.to_cell(Vector2D::new(599.9, 699.9)), Some((59, 34)));
        assert_eq!(grid.to_cell(Vector2D::new(600.0, 10.0)), None);
        assert_eq!(grid.to_cell(Vector2D::new(-1.0, 10.0)), None);
    }

    #[test]
    fn small_rect_still_paints_one_cell() {
        let mut grid = GameGrid::new(60, 35);
        grid.fill_rect(&Rect::new(100.0, 100.0, 2.0, 2.0), 'o', Color::Red);
        assert_eq!(grid.char_at(10, 5), Some('o'));
    }

    #[test]
    fn countdown_flashes_only_in_warning_window() {
        assert_eq!(countdown_color(11, 5), Color::Reset);
        assert_eq!(countdown_color(10, 5), Color::White);
        assert_eq!(countdown_color(10, 6), Color::Red);
    }
}
