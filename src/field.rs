// Minefield state machine
// Owns the cell grid: mine seeding, reveal with flood-fill, adjacency, flags

use log::debug;
use rand::prelude::*;
use thiserror::Error;

/// Errors from minefield construction and seeding.
/// In-range play operations never fail; out-of-range probes are silent no-ops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field dimensions must be positive, got {width}x{height}")]
    BadDimensions { width: i32, height: i32 },
    #[error("{mines} mines cannot fit a {size}-cell field with a safe start")]
    TooManyMines { mines: usize, size: usize },
    #[error("safe start ({x}, {y}) is outside the field")]
    SafeStartOutOfBounds { x: i32, y: i32 },
    #[error("mines are already seeded")]
    AlreadySeeded,
}

/// One grid position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cell {
    pub is_mine: bool,
    pub is_opened: bool,
    pub is_flagged: bool,
    /// Only meaningful once the cell is opened.
    pub adjacent_mines: u8,
}

/// Outcome of a reveal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// One or more safe cells were opened.
    Opened,
    /// The revealed cell was a mine: the losing move.
    Exploded,
    /// Out of bounds, already open, or flagged; nothing changed.
    Ignored,
}

/// The playing field. Created empty, seeded once (explicitly or on the first
/// committed reveal, which is then guaranteed safe), mutated only through
/// `reveal` and `toggle_flag` afterwards.
#[derive(Debug)]
pub struct Minefield {
    width: i32,
    height: i32,
    mine_count: usize,
    cells: Vec<Cell>,
    seeded: bool,
}

impl Minefield {
    /// Create an all-safe, all-closed field. The mine count is validated here
    /// so the seeding loop can never be asked to fill more cells than exist
    /// outside the safe start.
    pub fn new(width: i32, height: i32, mine_count: usize) -> Result<Self, FieldError> {
        if width <= 0 || height <= 0 {
            return Err(FieldError::BadDimensions { width, height });
        }
        let size = (width as usize) * (height as usize);
        if mine_count >= size {
            return Err(FieldError::TooManyMines { mines: mine_count, size });
        }
        Ok(Minefield {
            width,
            height,
            mine_count,
            cells: vec![Cell::default(); size],
            seeded: false,
        })
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn position_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Row-major linear index for (x, y), or None when out of range.
    /// This is the only place the grid layout is encoded.
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.position_valid(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    /// Inverse of `index` for in-range indices.
    pub fn coords(&self, index: usize) -> Option<(i32, i32)> {
        (index < self.cells.len())
            .then(|| (index as i32 % self.width, index as i32 / self.width))
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Place `mine_count` mines by rejection sampling, never on the safe
    /// start. Fails if the field is already seeded, the safe start is out of
    /// range, or the count leaves no room for it.
    pub fn seed_mines(&mut self, mine_count: usize, safe_x: i32, safe_y: i32) -> Result<(), FieldError> {
        if self.seeded {
            return Err(FieldError::AlreadySeeded);
        }
        if !self.position_valid(safe_x, safe_y) {
            return Err(FieldError::SafeStartOutOfBounds { x: safe_x, y: safe_y });
        }
        if mine_count >= self.cells.len() {
            return Err(FieldError::TooManyMines {
                mines: mine_count,
                size: self.cells.len(),
            });
        }
        self.mine_count = mine_count;
        self.place_mines(mine_count, (safe_x, safe_y));
        Ok(())
    }

    fn place_mines(&mut self, count: usize, safe: (i32, i32)) {
        let mut rng = thread_rng();
        let mut remaining = count;
        while remaining > 0 {
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            if (x, y) == safe {
                continue;
            }
            if let Some(idx) = self.index(x, y) {
                if !self.cells[idx].is_mine {
                    self.cells[idx].is_mine = true;
                    remaining -= 1;
                }
            }
        }
        self.seeded = true;
        debug!("seeded {} mines, safe start ({}, {})", count, safe.0, safe.1);
    }

    /// Reveal a cell. Out-of-range, already-open and flagged cells are left
    /// alone (flagged cells must be unflagged before they can be revealed).
    /// The first committed reveal seeds the field with its own cell as the
    /// safe start. A zero-adjacency reveal cascades over the full 8-neighbor
    /// set; `is_opened` doubles as the visited mark so every cell is handled
    /// at most once.
    pub fn reveal(&mut self, x: i32, y: i32) -> Reveal {
        let Some(idx) = self.index(x, y) else {
            return Reveal::Ignored;
        };
        if self.cells[idx].is_opened || self.cells[idx].is_flagged {
            return Reveal::Ignored;
        }
        if !self.seeded {
            self.place_mines(self.mine_count, (x, y));
        }
        if self.cells[idx].is_mine {
            self.cells[idx].is_opened = true;
            debug!("mine hit at ({}, {})", x, y);
            return Reveal::Exploded;
        }
        // Worklist instead of recursion: flood depth is bounded only by grid
        // size, not the call stack.
        let mut work = vec![(x, y)];
        while let Some((cx, cy)) = work.pop() {
            let Some(ci) = self.index(cx, cy) else {
                continue;
            };
            if self.cells[ci].is_opened || self.cells[ci].is_flagged || self.cells[ci].is_mine {
                continue;
            }
            let adjacent = self.adjacent_mines(cx, cy);
            self.cells[ci].is_opened = true;
            self.cells[ci].adjacent_mines = adjacent;
            if adjacent == 0 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx != 0 || dy != 0 {
                            work.push((cx + dx, cy + dy));
                        }
                    }
                }
            }
        }
        Reveal::Opened
    }

    /// Count mines in the 3x3 neighborhood around (x, y), excluding the
    /// center. Out-of-range neighbors simply do not contribute.
    pub fn adjacent_mines(&self, x: i32, y: i32) -> u8 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(idx) = self.index(x + dx, y + dy) {
                    if self.cells[idx].is_mine {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Flip the flag on a closed cell; opened cells cannot be flagged.
    pub fn toggle_flag(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.index(x, y) {
            if !self.cells[idx].is_opened {
                self.cells[idx].is_flagged = !self.cells[idx].is_flagged;
            }
        }
    }

    /// Win condition, derived: every non-mine cell has been opened.
    pub fn is_cleared(&self) -> bool {
        self.seeded && self.cells.iter().all(|c| c.is_mine || c.is_opened)
    }

    /// Mine counter for the status bar: total mines minus placed flags.
    /// Goes negative when the player over-flags.
    pub fn remaining_mines(&self) -> isize {
        let flagged = self.cells.iter().filter(|c| c.is_flagged).count();
        self.mine_count as isize - flagged as isize
    }

    /// Open every mine for the loss screen.
    pub fn reveal_all_mines(&mut self) {
        for cell in &mut self.cells {
            if cell.is_mine {
                cell.is_opened = true;
            }
        }
    }

    #[cfg(test)]
    fn with_mines(width: i32, height: i32, mines: &[(i32, i32)]) -> Self {
        let mut field = Minefield::new(width, height, mines.len()).unwrap();
        for &(x, y) in mines {
            let idx = field.index(x, y).unwrap();
            field.cells[idx].is_mine = true;
        }
        field.seeded = true;
        field
    }
}
