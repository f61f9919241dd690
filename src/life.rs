//! # Life
//! Conway's Game of Life on a fixed board of five pixel cells covering the panel.
//!
//! Cells beyond the edge count as dead, patterns do not wrap around.

use embedded_graphics::prelude::Point;
use rand::RngCore;

/// Side of one cell in layout pixels
pub const CELL_SIZE: i32 = 5;
/// Cells per row
pub const WIDTH: usize = 52;
/// Rows of the board
pub const HEIGHT: usize = 35;

/// Bits of a row that hold cells
const ROW_MASK: u64 = (1 << WIDTH) - 1;

/// Gosper glider gun, left block to right block
const GOSPER_GUN: [(u8, u8); 36] = [
    (5, 5),
    (5, 6),
    (6, 5),
    (6, 6),
    (15, 5),
    (15, 6),
    (15, 7),
    (16, 4),
    (16, 8),
    (17, 3),
    (18, 3),
    (17, 9),
    (18, 9),
    (19, 6),
    (20, 4),
    (20, 8),
    (21, 5),
    (21, 6),
    (21, 7),
    (22, 6),
    (25, 3),
    (25, 4),
    (25, 5),
    (26, 3),
    (26, 4),
    (26, 5),
    (27, 2),
    (27, 6),
    (29, 1),
    (29, 2),
    (29, 6),
    (29, 7),
    (39, 3),
    (39, 4),
    (40, 3),
    (40, 4),
];

/// R-pentomino near the middle of the board
const R_PENTOMINO: [(u8, u8); 5] = [(28, 12), (29, 12), (27, 13), (28, 13), (28, 14)];

/// Starting pattern of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pattern {
    /// Every cell alive or dead at random
    Random,
    /// Gosper glider gun
    GosperGun,
    /// R-pentomino
    RPentomino,
}

/// The board, one bit per cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Bit `x` of row `y` is the cell at `(x, y)`
    rows: [u64; HEIGHT],
}

impl Board {
    /// A board without live cells
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: [0; HEIGHT] }
    }

    /// A board seeded with `pattern`. `rng` is only drawn from for [`Pattern::Random`].
    pub fn seeded<R: RngCore>(pattern: Pattern, rng: &mut R) -> Self {
        match pattern {
            Pattern::Random => {
                let mut board = Self::empty();
                for row in &mut board.rows {
                    *row = rng.next_u64() & ROW_MASK;
                }
                board
            }
            Pattern::GosperGun => Self::with_cells(&GOSPER_GUN),
            Pattern::RPentomino => Self::with_cells(&R_PENTOMINO),
        }
    }

    /// A board with exactly `cells` alive. Cells off the board are ignored.
    #[must_use]
    pub fn with_cells(cells: &[(u8, u8)]) -> Self {
        let mut board = Self::empty();
        for &(x, y) in cells {
            board.set(usize::from(x), usize::from(y), true);
        }
        board
    }

    /// Bring the cell at `(x, y)` to life or kill it
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        if alive {
            self.rows[y] |= 1 << x;
        } else {
            self.rows[y] &= !(1 << x);
        }
    }

    /// Whether the cell at `(x, y)` lives. Cells off the board are dead.
    #[must_use]
    pub const fn is_alive(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.rows[y] & (1 << x) != 0
    }

    /// Number of live cells
    #[must_use]
    pub fn population(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Top left corner of every live cell, in layout pixels
    pub fn live_cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..HEIGHT).flat_map(move |y| {
            (0..WIDTH)
                .filter(move |&x| self.is_alive(x, y))
                .map(move |x| corner(x, y))
        })
    }

    /// Advance one generation
    pub fn step(&mut self) {
        let mut next = [0; HEIGHT];
        for (y, row) in next.iter_mut().enumerate() {
            for x in 0..WIDTH {
                let neighbours = self.neighbours(x, y);
                if neighbours == 3 || (neighbours == 2 && self.is_alive(x, y)) {
                    *row |= 1 << x;
                }
            }
        }
        self.rows = next;
    }

    /// Live cells around `(x, y)`
    fn neighbours(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for ny in y.saturating_sub(1)..=y + 1 {
            for nx in x.saturating_sub(1)..=x + 1 {
                if (nx, ny) != (x, y) && self.is_alive(nx, ny) {
                    count += 1;
                }
            }
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// Layout position of the cell at `(x, y)`
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const fn corner(x: usize, y: usize) -> Point {
    Point::new(x as i32 * CELL_SIZE, y as i32 * CELL_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn blinker_has_period_two() {
        let start = Board::with_cells(&[(10, 10), (11, 10), (12, 10)]);
        let mut board = start;
        board.step();
        assert_eq!(board, Board::with_cells(&[(11, 9), (11, 10), (11, 11)]));
        board.step();
        assert_eq!(board, start);
    }

    #[test]
    fn block_is_still() {
        let start = Board::with_cells(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let mut board = start;
        board.step();
        assert_eq!(board, start);
    }

    #[test]
    fn edges_do_not_wrap() {
        let mut board = Board::with_cells(&[(0, 0), (1, 0), (2, 0)]);
        board.step();
        assert_eq!(board, Board::with_cells(&[(1, 0), (1, 1)]));
        assert!(!board.is_alive(1, HEIGHT - 1));
    }

    #[test]
    fn fixed_seeds() {
        let gun = Board::seeded(Pattern::GosperGun, &mut rng());
        assert_eq!(gun.population(), 36);
        assert!(gun.is_alive(40, 4));

        let mut r = Board::seeded(Pattern::RPentomino, &mut rng());
        assert_eq!(r.population(), 5);
        r.step();
        assert_eq!(r.population(), 6);
    }

    #[test]
    fn random_seed_stays_on_the_board() {
        let board = Board::seeded(Pattern::Random, &mut rng());
        assert!(board.population() > 0);
        assert!(board.rows.iter().all(|row| row & !ROW_MASK == 0));
        assert_ne!(board, Board::seeded(Pattern::Random, &mut SmallRng::seed_from_u64(8)));
    }

    #[test]
    fn cells_map_to_layout_pixels() {
        let board = Board::with_cells(&[(2, 1), (51, 34)]);
        let cells: std::vec::Vec<Point> = board.live_cells().collect();
        assert_eq!(cells, [Point::new(10, 5), Point::new(255, 170)]);
        assert!(!board.is_alive(WIDTH, 0));
    }
}
