use crate::error::GameError;
use crate::point::{Direction, Point};
use log::{debug, warn};
use rand::seq::IteratorRandom;
use rand::Rng;

/// Food never spawns on the outer two rows/columns of the board.
pub const SPAWN_MARGIN: i32 = 2;

/// Minimum Euclidean distance between a fresh food square and the snake's
/// head at spawn time.
pub const MIN_FOOD_DISTANCE: f64 = 5.0;

// Random probing gives up and enumerates the empty squares instead once
// the board gets crowded.
const MAX_SPAWN_ATTEMPTS: usize = 512;

/// What a single square of the world holds. A snake square remembers the
/// direction the head was travelling when it painted it; the tail reads
/// that tag back to follow corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Food,
    Snake(Direction),
}

/// The game world: a fixed-size occupancy grid plus the current food
/// square. Every in-bounds coordinate has exactly one cell value and at
/// most one food square exists at a time.
#[derive(Debug, Clone)]
pub struct World {
    width: i32,
    height: i32,
    squares: Vec<Cell>,
    food: Option<Point>,
}

impl World {
    pub fn new(width: i32, height: i32) -> World {
        debug_assert!(width >= 2 * SPAWN_MARGIN && height >= 2 * SPAWN_MARGIN);
        World {
            width,
            height,
            squares: vec![Cell::Empty; (width * height) as usize],
            food: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, position: Point) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    /// The current food square, if one exists.
    pub fn food(&self) -> Option<Point> {
        self.food
    }

    /// Read a square. Indexing outside the grid is a contract violation;
    /// movement code bounds-checks before it ever indexes.
    pub fn cell(&self, position: Point) -> Cell {
        debug_assert!(self.contains(position), "cell read at {position:?}");
        self.squares[self.index(position)]
    }

    /// Write a square, keeping the food bookkeeping consistent.
    pub fn set_cell(&mut self, position: Point, cell: Cell) {
        debug_assert!(self.contains(position), "cell write at {position:?}");
        if cell == Cell::Food {
            self.food = Some(position);
        } else if self.food == Some(position) {
            self.food = None;
        }
        let index = self.index(position);
        self.squares[index] = cell;
    }

    /// Place food directly on a square.
    pub fn add_food(&mut self, position: Point) {
        self.set_cell(position, Cell::Food);
    }

    /// Every square of the grid with its coordinate.
    pub fn cells(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| {
                let p = Point::new(x, y);
                (p, self.cell(p))
            })
        })
    }

    /// Place a new food square: uniformly sampled inside the spawn
    /// margin, on an empty square at least [`MIN_FOOD_DISTANCE`] away
    /// from `near` (normally the snake's head).
    ///
    /// Sampling is bounded. On a crowded board the empty margin squares
    /// are enumerated instead, relaxing the distance constraint if no far
    /// square is free. Only a margin with no empty square at all yields
    /// [`GameError::WorldFull`].
    pub fn spawn_food<R: Rng>(&mut self, rng: &mut R, near: Point) -> Result<Point, GameError> {
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let candidate = self.random_margin_point(rng);
            if self.cell(candidate) == Cell::Empty && candidate.distance(near) >= MIN_FOOD_DISTANCE
            {
                self.add_food(candidate);
                return Ok(candidate);
            }
        }

        let empties: Vec<Point> = self
            .margin_points()
            .filter(|&p| self.cell(p) == Cell::Empty)
            .collect();
        let picked = empties
            .iter()
            .copied()
            .filter(|p| p.distance(near) >= MIN_FOOD_DISTANCE)
            .choose(rng)
            .or_else(|| {
                warn!("no empty square far from {near:?}, relaxing the distance constraint");
                empties.into_iter().choose(rng)
            });
        match picked {
            Some(position) => {
                debug!("food placed at {position:?} after exhausting random probing");
                self.add_food(position);
                Ok(position)
            }
            None => Err(GameError::WorldFull),
        }
    }

    fn index(&self, position: Point) -> usize {
        (position.y * self.width + position.x) as usize
    }

    fn random_margin_point<R: Rng>(&self, rng: &mut R) -> Point {
        Point::new(
            rng.random_range(SPAWN_MARGIN..self.width - SPAWN_MARGIN),
            rng.random_range(SPAWN_MARGIN..self.height - SPAWN_MARGIN),
        )
    }

    fn margin_points(&self) -> impl Iterator<Item = Point> + '_ {
        (SPAWN_MARGIN..self.height - SPAWN_MARGIN).flat_map(move |y| {
            (SPAWN_MARGIN..self.width - SPAWN_MARGIN).map(move |x| Point::new(x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x5EED_F00D;

    fn food_count(world: &World) -> usize {
        world.cells().filter(|&(_, c)| c == Cell::Food).count()
    }

    #[test]
    fn new_world_is_empty() {
        let world = World::new(10, 10);
        assert!(world.cells().all(|(_, c)| c == Cell::Empty));
        assert_eq!(world.food(), None);
    }

    #[test]
    fn spawned_food_is_empty_far_and_inside_the_margin() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let head = Point::new(1, 3);
        for _ in 0..100 {
            let mut world = World::new(12, 12);
            let food = world.spawn_food(&mut rng, head).unwrap();
            assert!(food.x >= SPAWN_MARGIN && food.x < world.width() - SPAWN_MARGIN);
            assert!(food.y >= SPAWN_MARGIN && food.y < world.height() - SPAWN_MARGIN);
            assert!(food.distance(head) >= MIN_FOOD_DISTANCE);
            assert_eq!(world.cell(food), Cell::Food);
            assert_eq!(world.food(), Some(food));
            assert_eq!(food_count(&world), 1);
        }
    }

    #[test]
    fn spawn_never_lands_on_an_occupied_square() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut world = World::new(10, 10);
        // Fill the margin except one square, far corner from `near`.
        let free = Point::new(7, 7);
        for y in SPAWN_MARGIN..world.height() - SPAWN_MARGIN {
            for x in SPAWN_MARGIN..world.width() - SPAWN_MARGIN {
                let p = Point::new(x, y);
                if p != free {
                    world.set_cell(p, Cell::Snake(Direction::Up));
                }
            }
        }
        let food = world.spawn_food(&mut rng, Point::new(1, 1)).unwrap();
        assert_eq!(food, free);
    }

    #[test]
    fn spawn_relaxes_distance_before_giving_up() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut world = World::new(10, 10);
        // Only one free square and it is right next to `near`.
        let free = Point::new(2, 2);
        for y in SPAWN_MARGIN..world.height() - SPAWN_MARGIN {
            for x in SPAWN_MARGIN..world.width() - SPAWN_MARGIN {
                let p = Point::new(x, y);
                if p != free {
                    world.set_cell(p, Cell::Snake(Direction::Up));
                }
            }
        }
        let food = world.spawn_food(&mut rng, Point::new(2, 3)).unwrap();
        assert_eq!(food, free);
    }

    #[test]
    fn full_margin_reports_world_full() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut world = World::new(10, 10);
        for y in SPAWN_MARGIN..world.height() - SPAWN_MARGIN {
            for x in SPAWN_MARGIN..world.width() - SPAWN_MARGIN {
                world.set_cell(Point::new(x, y), Cell::Snake(Direction::Right));
            }
        }
        let result = world.spawn_food(&mut rng, Point::new(0, 0));
        assert!(matches!(result, Err(GameError::WorldFull)));
    }

    #[test]
    fn overwriting_the_food_square_clears_the_bookkeeping() {
        let mut world = World::new(10, 10);
        world.add_food(Point::new(5, 5));
        assert_eq!(world.food(), Some(Point::new(5, 5)));
        world.set_cell(Point::new(5, 5), Cell::Snake(Direction::Down));
        assert_eq!(world.food(), None);
        assert_eq!(food_count(&world), 0);
    }
}
