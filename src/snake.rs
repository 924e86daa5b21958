use crate::error::GameError;
use crate::point::{Direction, Point};
use crate::world::{Cell, World};
use std::collections::VecDeque;

pub const INITIAL_LENGTH: usize = 3;

const START_COLUMN: i32 = 1;
const START_ROW: i32 = 1;

/// A position/direction pair for one end of the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    pub position: Point,
    pub direction: Direction,
}

/// What a collision was with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
}

/// The result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Continued,
    Ate,
    Collided(Collision),
}

/// The player's snake.
///
/// The segment deque (front = head) is the authoritative record of which
/// squares the body occupies. The grid's direction tags are maintained in
/// parallel: the head stamps every square it leaves with the direction it
/// left in, and the tail reads that tag back when it enters the square,
/// which is how it follows the corners the head turned at. A tail read
/// that finds anything but a snake square is a broken invariant and fails
/// with [`GameError::TailOffTrack`].
#[derive(Debug, Clone)]
pub struct Snake {
    head: Vector,
    tail: Vector,
    body: VecDeque<Point>,
}

impl Snake {
    /// Create the starting snake and paint it into the world: a vertical
    /// run of [`INITIAL_LENGTH`] squares from (1,1) down, head at the
    /// bottom, both ends travelling down.
    pub fn new(world: &mut World) -> Snake {
        let mut body = VecDeque::with_capacity(INITIAL_LENGTH);
        for i in 0..INITIAL_LENGTH as i32 {
            let segment = Point::new(START_COLUMN, START_ROW + i);
            world.set_cell(segment, Cell::Snake(Direction::Down));
            body.push_front(segment);
        }
        Snake {
            head: Vector {
                position: Point::new(START_COLUMN, START_ROW + INITIAL_LENGTH as i32 - 1),
                direction: Direction::Down,
            },
            tail: Vector {
                position: Point::new(START_COLUMN, START_ROW),
                direction: Direction::Down,
            },
            body,
        }
    }

    pub fn head(&self) -> Vector {
        self.head
    }

    pub fn tail(&self) -> Vector {
        self.tail
    }

    /// Number of squares the body occupies.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Point the head somewhere new. The no-reverse rule is enforced at
    /// the input boundary, not here; the tail direction is never set
    /// externally.
    pub fn set_head_direction(&mut self, direction: Direction) {
        self.head.direction = direction;
    }

    /// Advance the snake by one square.
    ///
    /// The collision check runs strictly before any mutation, so a doomed
    /// move leaves the grid untouched. Eating grows the snake by skipping
    /// the tail move for this step: the head advances, the tail stays put.
    pub fn advance(&mut self, world: &mut World) -> Result<MoveOutcome, GameError> {
        let next = self.head.position + self.head.direction.vector();
        if let Some(collision) = self.detect_collision(world, next) {
            return Ok(MoveOutcome::Collided(collision));
        }

        // The departing square keeps the direction the head left it in;
        // this is the corner tag the tail follows later.
        world.set_cell(self.head.position, Cell::Snake(self.head.direction));
        let ate = world.cell(next) == Cell::Food;
        self.head.position = next;
        self.body.push_front(next);
        world.set_cell(next, Cell::Snake(self.head.direction));

        if ate {
            return Ok(MoveOutcome::Ate);
        }
        self.advance_tail(world)?;
        Ok(MoveOutcome::Continued)
    }

    fn detect_collision(&self, world: &World, next: Point) -> Option<Collision> {
        if !world.contains(next) {
            return Some(Collision::Wall);
        }
        if matches!(world.cell(next), Cell::Snake(_)) {
            return Some(Collision::SelfBite);
        }
        None
    }

    fn advance_tail(&mut self, world: &mut World) -> Result<(), GameError> {
        let vacated = self.body.pop_back().ok_or(GameError::TailOffTrack {
            x: self.tail.position.x,
            y: self.tail.position.y,
        })?;
        debug_assert_eq!(vacated, self.tail.position);
        world.set_cell(vacated, Cell::Empty);

        let entered = self.tail.position + self.tail.direction.vector();
        debug_assert_eq!(self.body.back(), Some(&entered));
        match world.cell(entered) {
            Cell::Snake(direction) => {
                self.tail = Vector {
                    position: entered,
                    direction,
                };
                Ok(())
            }
            _ => Err(GameError::TailOffTrack {
                x: entered.x,
                y: entered.y,
            }),
        }
    }
}
