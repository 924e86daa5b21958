use crate::command::Commander;
use crate::config::Config;
use crate::error::GameError;
use crate::point::Direction;
use crate::snake::{Collision, MoveOutcome, Snake};
use crate::world::World;
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::Rng;

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    HitWall,
    HitSelf,
    /// Food spawning found no empty square: the snake has taken over the
    /// board. Terminal like a collision, but a win.
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Over(FinishReason),
}

/// What one scheduler tick amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Paused, over, or the speed divisor swallowed this tick.
    Skipped,
    Stepped(MoveOutcome),
    Finished(FinishReason),
}

/// The simulation controller. Owns the world, the snake, the pending
/// input slot and the score, and advances them one scheduler tick at a
/// time; the generic rng lets tests drive food placement with a seeded
/// generator.
#[derive(Debug)]
pub struct Game<R = ThreadRng> {
    rng: R,
    config: Config,
    world: World,
    snake: Snake,
    commander: Commander,
    score: u32,
    tick: u32,
    state: RunState,
}

impl Game<ThreadRng> {
    pub fn new(config: Config) -> Result<Game<ThreadRng>, GameError> {
        Game::new_with_rng(config, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub fn new_with_rng(config: Config, mut rng: R) -> Result<Game<R>, GameError> {
        config.validate()?;
        let (world, snake) = fresh_board(&config, &mut rng)?;
        info!(
            "new game: {}x{} world, one step per {} ticks",
            config.world_width, config.world_height, config.game_speed
        );
        Ok(Game {
            rng,
            commander: Commander::new(snake.head().direction),
            config,
            world,
            snake,
            score: 0,
            tick: 0,
            state: RunState::Running,
        })
    }

    /// One scheduler tick. Most ticks only advance the divisor counter; a
    /// simulation step runs every `game_speed`-th tick.
    pub fn update(&mut self) -> Result<Tick, GameError> {
        if self.state != RunState::Running {
            return Ok(Tick::Skipped);
        }
        self.tick += 1;
        if self.tick < self.config.game_speed {
            return Ok(Tick::Skipped);
        }
        self.tick = 0;
        self.step()
    }

    fn step(&mut self) -> Result<Tick, GameError> {
        if let Some(direction) = self.commander.take_pending() {
            self.snake.set_head_direction(direction);
        }
        match self.snake.advance(&mut self.world)? {
            MoveOutcome::Collided(collision) => {
                let reason = match collision {
                    Collision::Wall => FinishReason::HitWall,
                    Collision::SelfBite => FinishReason::HitSelf,
                };
                self.finish(reason);
                Ok(Tick::Finished(reason))
            }
            MoveOutcome::Ate => {
                self.score += 1;
                match self.world.spawn_food(&mut self.rng, self.snake.head().position) {
                    Ok(food) => {
                        debug!("score {}, next food at {food:?}", self.score);
                        self.commander.confirm(self.snake.head().direction);
                        Ok(Tick::Stepped(MoveOutcome::Ate))
                    }
                    Err(GameError::WorldFull) => {
                        self.finish(FinishReason::BoardFull);
                        Ok(Tick::Finished(FinishReason::BoardFull))
                    }
                    Err(other) => Err(other),
                }
            }
            MoveOutcome::Continued => {
                self.commander.confirm(self.snake.head().direction);
                Ok(Tick::Stepped(MoveOutcome::Continued))
            }
        }
    }

    /// Request a turn for the next simulation step. Kept while paused so
    /// a queued turn survives a pause, but only ever one of them.
    pub fn steer(&mut self, direction: Direction) {
        self.commander.request(direction);
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            RunState::Running => {
                self.state = RunState::Paused;
                info!("game paused");
            }
            RunState::Paused => {
                // The partial divisor count is dropped so resuming can
                // never fire an immediate step.
                self.tick = 0;
                self.state = RunState::Running;
                info!("game resumed");
            }
            RunState::Over(_) => {}
        }
    }

    /// Start over after a finished game: world, snake and score are
    /// recreated wholesale, the rng carries on.
    pub fn restart(&mut self) -> Result<(), GameError> {
        if !matches!(self.state, RunState::Over(_)) {
            return Ok(());
        }
        let (world, snake) = fresh_board(&self.config, &mut self.rng)?;
        self.commander = Commander::new(snake.head().direction);
        self.world = world;
        self.snake = snake;
        self.score = 0;
        self.tick = 0;
        self.state = RunState::Running;
        info!("game restarted");
        Ok(())
    }

    fn finish(&mut self, reason: FinishReason) {
        self.state = RunState::Over(reason);
        info!(
            "game over ({reason:?}) with score {} and length {}",
            self.score,
            self.snake.len()
        );
    }
}

impl<R> Game<R> {
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> RunState {
        self.state
    }
}

fn fresh_board<R: Rng>(config: &Config, rng: &mut R) -> Result<(World, Snake), GameError> {
    let mut world = World::new(config.world_width, config.world_height);
    let snake = Snake::new(&mut world);
    world.spawn_food(rng, snake.head().position)?;
    Ok((world, snake))
}
