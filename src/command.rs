use crate::point::Direction;
use circular_buffer::CircularBuffer;
use log::debug;

/// A discrete command decoded from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Restart,
    Quit,
}

// Arrow keys arrive as the three-byte escape sequence ESC [ A..D.
const ESC: u8 = 27;
const BRACKET: u8 = 91;
const ARROW_UP: u8 = 65;
const ARROW_DOWN: u8 = 66;
const ARROW_RIGHT: u8 = 67;
const ARROW_LEFT: u8 = 68;
const SPACE: u8 = 32;
const KEY_RESTART: u8 = b'r';
const KEY_QUIT: u8 = b'q';

type InputBuffer = CircularBuffer<64, u8>;

/// Turns the raw bytes read off stdin into [`Command`] values. Unknown
/// bytes are dropped on arrival; a full buffer drops further input.
#[derive(Debug)]
pub struct Decoder {
    buffer: InputBuffer,
}

impl Default for Decoder {
    fn default() -> Decoder {
        Decoder::new()
    }
}

impl Decoder {
    pub fn new() -> Decoder {
        Decoder {
            buffer: InputBuffer::new(),
        }
    }

    pub fn push(&mut self, byte: u8) {
        match byte {
            ESC | BRACKET | ARROW_UP | ARROW_DOWN | ARROW_RIGHT | ARROW_LEFT | SPACE
            | KEY_RESTART | KEY_QUIT => {
                if !self.buffer.is_full() {
                    self.buffer.push_back(byte);
                }
            }
            _ => {}
        }
    }

    /// The next complete command, if the buffer holds one. A trailing
    /// partial escape sequence stays buffered until its remaining bytes
    /// arrive.
    pub fn next_command(&mut self) -> Option<Command> {
        while let Some(&byte) = self.buffer.nth_front(0) {
            match byte {
                SPACE => {
                    self.buffer.pop_front();
                    return Some(Command::TogglePause);
                }
                KEY_RESTART => {
                    self.buffer.pop_front();
                    return Some(Command::Restart);
                }
                KEY_QUIT => {
                    self.buffer.pop_front();
                    return Some(Command::Quit);
                }
                ESC => {
                    if self.buffer.len() < 3 {
                        return None;
                    }
                    if *self.buffer.nth_front(1)? != BRACKET {
                        self.buffer.pop_front();
                        continue;
                    }
                    let direction = match *self.buffer.nth_front(2)? {
                        ARROW_UP => Some(Direction::Up),
                        ARROW_DOWN => Some(Direction::Down),
                        ARROW_RIGHT => Some(Direction::Right),
                        ARROW_LEFT => Some(Direction::Left),
                        _ => None,
                    };
                    for _ in 0..3 {
                        self.buffer.pop_front();
                    }
                    if let Some(direction) = direction {
                        return Some(Command::Turn(direction));
                    }
                }
                _ => {
                    self.buffer.pop_front();
                }
            }
        }
        None
    }
}

/// The pending-direction slot between the keyboard and the simulation.
///
/// Multiple turns may arrive within one tick window; only the latest
/// accepted one is kept, and every one of them is compared against the
/// head direction confirmed at the last completed simulation step, never
/// against an intermediate request. This is what prevents a quick
/// up-then-left from folding the snake back onto itself.
#[derive(Debug, Clone, Copy)]
pub struct Commander {
    pending: Option<Direction>,
    previous: Direction,
}

impl Commander {
    pub fn new(initial: Direction) -> Commander {
        Commander {
            pending: None,
            previous: initial,
        }
    }

    /// Request a turn. Reversing the confirmed direction is ignored.
    pub fn request(&mut self, direction: Direction) {
        if direction == self.previous.opposite() {
            debug!("ignoring reverse into {direction:?}");
            return;
        }
        self.pending = Some(direction);
    }

    /// The direction to apply this tick, consumed once per step.
    pub fn take_pending(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    /// Record the head direction as of a completed simulation step.
    pub fn confirm(&mut self, direction: Direction) {
        self.previous = direction;
    }

    pub fn confirmed(&self) -> Direction {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_arrow(decoder: &mut Decoder, third: u8) {
        decoder.push(ESC);
        decoder.push(BRACKET);
        decoder.push(third);
    }

    #[test]
    fn decodes_arrow_sequences() {
        let mut decoder = Decoder::new();
        push_arrow(&mut decoder, ARROW_UP);
        push_arrow(&mut decoder, ARROW_LEFT);
        assert_eq!(
            decoder.next_command(),
            Some(Command::Turn(Direction::Up))
        );
        assert_eq!(
            decoder.next_command(),
            Some(Command::Turn(Direction::Left))
        );
        assert_eq!(decoder.next_command(), None);
    }

    #[test]
    fn decodes_single_byte_commands() {
        let mut decoder = Decoder::new();
        decoder.push(SPACE);
        decoder.push(KEY_RESTART);
        decoder.push(KEY_QUIT);
        assert_eq!(decoder.next_command(), Some(Command::TogglePause));
        assert_eq!(decoder.next_command(), Some(Command::Restart));
        assert_eq!(decoder.next_command(), Some(Command::Quit));
    }

    #[test]
    fn partial_escape_sequence_waits_for_the_rest() {
        let mut decoder = Decoder::new();
        decoder.push(ESC);
        decoder.push(BRACKET);
        assert_eq!(decoder.next_command(), None);
        decoder.push(ARROW_DOWN);
        assert_eq!(
            decoder.next_command(),
            Some(Command::Turn(Direction::Down))
        );
    }

    #[test]
    fn unknown_bytes_are_dropped() {
        let mut decoder = Decoder::new();
        decoder.push(b'x');
        decoder.push(0);
        assert_eq!(decoder.next_command(), None);
    }

    #[test]
    fn reverse_requests_never_take_effect() {
        let mut commander = Commander::new(Direction::Down);
        commander.request(Direction::Up);
        assert_eq!(commander.take_pending(), None);
    }

    #[test]
    fn latest_accepted_request_wins() {
        let mut commander = Commander::new(Direction::Down);
        commander.request(Direction::Left);
        commander.request(Direction::Right);
        assert_eq!(commander.take_pending(), Some(Direction::Right));
        assert_eq!(commander.take_pending(), None);
    }

    #[test]
    fn reverse_check_uses_the_confirmed_direction_not_the_pending_one() {
        // Moving right; the player taps up then left inside one tick
        // window. Up is fine, but left reverses the confirmed direction
        // and must not replace it.
        let mut commander = Commander::new(Direction::Right);
        assert_eq!(commander.confirmed(), Direction::Right);
        commander.request(Direction::Up);
        commander.request(Direction::Left);
        assert_eq!(commander.take_pending(), Some(Direction::Up));
        // Only a completed step moves the confirmed direction.
        commander.confirm(Direction::Up);
        assert_eq!(commander.confirmed(), Direction::Up);
    }
}
