use crate::command::{Command, Decoder};
use crate::config::Config;
use crate::error::GameError;
use crate::game::Game;
use crate::view::View;
use log::{error, info};
use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;
use termios::{tcsetattr, Termios, ECHO, ICANON, TCSANOW};

const STDIN_FD: i32 = 0;
const IDLE_SLEEP_MS: u64 = 3;

/// Run the game in the current terminal until the player quits.
pub fn run(config: Config) -> Result<(), GameError> {
    let _raw = RawTerminal::enable()?;
    let keys = spawn_stdin_channel();
    let mut decoder = Decoder::new();
    let mut game = Game::new(config.clone())?;

    let frame = config.frame_duration();
    let mut last_frame = Instant::now();
    redraw(&game)?;

    loop {
        match keys.try_recv() {
            Ok(byte) => decoder.push(byte),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                error!("stdin reader disconnected");
                break;
            }
        }

        let mut handled_command = false;
        while let Some(command) = decoder.next_command() {
            match command {
                Command::Quit => {
                    info!("quit requested, final score {}", game.score());
                    println!("\nFinal score: {}", game.score());
                    return Ok(());
                }
                Command::Turn(direction) => game.steer(direction),
                Command::TogglePause => game.toggle_pause(),
                Command::Restart => game.restart()?,
            }
            handled_command = true;
        }
        if handled_command {
            redraw(&game)?;
        }

        if last_frame.elapsed() < frame {
            thread::sleep(std::time::Duration::from_millis(IDLE_SLEEP_MS));
            continue;
        }
        last_frame = Instant::now();

        match game.update()? {
            crate::game::Tick::Skipped => {}
            _ => redraw(&game)?,
        }
    }

    println!("\nFinal score: {}", game.score());
    Ok(())
}

fn redraw<R>(game: &Game<R>) -> Result<(), GameError> {
    View::clear_screen();
    print!(
        "{}",
        View::render(
            game.world(),
            game.snake().head().position,
            game.score(),
            game.state()
        )
    );
    io::stdout().flush()?;
    Ok(())
}

/// Feed raw stdin bytes through a channel so the frame loop never blocks
/// on the keyboard.
fn spawn_stdin_channel() -> Receiver<u8> {
    let (tx, rx) = mpsc::channel::<u8>();
    thread::spawn(move || {
        let mut stdin = io::stdin();
        let mut buffer = [0u8; 1];
        loop {
            if stdin.read_exact(&mut buffer).is_err() {
                break;
            }
            if tx.send(buffer[0]).is_err() {
                break;
            }
        }
    });
    rx
}

/// Puts stdin into raw mode (no echo, no line buffering) and restores the
/// previous settings on drop, whichever way `run` exits.
struct RawTerminal {
    original: Termios,
}

impl RawTerminal {
    fn enable() -> io::Result<RawTerminal> {
        let original = Termios::from_fd(STDIN_FD)?;
        let mut raw = original;
        raw.c_lflag &= !(ICANON | ECHO);
        tcsetattr(STDIN_FD, TCSANOW, &raw)?;
        Ok(RawTerminal { original })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(err) = tcsetattr(STDIN_FD, TCSANOW, &self.original) {
            error!("failed to restore terminal settings: {err}");
        }
    }
}
