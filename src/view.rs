use crate::game::{FinishReason, RunState};
use crate::point::Point;
use crate::world::{Cell, World};
use colored::Colorize;
use std::fmt::Write as _;

/// Renders the world to a string the terminal prints in one go.
pub struct View;

impl View {
    pub fn clear_screen() {
        print!("{}[2J", 27 as char);
        print!("{}[1;1H", 27 as char);
    }

    pub fn render(world: &World, head: Point, score: u32, state: RunState) -> String {
        let mut out = String::new();

        out.push('▗');
        for _ in 0..world.width() {
            out.push_str("▄▄");
        }
        out.push_str("▖\n");

        for y in 0..world.height() {
            out.push('▐');
            for x in 0..world.width() {
                let position = Point::new(x, y);
                match world.cell(position) {
                    Cell::Empty => out.push_str("  "),
                    Cell::Food => {
                        let _ = write!(out, "{}", "♦ ".red());
                    }
                    Cell::Snake(_) => {
                        if position == head {
                            let _ = write!(out, "{}", "Ӫ ".yellow());
                        } else {
                            let _ = write!(out, "{}", "⏺ ".green());
                        }
                    }
                }
            }
            out.push_str("▌\n");
        }

        out.push('▝');
        for _ in 0..world.width() {
            out.push_str("▀▀");
        }
        out.push_str("▘\n");

        let _ = writeln!(out, "Points: {score}");
        match state {
            RunState::Running => {}
            RunState::Paused => out.push_str("Game paused.\n"),
            RunState::Over(reason) => {
                match reason {
                    FinishReason::BoardFull => out.push_str("You win! The board is full.\n"),
                    FinishReason::HitWall | FinishReason::HitSelf => {
                        out.push_str("Game over!\n");
                    }
                }
                out.push_str("Press r to restart or q to quit.\n");
            }
        }
        out
    }
}
