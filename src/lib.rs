//! Classic grid snake: a fixed-size discrete world, a segmented snake
//! that grows by eating randomly placed food, and a tick-driven
//! simulation controller. The terminal front end ([`app`], [`view`]) is a
//! thin shell around the engine ([`world`], [`snake`], [`game`]).

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod point;
pub mod snake;
pub mod view;
pub mod world;
