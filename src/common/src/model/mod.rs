pub mod game;
pub mod id;
pub mod match_state;
pub mod player;
pub mod round;
