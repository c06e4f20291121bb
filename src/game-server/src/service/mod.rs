pub mod game_manager;
pub mod game_thread;
