pub mod attendance;
pub mod game;
pub mod player;
