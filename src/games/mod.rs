pub mod pong;
pub mod snake;
pub mod tower_defense;
