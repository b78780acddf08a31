pub mod blocks;
pub mod health;
