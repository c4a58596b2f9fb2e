pub mod frontend;
pub mod num;
pub mod state;
