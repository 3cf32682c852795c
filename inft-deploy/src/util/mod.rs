pub mod encode;
pub mod target;
