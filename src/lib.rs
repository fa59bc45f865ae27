pub mod config;
pub mod load;
pub mod pg;
pub mod process;
