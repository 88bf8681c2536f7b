pub mod review;
pub mod seed;
pub mod tokens;
