pub mod averager;
pub mod compat;
pub mod effectiveness;
pub mod fusion;
