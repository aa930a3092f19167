//! Squad Tactics - per-turn decision engine for a four-unit squad

pub mod battlefield;
pub mod core;
pub mod tactics;
