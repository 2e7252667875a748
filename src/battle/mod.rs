pub mod ai;
pub mod damage;
pub mod engine;
pub mod pacing;
pub mod runner;
pub mod state;

#[cfg(test)]
mod tests;
