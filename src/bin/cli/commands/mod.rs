pub mod answer;
pub mod reset;
pub mod sets;
pub mod stack;
pub mod stats;
