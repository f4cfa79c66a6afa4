pub mod midi;
pub mod novation;
