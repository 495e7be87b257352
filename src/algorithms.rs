pub mod combination;
pub mod interpolation;
pub mod transforms;
