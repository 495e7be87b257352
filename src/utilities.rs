pub mod broadcast;
pub mod element;
