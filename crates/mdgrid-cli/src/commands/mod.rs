pub mod analyze;
pub mod cell;
pub mod inspect;
