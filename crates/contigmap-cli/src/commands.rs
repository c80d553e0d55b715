pub mod inspect;
pub mod map;
