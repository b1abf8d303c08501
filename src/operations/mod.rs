pub mod creation;
pub mod knot;
pub mod query;
