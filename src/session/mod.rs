pub mod assessment;
pub mod gate;
pub mod source;
pub mod workspace;
