pub mod check;
pub mod set;
pub mod show;
pub mod source;
