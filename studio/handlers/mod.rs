pub mod diagnose;
pub mod diseases;
