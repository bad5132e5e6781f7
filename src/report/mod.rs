pub mod console;
pub mod pdf;
