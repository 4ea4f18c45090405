pub mod dash_exception;
pub mod enums;
pub mod time;
pub mod utils;
