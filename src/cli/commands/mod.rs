mod command_result;
pub mod extract;
pub mod helper;
pub mod init;
pub mod preset;

pub use command_result::*;
