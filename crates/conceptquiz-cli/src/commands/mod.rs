pub mod init;
pub mod play;
pub mod saved;
pub mod search;
