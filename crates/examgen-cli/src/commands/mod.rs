pub mod generate;
pub mod init;
pub mod key;
pub mod validate;
