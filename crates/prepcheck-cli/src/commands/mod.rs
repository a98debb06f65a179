pub mod batch;
pub mod check;
pub mod compare;
pub mod init;
pub mod list;
pub mod show;
pub mod validate;
