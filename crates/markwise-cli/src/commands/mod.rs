pub mod compare;
pub mod doubt;
pub mod grade;
pub mod init;
pub mod insights;
pub mod list_models;
pub mod validate;
