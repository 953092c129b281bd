pub mod activity_directory;
pub mod catalog;
