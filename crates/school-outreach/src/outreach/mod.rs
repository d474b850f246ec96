pub mod import;
pub mod participation;
