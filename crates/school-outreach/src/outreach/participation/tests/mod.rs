pub(crate) mod common;

mod statistics;
