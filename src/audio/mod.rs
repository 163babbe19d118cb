pub mod output;
pub mod writer;
