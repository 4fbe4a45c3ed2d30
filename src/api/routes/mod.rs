pub mod analysis;
pub mod meta;
