mod migrations;
mod store;

pub use store::LociStore;
