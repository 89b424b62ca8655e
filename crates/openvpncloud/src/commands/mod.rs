pub mod apply;
pub mod data;
pub mod destroy;
pub mod import;
pub mod refresh;
pub mod schema;
pub mod state;
