pub mod artifacts;
pub mod cli;
pub mod clinical;
pub mod ctx;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod schema;
