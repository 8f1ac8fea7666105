pub mod backend;
pub mod model;
pub mod speech;
pub mod sse;
