pub mod canvas;
pub mod check;
pub mod evaluate;
pub mod snapshot;

pub use canvas::Layout;
pub use evaluate::Metrics;
pub use snapshot::Snapshot;
