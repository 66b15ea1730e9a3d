pub mod encode;
pub mod schema;
pub mod sink;

pub use schema::Metric;
pub use sink::{EmitFn, Emitters, Sample};
