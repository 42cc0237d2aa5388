pub mod events;
pub mod logging;

pub use events::{EventSink, MemorySink, PipelineEvent, TracingSink};
