pub mod etl;
pub mod fetcher;
pub mod transformer;

pub use crate::domain::model::{Cell, FetchOutcome, FetchReport, FlattenedRow, InterventionFlags};
pub use crate::domain::ports::{EventSource, Storage};
pub use crate::utils::error::Result;
