pub mod domain;
pub mod ports;

pub use domain::{Chapter, NavigationDirection, NewSummary, Summary};
pub use ports::{PortError, PortResult, SummaryStore};
