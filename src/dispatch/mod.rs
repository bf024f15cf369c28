//! Request hand-off between the interactive menu and analysis workers.
//!
//! - [`RequestQueue`]: unbounded FIFO; the menu holds a [`RequestSender`],
//!   the dispatcher the single [`RequestReceiver`]
//! - [`Dispatcher`]: consumer loop that validates each request against a
//!   configuration snapshot and launches a detached analysis task for it
//! - [`EventBus`] / [`AnalysisEvent`]: outcome notifications for the operator

pub mod dispatcher;
pub mod events;
pub mod queue;

pub use dispatcher::{DispatchSummary, Dispatcher};
pub use events::{AnalysisEvent, EventBus};
pub use queue::{RequestQueue, RequestReceiver, RequestSender};
