#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod client;
mod poller;
mod types;

pub use self::client::Client;
pub use self::poller::{FeedEvent, Poller};
pub use self::types::{Direction, LineStatus, LineStatusDetail, Prediction, PredictionId};
