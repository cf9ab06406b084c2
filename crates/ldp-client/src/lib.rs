//! Client library for Linked Data Platform (LDP) storage pods.
//!
//! The library manages resources under a single pod base URL:
//!
//! - Containers are collection resources whose URL ends with `/`; they are
//!   created idempotently and never inspected beyond an existence probe.
//! - Leaf resources live at `<container URL>/<name>` and hold one record
//!   set, an ordered sequence of scalar values serialized as
//!   newline-delimited text.
//!
//! All operations are blocking and best-effort: one attempt per request by
//! default, failures classified into [`PodError`] and reported rather than
//! escalated. [`PodOperations`] additionally offers the four operations in
//! non-throwing form for hosting frameworks that must never observe an
//! error.
//!
//! # Examples
//!
//! ```no_run
//! use ldp_client::{PodClient, PodConfig, PodResult, Record};
//!
//! fn main() -> PodResult<()> {
//!     let client = PodClient::new(PodConfig::new("https://pod.example.org/"))?;
//!
//!     client.create_container("measurements")?;
//!     client.publish_records(
//!         "measurements",
//!         "today.txt",
//!         &[Record::from("sensor-a"), Record::from(21.5)],
//!     )?;
//!
//!     let records = client.read_records("measurements", "today.txt")?;
//!     println!("{records:?}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod ops;
pub mod record;
pub mod urls;

pub use client::ContainerState;
pub use client::PodClient;
pub use config::PodConfig;
pub use error::PodError;
pub use error::PodResult;
pub use ops::PodOperations;
pub use record::parse_records;
pub use record::serialize_records;
pub use record::Record;
