//! Page drivers
//!
//! [`PageDriver`] is the seam between the harness and the browser engine.
//! [`CdpPageDriver`] drives a real Chrome target; [`MockPageDriver`] runs
//! against an in-memory DOM for tests.

pub mod traits;
pub mod js;
pub mod cdp;
pub mod mock;

pub use cdp::CdpPageDriver;
pub use mock::{DomHook, MockDom, MockElement, MockPageDriver};
pub use traits::{ElementState, LoadState, PageDriver};
