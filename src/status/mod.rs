//! Live engine status
//!
//! The status is split by writer:
//!
//! - [`InterruptShared`] holds the fields interrupt handlers write (speed,
//!   pulse width, squirt bits, second counters, tooth history). It is used
//!   through `&self` and normally lives in a `static`.
//! - [`LiveStatus`] holds everything the main loop writes and borrows the
//!   [`InterruptShared`] it pairs with.
//! - [`StatusSnapshot`] is a plain copy of both halves for the tuning link.
//!
//! # Example
//! ```rust
//! use ecucore::flags::EngineBit;
//! use ecucore::status::{InterruptShared, LiveStatus};
//!
//! static SHARED: InterruptShared = InterruptShared::new();
//!
//! let mut live = LiveStatus::new(&SHARED);
//! live.engine.set(EngineBit::Crank);
//! SHARED.set_rpm(180);
//!
//! let snapshot = live.snapshot();
//! assert_eq!(snapshot.rpm, 180);
//! assert!(snapshot.engine.contains(EngineBit::Crank));
//! ```

pub mod live;
pub mod shared;
pub mod snapshot;
pub mod tooth_log;

// Re-export main types
pub use live::LiveStatus;
pub use shared::{InterruptFields, InterruptShared, SharedSquirt};
pub use snapshot::{FRAME_LEN, StatusSnapshot};
pub use tooth_log::{TOOTH_LOG_SIZE, ToothLog};
