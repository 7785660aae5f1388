#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
//! **Configuration, live status and calibration core for small-MCU engine control units**
//!
//! `ecucore` is the persistent configuration and live-state representation of
//! an engine control unit. Time-critical control code (fuel and ignition
//! scheduling, trigger decoding) reads it every loop, interrupt handlers
//! update part of it, and a tuning tool reads and writes it over a serial
//! link.
//!
//! ## Features
//!
//! - **Fixed 128-byte configuration pages** - explicit offset tables checked at compile time
//! - **Signature and version guarded storage** - incompatible images fall back to defaults
//! - **Interrupt-safe live status** - critical sections or native atomics per field
//! - **512-entry calibration tables** - rebuilt whole, swapped in atomically
//! - **No Dynamic Allocation** - everything is statically sized
//!
//! ## Feature Overview
//!
//! ### Platform-Specific Features - **pick one**
//! - `avr` - 8-bit AVR (ATmega2560)
//! - `cortex-m` - ARM Cortex-M
//! - `riscv` - RISC-V embedded processors
//!
//! ### Hardware Optimization Features
//! - `hardware` - Enable all hardware optimizations
//! - `hardware-atomic` - Native atomic read-modify-write for interrupt-shared bytes
//!
//! ### Diagnostics
//! - `diagnostics` - Log calibration clamping at debug level
//!
//! ### Serialization Features
//! - `serde` - Serde support; pages and the record set serialize as their wire bytes
//!
//! ## Platform Support Matrix
//!
//! | Feature | AVR | Cortex-M | RISC-V | Default |
//! |---------|-----|----------|--------|---------|
//! | **Native access width** | 1 byte | 4 bytes | 4 bytes | 1 byte |
//! | **Serial buffer** | 64 bytes | 64 bytes | 128 bytes | 64 bytes |
//! | **Storage capacity** | 4 KB | 4 KB | 8 KB | 4 KB |
//!
//! The firmware binary must provide a `critical-section` implementation for
//! its target.
//!
//! ## Quick Start
//!
//! ```rust
//! use ecucore::prelude::*;
//!
//! static SHARED: InterruptShared = InterruptShared::new();
//!
//! fn boot() -> EcuResult<()> {
//!     // Blank EEPROM: defaults are substituted and the reason reported
//!     let mut store = ConfigStore::new(MemoryStorage::<1024>::new());
//!     let outcome = store.load();
//!     assert!(outcome.used_defaults());
//!     let config = outcome.config;
//!
//!     let pins = PinMap::for_layout(config.page1.pin_mapping);
//!     assert!(pins.get(PinFunction::Injector(1)).is_assigned());
//!
//!     let tables = CalibrationSet::from_page(&config.page2)?;
//!     let mut live = LiveStatus::new(&SHARED);
//!     live.update_coolant(400, &tables.coolant);
//!
//!     store.burn_all(&config)?;
//!     Ok(())
//! }
//! # boot().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`config`] - configuration pages, the persisted record and its store
//! - [`status`] - live status split between interrupt and main-loop writers
//! - [`flags`] - engine and squirt state bit positions
//! - [`calibration`] - ADC calibration tables
//! - [`pins`] - board pin layouts
#![no_std]
#![deny(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::assertions_on_constants)]
#![allow(clippy::unnecessary_cast)]
#![cfg_attr(test, allow(unused_mut))]

// Core infrastructure modules
pub mod error;
pub mod platform;
pub mod sync;
pub mod traits;

// Engine state modules
pub mod calibration;
pub mod config;
pub mod flags;
pub mod pins;
pub mod status;

/// Prelude module of ecucore
///
/// Convenient re-exports for common ecucore types and traits
pub mod prelude {

    // Re-export core traits
    pub use crate::traits::*;

    // Re-export error types
    pub use crate::error::{EcuError, EcuResult};

    // Re-export configuration types
    pub use crate::config::{
        ConfigPage1, ConfigPage2, ConfigPage3, ConfigRecordSet, ConfigStore, LoadOutcome,
        MemoryStorage, PageId,
    };

    // Re-export live status types
    pub use crate::flags::{EngineBit, EngineState, SquirtBit, SquirtState};
    pub use crate::status::{InterruptShared, LiveStatus, StatusSnapshot};

    // Re-export calibration and pins
    pub use crate::calibration::{CalibrationPoint, CalibrationSet, CalibrationTable};
    pub use crate::pins::{BoardLayout, Pin, PinFunction, PinMap};
}
