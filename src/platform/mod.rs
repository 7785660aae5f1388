//! Platform-specific constants
//!
//! This module provides per-target constants that shape storage layout, serial
//! buffering and interrupt-sharing decisions without requiring HAL dependencies.
//! Choose one platform feature per build. If several are enabled, the first of
//! `avr`, `cortex-m`, `riscv` wins.

/// Platform-specific constants for 8-bit AVR (ATmega2560 class)
#[cfg(feature = "avr")]
pub mod constants {
    /// Widest integer the CPU reads or writes in a single instruction
    pub const ATOMIC_WIDTH_BYTES: usize = 1;

    /// Hardware serial receive buffer length in bytes
    pub const SERIAL_BUFFER_SIZE: usize = 64;

    /// Physical page size of the persistent storage medium
    pub const STORAGE_PAGE_SIZE: usize = 128;

    /// Capacity of the persistent storage medium in bytes
    pub const STORAGE_CAPACITY: usize = 4096;

    /// ADC resolution in bits
    pub const ADC_RESOLUTION_BITS: u8 = 10;

    /// Platform name
    pub const PLATFORM_NAME: &str = "AVR";
}

/// Platform-specific constants for Cortex-M
#[cfg(all(feature = "cortex-m", not(feature = "avr")))]
pub mod constants {
    /// Widest integer the CPU reads or writes in a single instruction
    pub const ATOMIC_WIDTH_BYTES: usize = 4;

    /// Hardware serial receive buffer length in bytes
    pub const SERIAL_BUFFER_SIZE: usize = 64;

    /// Physical page size of the persistent storage medium
    pub const STORAGE_PAGE_SIZE: usize = 128;

    /// Capacity of the persistent storage medium in bytes
    pub const STORAGE_CAPACITY: usize = 4096;

    /// ADC resolution in bits
    pub const ADC_RESOLUTION_BITS: u8 = 10;

    /// Platform name
    pub const PLATFORM_NAME: &str = "Cortex-M";
}

/// Platform-specific constants for RISC-V
#[cfg(all(feature = "riscv", not(any(feature = "avr", feature = "cortex-m"))))]
pub mod constants {
    /// Widest integer the CPU reads or writes in a single instruction
    pub const ATOMIC_WIDTH_BYTES: usize = 4;

    /// Hardware serial receive buffer length in bytes
    pub const SERIAL_BUFFER_SIZE: usize = 128;

    /// Physical page size of the persistent storage medium
    pub const STORAGE_PAGE_SIZE: usize = 128;

    /// Capacity of the persistent storage medium in bytes
    pub const STORAGE_CAPACITY: usize = 8192;

    /// ADC resolution in bits
    pub const ADC_RESOLUTION_BITS: u8 = 10;

    /// Platform name
    pub const PLATFORM_NAME: &str = "RISC-V";
}

/// Default platform constants (when no specific platform is selected)
///
/// Mirrors the AVR values so host builds exercise the tightest layout.
#[cfg(not(any(feature = "avr", feature = "cortex-m", feature = "riscv")))]
pub mod constants {
    /// Widest integer the CPU reads or writes in a single instruction
    pub const ATOMIC_WIDTH_BYTES: usize = 1;

    /// Hardware serial receive buffer length in bytes
    pub const SERIAL_BUFFER_SIZE: usize = 64;

    /// Physical page size of the persistent storage medium
    pub const STORAGE_PAGE_SIZE: usize = 128;

    /// Capacity of the persistent storage medium in bytes
    pub const STORAGE_CAPACITY: usize = 4096;

    /// ADC resolution in bits
    pub const ADC_RESOLUTION_BITS: u8 = 10;

    /// Platform name
    pub const PLATFORM_NAME: &str = "Generic";
}

/// Fill level above which the serial link should be serviced urgently
///
/// Half of the receive buffer. The core exposes the threshold; the link layer
/// decides what "urgent" means.
pub const SERIAL_BUFFER_THRESHOLD: usize = constants::SERIAL_BUFFER_SIZE / 2;

/// Largest raw ADC sample the platform produces
pub const ADC_MAX: u16 = (1u16 << constants::ADC_RESOLUTION_BITS) - 1;

/// Returns true once more than half of the serial receive buffer is filled
pub const fn serial_is_urgent(bytes_available: usize) -> bool {
    bytes_available > SERIAL_BUFFER_THRESHOLD
}

/// Returns true if a value of `width` bytes can tear when an interrupt
/// preempts a read or write of it
pub const fn needs_critical_section(width: usize) -> bool {
    width > constants::ATOMIC_WIDTH_BYTES
}
