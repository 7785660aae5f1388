//! Interrupt-safe storage cells
//!
//! State written from interrupt handlers and read by the main loop lives in
//! these cells. Every method is infallible and bounded so it may be called
//! from interrupt context.
//!
//! - [`IsrCell`] guards any `Copy` value with a critical section. Use it for
//!   values wider than the platform's single-instruction access width.
//! - [`ByteCell`] holds one byte. Without `hardware-atomic` it is an
//!   [`IsrCell<u8>`]; with it, read-modify-write maps to native atomics.

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

#[cfg(feature = "hardware-atomic")]
use core::sync::atomic::{AtomicU8, Ordering};

/// A `Copy` value shared between interrupt handlers and the main loop
///
/// Reads and writes open a critical section, so a multi-byte value is never
/// observed half-written. Use the `*_in` variants to fold several cells into
/// one critical section.
#[derive(Debug)]
pub struct IsrCell<T: Copy> {
    inner: Mutex<Cell<T>>,
}

impl<T: Copy> IsrCell<T> {
    /// Creates a cell holding `value`
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(value)),
        }
    }

    /// Reads the value with interrupts excluded
    pub fn get(&self) -> T {
        critical_section::with(|cs| self.get_in(cs))
    }

    /// Writes the value with interrupts excluded
    pub fn set(&self, value: T) {
        critical_section::with(|cs| self.set_in(cs, value))
    }

    /// Applies `f` to the value as one uninterruptible step and returns the
    /// new value
    pub fn update<F>(&self, f: F) -> T
    where
        F: FnOnce(T) -> T,
    {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let next = f(cell.get());
            cell.set(next);
            next
        })
    }

    /// Reads the value inside an already-open critical section
    pub fn get_in(&self, cs: CriticalSection<'_>) -> T {
        self.inner.borrow(cs).get()
    }

    /// Writes the value inside an already-open critical section
    pub fn set_in(&self, cs: CriticalSection<'_>, value: T) {
        self.inner.borrow(cs).set(value)
    }
}

impl<T: Copy + Default> Default for IsrCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A single byte shared between interrupt handlers and the main loop
///
/// Plain loads and stores of one byte never tear. Read-modify-write
/// operations (`fetch_or`, increments) still need protection against an
/// interrupt landing between the read and the write.
///
/// # Concurrency Behavior
/// - **Without `hardware-atomic`**: every operation opens a critical section
/// - **With `hardware-atomic`**: operations are native atomic instructions
#[derive(Debug)]
pub struct ByteCell {
    #[cfg(not(feature = "hardware-atomic"))]
    inner: IsrCell<u8>,

    #[cfg(feature = "hardware-atomic")]
    inner: AtomicU8,
}

impl ByteCell {
    /// Creates a cell holding `value`
    pub const fn new(value: u8) -> Self {
        #[cfg(not(feature = "hardware-atomic"))]
        {
            Self {
                inner: IsrCell::new(value),
            }
        }

        #[cfg(feature = "hardware-atomic")]
        {
            Self {
                inner: AtomicU8::new(value),
            }
        }
    }

    /// Reads the byte
    pub fn load(&self) -> u8 {
        #[cfg(not(feature = "hardware-atomic"))]
        {
            self.inner.get()
        }

        #[cfg(feature = "hardware-atomic")]
        {
            self.inner.load(Ordering::Relaxed)
        }
    }

    /// Reads the byte inside an already-open critical section
    pub fn load_in(&self, cs: CriticalSection<'_>) -> u8 {
        #[cfg(not(feature = "hardware-atomic"))]
        {
            self.inner.get_in(cs)
        }

        #[cfg(feature = "hardware-atomic")]
        {
            let _ = cs;
            self.inner.load(Ordering::Relaxed)
        }
    }

    /// Writes the byte
    pub fn store(&self, value: u8) {
        #[cfg(not(feature = "hardware-atomic"))]
        {
            self.inner.set(value)
        }

        #[cfg(feature = "hardware-atomic")]
        {
            self.inner.store(value, Ordering::Relaxed)
        }
    }

    /// Sets the bits in `bits` and returns the previous byte
    pub fn fetch_or(&self, bits: u8) -> u8 {
        #[cfg(not(feature = "hardware-atomic"))]
        {
            let mut previous = 0;
            self.inner.update(|value| {
                previous = value;
                value | bits
            });
            previous
        }

        #[cfg(feature = "hardware-atomic")]
        {
            self.inner.fetch_or(bits, Ordering::Relaxed)
        }
    }

    /// Keeps only the bits in `bits` and returns the previous byte
    pub fn fetch_and(&self, bits: u8) -> u8 {
        #[cfg(not(feature = "hardware-atomic"))]
        {
            let mut previous = 0;
            self.inner.update(|value| {
                previous = value;
                value & bits
            });
            previous
        }

        #[cfg(feature = "hardware-atomic")]
        {
            self.inner.fetch_and(bits, Ordering::Relaxed)
        }
    }

    /// Adds one, wrapping from 255 to 0, and returns the new byte
    pub fn wrapping_increment(&self) -> u8 {
        #[cfg(not(feature = "hardware-atomic"))]
        {
            self.inner.update(|value| value.wrapping_add(1))
        }

        #[cfg(feature = "hardware-atomic")]
        {
            self.inner.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
        }
    }

    /// Adds one, stopping at 255, and returns the new byte
    pub fn saturating_increment(&self) -> u8 {
        #[cfg(not(feature = "hardware-atomic"))]
        {
            self.inner.update(|value| value.saturating_add(1))
        }

        #[cfg(feature = "hardware-atomic")]
        {
            // The closure never returns None, so both arms carry the old value.
            let result = self
                .inner
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |value| {
                    Some(value.saturating_add(1))
                });
            let previous = match result {
                Ok(value) | Err(value) => value,
            };
            previous.saturating_add(1)
        }
    }
}

impl Default for ByteCell {
    fn default() -> Self {
        Self::new(0)
    }
}
