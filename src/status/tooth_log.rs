//! Trigger tooth gap history

use core::cell::RefCell;

use critical_section::Mutex;

/// Number of gaps the history holds
pub const TOOTH_LOG_SIZE: usize = 512;

#[derive(Clone, Copy)]
struct Ring {
    gaps: [u16; TOOTH_LOG_SIZE],
    next: u16,
    wrapped: bool,
}

impl Ring {
    const EMPTY: Self = Self {
        gaps: [0; TOOTH_LOG_SIZE],
        next: 0,
        wrapped: false,
    };

    fn len(&self) -> usize {
        if self.wrapped {
            TOOTH_LOG_SIZE
        } else {
            usize::from(self.next)
        }
    }
}

/// Ring of tooth gap times written by the trigger interrupt
///
/// Once full, each new gap overwrites the oldest. The tuning tool's tooth
/// logger copies the history out oldest-first.
pub struct ToothLog {
    ring: Mutex<RefCell<Ring>>,
}

impl ToothLog {
    /// Creates an empty history
    pub const fn new() -> Self {
        Self {
            ring: Mutex::new(RefCell::new(Ring::EMPTY)),
        }
    }

    /// Appends one gap; called from the trigger interrupt
    pub fn record(&self, gap: u16) {
        critical_section::with(|cs| {
            let mut ring = self.ring.borrow_ref_mut(cs);
            let index = usize::from(ring.next);
            ring.gaps[index] = gap;
            if index + 1 == TOOTH_LOG_SIZE {
                ring.next = 0;
                ring.wrapped = true;
            } else {
                ring.next += 1;
            }
        });
    }

    /// Slot the next gap will be written to
    pub fn write_index(&self) -> usize {
        critical_section::with(|cs| usize::from(self.ring.borrow_ref(cs).next))
    }

    /// Number of gaps held
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.ring.borrow_ref(cs).len())
    }

    /// Returns true if no gap has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the history into `out`, oldest first, and returns the count
    ///
    /// The ring is copied in one critical section so the trigger interrupt
    /// cannot interleave with the read; ordering happens afterwards.
    pub fn copy_ordered(&self, out: &mut [u16; TOOTH_LOG_SIZE]) -> usize {
        let ring = critical_section::with(|cs| *self.ring.borrow_ref(cs));
        let len = ring.len();
        if ring.wrapped {
            let split = usize::from(ring.next);
            let (newer, older) = ring.gaps.split_at(split);
            out[..older.len()].copy_from_slice(older);
            out[older.len()..].copy_from_slice(newer);
        } else {
            out[..len].copy_from_slice(&ring.gaps[..len]);
        }
        len
    }

    /// Empties the history
    pub fn clear(&self) {
        critical_section::with(|cs| *self.ring.borrow_ref_mut(cs) = Ring::EMPTY);
    }
}

impl Default for ToothLog {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ToothLog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToothLog")
            .field("len", &self.len())
            .field("write_index", &self.write_index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_history() {
        let log = ToothLog::new();
        assert!(log.is_empty());
        for gap in [100, 200, 300] {
            log.record(gap);
        }

        let mut out = [0u16; TOOTH_LOG_SIZE];
        assert_eq!(log.copy_ordered(&mut out), 3);
        assert_eq!(&out[..3], &[100, 200, 300]);
        assert_eq!(log.write_index(), 3);
    }

    #[test]
    fn test_wraps_and_orders_oldest_first() {
        let log = ToothLog::new();
        for gap in 0..(TOOTH_LOG_SIZE as u16 + 10) {
            log.record(gap);
        }
        assert_eq!(log.len(), TOOTH_LOG_SIZE);
        assert_eq!(log.write_index(), 10);

        let mut out = [0u16; TOOTH_LOG_SIZE];
        assert_eq!(log.copy_ordered(&mut out), TOOTH_LOG_SIZE);
        assert_eq!(out[0], 10);
        assert_eq!(out[TOOTH_LOG_SIZE - 1], TOOTH_LOG_SIZE as u16 + 9);
        assert!(out.windows(2).all(|pair| pair[1] == pair[0] + 1));
    }

    #[test]
    fn test_clear() {
        let log = ToothLog::new();
        log.record(5);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.write_index(), 0);
    }
}
