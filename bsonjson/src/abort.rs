// SPDX-License-Identifier: Apache-2.0

use core::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag polled by the decoder between input chunks and by the
/// encoder between visited entries.
pub trait AbortSignal {
    fn is_aborted(&self) -> bool;
}

/// A signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAbort;

impl AbortSignal for NeverAbort {
    fn is_aborted(&self) -> bool {
        false
    }
}

impl AbortSignal for AtomicBool {
    fn is_aborted(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: AbortSignal + ?Sized> AbortSignal for &T {
    fn is_aborted(&self) -> bool {
        (**self).is_aborted()
    }
}
