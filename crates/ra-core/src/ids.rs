//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  IDs are handed out by monotonic
//! counters owned by whoever mints them (interpolator, scheduler, channel);
//! a retired ID is never reused within one process.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The ID following `self` in minting order.
            #[inline(always)]
            pub fn next(self) -> $name {
                $name(self.0.wrapping_add(1))
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// One animation cycle of a `MotionInterpolator`.  Starting a new cycle
    /// retires the previous ID.
    pub struct CycleId(u64);
}

typed_id! {
    /// Cancellation token for a timer registered with a `Scheduler`.
    pub struct TimerToken(u64);
}

typed_id! {
    /// A participant attached to a sync channel.
    pub struct EndpointId(u64);
}

typed_id! {
    /// One logical help request broadcast by a requester.
    pub struct RequestId(u64);
}
