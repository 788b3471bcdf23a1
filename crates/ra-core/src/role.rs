//! Participant roles on the sync channel.
//!
//! Participants are identified by role only, never by identity.  The same
//! interpolator and channel code runs on both sides; `Role` is the parameter
//! that tells them apart.

/// Which side of the dispatch a process plays.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    /// The party asking for help.  Holds read-only mirrors of trip state.
    Requester,
    /// The driver.  Owns the authoritative trip phase and vehicle position.
    Responder,
}

impl Role {
    /// The other participant.
    #[inline]
    pub fn peer(self) -> Role {
        match self {
            Role::Requester => Role::Responder,
            Role::Responder => Role::Requester,
        }
    }

    /// `true` for the side whose trip state is authoritative.
    #[inline]
    pub fn is_authoritative(self) -> bool {
        matches!(self, Role::Responder)
    }

    /// Human-readable label, useful for trace column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Requester => "requester",
            Role::Responder => "responder",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
