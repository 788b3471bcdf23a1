//! Pickup verification codes.
//!
//! The expected code is presented to the requester when the vehicle reaches
//! the pickup point.  The responder types what the requester reads out into a
//! [`CodeEntry`]; only an exact, full-length match unlocks `Onboard`.

use std::fmt;

use ra_core::SimRng;

use crate::{TripError, TripResult};

/// A fixed-length numeric code.  Never mutated after construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Accept a non-empty string of ASCII digits.
    pub fn new(code: impl Into<String>) -> TripResult<Self> {
        let code = code.into();
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TripError::MalformedCode(code));
        }
        Ok(Self(code))
    }

    /// Draw `len` digits (at least one) from `rng`.
    pub fn random(rng: &mut SimRng, len: usize) -> Self {
        let code = (0..len.max(1))
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compare a complete entry.  A well-formed entry of the right length is
    /// `Ok(true)` or `Ok(false)`; anything else is `MalformedCode`.
    pub fn check(&self, entry: &str) -> TripResult<bool> {
        if entry.len() != self.0.len() || !entry.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TripError::MalformedCode(entry.to_owned()));
        }
        Ok(entry == self.0)
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep codes out of debug logs.
        write!(f, "VerificationCode(len={})", self.0.len())
    }
}

/// Digits typed so far on the responder side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeEntry {
    digits: String,
}

impl CodeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one character.  Non-digits are ignored; returns whether the
    /// character was taken.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_ascii_digit() {
            self.digits.push(c);
            true
        } else {
            false
        }
    }

    /// Remove the last digit, if any.
    pub fn backspace(&mut self) -> Option<char> {
        self.digits.pop()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}

impl From<&str> for CodeEntry {
    /// Raw text, kept verbatim so malformed input can be rejected later.
    fn from(s: &str) -> Self {
        Self { digits: s.to_owned() }
    }
}
