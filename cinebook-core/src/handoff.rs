//! Versioned hand-off envelopes between independently loaded screens.
//!
//! Each slot holds one [`Envelope`]. Readers treat a missing slot, a value
//! that does not decode, a foreign schema version or a payload of the wrong
//! stage as "no context".
use serde::{Deserialize, Serialize};

use crate::KeyValueStore;
use crate::draft::BookingDraft;
use crate::error::StoreError;
use crate::store::{read_json, remove, write_json};

pub const HANDOFF_VERSION: u32 = 1;

/// Well-known storage slots used by the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandoffSlot {
    /// Show picked, no seats yet.
    CurrentBooking,
    /// Seats confirmed, amount and booking id assigned.
    FinalizedBooking,
}

impl HandoffSlot {
    pub const ALL: [Self; 2] = [Self::CurrentBooking, Self::FinalizedBooking];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CurrentBooking => "cinebook.currentBooking",
            Self::FinalizedBooking => "cinebook.finalBooking",
        }
    }
}

/// Stage-tagged payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "draft", rename_all = "snake_case")]
pub enum Handoff {
    ShowSelected(BookingDraft),
    SeatsConfirmed(BookingDraft),
}

impl Handoff {
    #[must_use]
    pub const fn slot(&self) -> HandoffSlot {
        match self {
            Self::ShowSelected(_) => HandoffSlot::CurrentBooking,
            Self::SeatsConfirmed(_) => HandoffSlot::FinalizedBooking,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &BookingDraft {
        match self {
            Self::ShowSelected(draft) | Self::SeatsConfirmed(draft) => draft,
        }
    }

    #[must_use]
    pub fn into_draft(self) -> BookingDraft {
        match self {
            Self::ShowSelected(draft) | Self::SeatsConfirmed(draft) => draft,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    pub payload: Handoff,
}

impl Envelope {
    #[must_use]
    pub const fn new(payload: Handoff) -> Self {
        Self {
            version: HANDOFF_VERSION,
            payload,
        }
    }
}

/// Write a hand-off into its slot.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn publish<S>(store: &S, handoff: Handoff) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let key = handoff.slot().key();
    write_json(store, key, &Envelope::new(handoff))
}

/// Read the draft in `slot`, if the slot holds valid context for it.
///
/// # Errors
///
/// Only backend failures are errors; unusable contents read as `None`.
pub fn read_slot<S>(store: &S, slot: HandoffSlot) -> Result<Option<BookingDraft>, StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let envelope: Envelope = match read_json(store, slot.key()) {
        Ok(Some(envelope)) => envelope,
        Ok(None) => return Ok(None),
        Err(StoreError::Serialization(err)) => {
            log::warn!("ignoring unreadable hand-off in {}: {err}", slot.key());
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    if envelope.version != HANDOFF_VERSION {
        log::warn!(
            "ignoring hand-off in {} with schema version {}",
            slot.key(),
            envelope.version
        );
        return Ok(None);
    }
    if envelope.payload.slot() != slot {
        log::warn!("ignoring hand-off of the wrong stage in {}", slot.key());
        return Ok(None);
    }
    Ok(Some(envelope.payload.into_draft().normalized()))
}

/// Clear one slot.
///
/// # Errors
///
/// Returns an error if the store rejects the removal.
pub fn clear_slot<S>(store: &S, slot: HandoffSlot) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
{
    remove(store, slot.key())
}

/// Clear every hand-off slot.
///
/// # Errors
///
/// Returns an error if the store rejects a removal.
pub fn clear_all<S>(store: &S) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
{
    for slot in HandoffSlot::ALL {
        clear_slot(store, slot)?;
    }
    Ok(())
}
