//! Display ad slots and their one-shot initialization

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const CLIENT_ID_PREFIX: &str = "ca-pub-";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AdSenseConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub top_banner_slot: String,
    #[serde(default)]
    pub banner_slot: String,
    #[serde(default)]
    pub footer_banner_slot: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdPlacement {
    Top,
    Banner,
    Footer,
}

impl AdSenseConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.starts_with(CLIENT_ID_PREFIX)
    }

    /// Slot id for `placement`, if one is set.
    pub fn slot(&self, placement: AdPlacement) -> Option<&str> {
        let slot = match placement {
            AdPlacement::Top => &self.top_banner_slot,
            AdPlacement::Banner => &self.banner_slot,
            AdPlacement::Footer => &self.footer_banner_slot,
        };
        let slot = slot.trim();
        (!slot.is_empty()).then_some(slot)
    }
}

/// The ad network script that fills slots.
pub trait AdScript {
    fn is_available(&self) -> bool;
    fn push(&self, slot_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdSlotState {
    Uninitialized,
    /// Waiting for the ad script to load.
    Pending,
    Pushed,
    Fallback,
}

/// A single ad unit. The slot is pushed to the ad network at most once;
/// `Pushed` and `Fallback` absorb every further event until `reset`.
#[derive(Debug, Clone)]
pub struct AdSlot {
    slot_id: String,
    state: AdSlotState,
}

impl AdSlot {
    pub fn new(slot_id: &str) -> Self {
        Self {
            slot_id: slot_id.to_string(),
            state: AdSlotState::Uninitialized,
        }
    }

    pub fn slot_id(&self) -> &str {
        &self.slot_id
    }

    pub fn state(&self) -> AdSlotState {
        self.state
    }

    /// Starts over with a new slot id.
    pub fn reset(&mut self, slot_id: &str) {
        self.slot_id = slot_id.to_string();
        self.state = AdSlotState::Uninitialized;
    }

    pub fn mount(&mut self, config: &AdSenseConfig, script: &dyn AdScript) -> AdSlotState {
        if self.state != AdSlotState::Uninitialized {
            return self.state;
        }
        if !config.is_configured() || self.slot_id.trim().is_empty() {
            debug!(slot = %self.slot_id, "Ad slot not configured");
            self.state = AdSlotState::Fallback;
            return self.state;
        }
        if script.is_available() {
            self.push(script);
        } else {
            debug!(slot = %self.slot_id, "Ad script not loaded, waiting");
            self.state = AdSlotState::Pending;
        }
        self.state
    }

    /// The ad script finished loading.
    pub fn script_ready(&mut self, script: &dyn AdScript) -> AdSlotState {
        if self.state == AdSlotState::Pending {
            self.push(script);
        }
        self.state
    }

    /// The wait for the ad script elapsed.
    pub fn timeout_elapsed(&mut self, script: &dyn AdScript) -> AdSlotState {
        if self.state == AdSlotState::Pending {
            if script.is_available() {
                self.push(script);
            } else {
                debug!(slot = %self.slot_id, "Ad script did not load in time");
                self.state = AdSlotState::Fallback;
            }
        }
        self.state
    }

    fn push(&mut self, script: &dyn AdScript) {
        self.state = match script.push(&self.slot_id) {
            Ok(()) => AdSlotState::Pushed,
            Err(e) => {
                warn!(slot = %self.slot_id, error = %e, "Ad initialization failed");
                AdSlotState::Fallback
            }
        };
    }
}
