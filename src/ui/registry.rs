//! Per-control busy state and percent indicators
//!
//! The registry owns everything that used to be hung off button elements:
//! the busy flag, the current percentage, its mode and the ramp timer. Each
//! indicator gets a fresh generation number; operations carry an
//! [`IndicatorToken`] and are ignored once a newer indicator replaced theirs,
//! so a late cleanup from an earlier submission can never touch a new one.

use crate::types::ControlId;
use crate::ui::ControlSurface;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

/// Who is currently driving an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorMode {
    /// Client-side time-based estimate
    Simulated,
    /// Derived from server-reported counts
    Authoritative,
}

/// Handle to one specific indicator on one control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorToken {
    control: ControlId,
    generation: u64,
}

impl IndicatorToken {
    /// Control the indicator is attached to
    pub const fn control(&self) -> &ControlId {
        &self.control
    }
}

#[derive(Debug)]
struct Indicator {
    generation: u64,
    percent: u8,
    mode: IndicatorMode,
    ramp: Option<AbortHandle>,
}

impl Indicator {
    fn stop_ramp(&mut self) {
        if let Some(ramp) = self.ramp.take() {
            ramp.abort();
        }
    }
}

#[derive(Debug, Default)]
struct ControlSlot {
    busy: bool,
    indicator: Option<Indicator>,
}

#[derive(Default)]
struct State {
    slots: HashMap<ControlId, ControlSlot>,
    next_generation: u64,
}

impl State {
    fn indicator_mut(&mut self, token: &IndicatorToken) -> Option<&mut Indicator> {
        self.slots
            .get_mut(&token.control)?
            .indicator
            .as_mut()
            .filter(|ind| ind.generation == token.generation)
    }
}

/// Busy-state manager and indicator owner for all trigger controls
pub struct ControlRegistry {
    surface: Arc<dyn ControlSurface>,
    state: Mutex<State>,
}

impl ControlRegistry {
    /// Create a registry rendering through `surface`
    pub fn new(surface: Arc<dyn ControlSurface>) -> Self {
        Self {
            surface,
            state: Mutex::new(State::default()),
        }
    }

    /// Surface used for rendering
    pub fn surface(&self) -> &Arc<dyn ControlSurface> {
        &self.surface
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State stays consistent even if a holder panicked mid-render
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    // === Busy flag ===

    /// Mark a control busy; no-op when already busy or when `None`
    pub fn set_busy(&self, control: Option<&ControlId>) {
        let Some(control) = control else { return };
        let mut state = self.lock();
        let slot = state.slots.entry(control.clone()).or_default();
        if !slot.busy {
            slot.busy = true;
            self.surface.set_busy(control, true);
        }
    }

    /// Restore a control; no-op when not busy or when `None`
    pub fn clear_busy(&self, control: Option<&ControlId>) {
        let Some(control) = control else { return };
        let mut state = self.lock();
        if let Some(slot) = state.slots.get_mut(control) {
            if slot.busy {
                slot.busy = false;
                self.surface.set_busy(control, false);
            }
        }
    }

    /// Whether a control is busy
    pub fn is_busy(&self, control: &ControlId) -> bool {
        self.lock().slots.get(control).is_some_and(|s| s.busy)
    }

    // === Percent indicator ===

    /// Start a new simulated indicator at 0%
    ///
    /// Any indicator already on the control is stopped and removed first.
    pub fn begin_indicator(&self, control: &ControlId) -> IndicatorToken {
        let mut state = self.lock();
        state.next_generation += 1;
        let generation = state.next_generation;
        let slot = state.slots.entry(control.clone()).or_default();
        if let Some(mut old) = slot.indicator.take() {
            debug!("replacing indicator {} on {control}", old.generation);
            old.stop_ramp();
            self.surface.remove_percent(control);
        }
        slot.indicator = Some(Indicator {
            generation,
            percent: 0,
            mode: IndicatorMode::Simulated,
            ramp: None,
        });
        self.surface.show_percent(control, 0);
        IndicatorToken {
            control: control.clone(),
            generation,
        }
    }

    /// Register the ramp task driving a simulated indicator
    ///
    /// The task is aborted right away if the indicator is already gone or
    /// authoritative.
    pub fn attach_ramp(&self, token: &IndicatorToken, ramp: AbortHandle) {
        let mut state = self.lock();
        match state.indicator_mut(token) {
            Some(ind) if ind.mode == IndicatorMode::Simulated => {
                ind.stop_ramp();
                ind.ramp = Some(ramp);
            }
            _ => ramp.abort(),
        }
    }

    /// Apply a simulated tick; returns `false` once the ramp should stop
    pub fn apply_simulated(&self, token: &IndicatorToken, percent: u8) -> bool {
        let mut state = self.lock();
        let Some(ind) = state.indicator_mut(token) else {
            return false;
        };
        if ind.mode != IndicatorMode::Simulated {
            return false;
        }
        if percent > ind.percent {
            ind.percent = percent;
            self.surface.show_percent(&token.control, percent);
        }
        true
    }

    /// Hand the indicator over to server-reported progress
    ///
    /// The ramp is aborted and every later simulated tick is rejected.
    pub fn switch_to_authoritative(&self, token: &IndicatorToken) {
        let mut state = self.lock();
        if let Some(ind) = state.indicator_mut(token) {
            ind.stop_ramp();
            ind.mode = IndicatorMode::Authoritative;
        }
    }

    /// Show a server-derived percentage (clamped to 100)
    pub fn apply_authoritative(&self, token: &IndicatorToken, percent: u8) {
        let mut state = self.lock();
        if let Some(ind) = state.indicator_mut(token) {
            if ind.mode == IndicatorMode::Authoritative {
                ind.percent = percent.min(100);
                self.surface.show_percent(&token.control, ind.percent);
            }
        }
    }

    /// Stop the ramp and force 100%; `false` if the indicator is gone
    pub fn complete(&self, token: &IndicatorToken) -> bool {
        let mut state = self.lock();
        let Some(ind) = state.indicator_mut(token) else {
            return false;
        };
        ind.stop_ramp();
        ind.mode = IndicatorMode::Authoritative;
        ind.percent = 100;
        self.surface.show_percent(&token.control, 100);
        true
    }

    /// Remove the indicator now
    pub fn remove_indicator(&self, token: &IndicatorToken) {
        let mut state = self.lock();
        let Some(slot) = state.slots.get_mut(&token.control) else {
            return;
        };
        if slot
            .indicator
            .as_ref()
            .is_some_and(|ind| ind.generation == token.generation)
        {
            if let Some(mut ind) = slot.indicator.take() {
                ind.stop_ramp();
            }
            self.surface.remove_percent(&token.control);
        }
    }

    /// Force 100% and remove the indicator after `grace`
    pub fn finish_indicator(self: &Arc<Self>, token: &IndicatorToken, grace: Duration) {
        if !self.complete(token) {
            return;
        }
        let registry = Arc::clone(self);
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            registry.remove_indicator(&token);
        });
    }

    /// Current percentage shown on a control
    pub fn percent(&self, control: &ControlId) -> Option<u8> {
        self.lock()
            .slots
            .get(control)
            .and_then(|s| s.indicator.as_ref())
            .map(|ind| ind.percent)
    }

    /// Current mode of a control's indicator
    pub fn mode(&self, control: &ControlId) -> Option<IndicatorMode> {
        self.lock()
            .slots
            .get(control)
            .and_then(|s| s.indicator.as_ref())
            .map(|ind| ind.mode)
    }
}
