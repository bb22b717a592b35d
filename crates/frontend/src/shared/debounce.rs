//! Single-slot debounce timer.
//!
//! Scheduling drops the pending callback, so only the last one scheduled
//! within the delay ever fires. Requests already sent are not cancelled;
//! callers tag them with a [`RequestSequence`] number and ignore answers that
//! are no longer the latest.
//!
//! [`RequestSequence`]: contracts::domain::registration::RequestSequence

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct Debouncer {
    slot: StoredValue<Option<Timeout>, LocalStorage>,
    delay_ms: u32,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            slot: StoredValue::new_local(None),
            delay_ms,
        }
    }

    /// Replaces the pending callback with `callback`.
    pub fn schedule(&self, callback: impl FnOnce() + 'static) {
        // run as a task so the callback may dispose the owner of this slot
        let timeout = Timeout::new(self.delay_ms, move || {
            wasm_bindgen_futures::spawn_local(async move { callback() })
        });
        // dropping the previous Timeout clears it
        self.slot.set_value(Some(timeout));
    }

    pub fn cancel(&self) {
        self.slot.set_value(None);
    }
}
