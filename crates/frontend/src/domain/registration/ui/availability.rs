use contracts::domain::approvals::ApplicantKind;
use contracts::domain::registration::{
    Availability, AvailabilityField, RequestSequence, AVAILABILITY_DEBOUNCE_MS,
};
use leptos::prelude::*;

use crate::domain::registration::api;
use crate::shared::api_utils::{live_client, ApiClient};
use crate::shared::debounce::Debouncer;

/// Debounced "is this taken?" lookup behind one input field.
#[derive(Clone, Copy)]
pub struct AvailabilityCheck {
    pub kind: ApplicantKind,
    pub field: AvailabilityField,
    pub state: RwSignal<Availability>,
    sequence: StoredValue<RequestSequence>,
    debouncer: Debouncer,
    api: StoredValue<ApiClient>,
}

impl AvailabilityCheck {
    pub fn new(api: ApiClient, kind: ApplicantKind, field: AvailabilityField) -> Self {
        Self {
            kind,
            field,
            state: RwSignal::new(Availability::Idle),
            sequence: StoredValue::new(RequestSequence::default()),
            debouncer: Debouncer::new(AVAILABILITY_DEBOUNCE_MS),
            api: StoredValue::new(api),
        }
    }

    /// Feeds a new input value. Anything in flight for older values is
    /// superseded right away.
    pub fn on_input(&self, value: &str) {
        let value = value.trim().to_string();
        let state = Availability::precheck(self.field, &value);
        self.invalidate();
        self.state.set(state);

        if !state.needs_lookup() {
            self.debouncer.cancel();
            return;
        }
        let this = *self;
        self.debouncer.schedule(move || this.lookup(value));
    }

    pub fn reset(&self) {
        self.debouncer.cancel();
        self.invalidate();
        self.state.set(Availability::Idle);
    }

    pub fn message(&self) -> &'static str {
        self.state.get().message(self.field)
    }

    fn invalidate(&self) {
        self.sequence.try_update_value(|s| s.invalidate());
    }

    fn lookup(self, value: String) {
        let Some(seq) = self.sequence.try_update_value(|s| s.next()) else {
            return;
        };
        let Some(client) = live_client(self.api) else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = api::check_availability(&client, self.kind, self.field, &value)
                .await
                .map_err(|e| log::warn!("availability check for {:?} failed: {}", self.field, e));

            if is_current(self.sequence, seq) {
                self.state.set(Availability::from_response(result));
            } else {
                log::debug!("dropping stale {:?} check #{}", self.field, seq);
            }
        });
    }
}

/// Whether `seq` is still the newest lookup. Answers arriving after the
/// owning page was disposed are never current.
fn is_current(sequence: StoredValue<RequestSequence>, seq: u64) -> bool {
    sequence.try_with_value(|s| s.is_latest(seq)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_lookup_supersedes() {
        let owner = Owner::new();
        let sequence = owner.with(|| StoredValue::new(RequestSequence::default()));
        let first = sequence.try_update_value(|s| s.next()).unwrap();
        let second = sequence.try_update_value(|s| s.next()).unwrap();
        assert!(!is_current(sequence, first));
        assert!(is_current(sequence, second));
    }

    #[test]
    fn test_answer_after_page_left_is_stale() {
        let owner = Owner::new();
        let (sequence, state) = owner.with(|| {
            (
                StoredValue::new(RequestSequence::default()),
                RwSignal::new(Availability::Idle),
            )
        });
        let seq = sequence.try_update_value(|s| s.next()).unwrap();
        assert!(is_current(sequence, seq));

        owner.cleanup();
        assert!(!is_current(sequence, seq));
        assert!(sequence.try_update_value(|s| s.next()).is_none());
        // writing to the disposed feedback signal is a no-op
        state.set(Availability::Available);
    }
}
