use contracts::domain::registration::SUCCESS_VIEW_SECS;
use contracts::shared::submission::SubmissionReceipt;
use leptos::prelude::*;

use crate::shared::debounce::Debouncer;

/// Confirmation shown after a registration went through. Closes itself
/// after [`SUCCESS_VIEW_SECS`].
#[component]
pub fn RegistrationSuccess(receipt: SubmissionReceipt, on_close: Callback<()>) -> impl IntoView {
    let auto_close = Debouncer::new(SUCCESS_VIEW_SECS * 1000);
    auto_close.schedule(move || on_close.run(()));

    view! {
        <div class="registration-success">
            <h2 class="registration-success__title">"Registration Successful"</h2>
            <p class="registration-success__message">{receipt.message}</p>
            <dl class="registration-success__details">
                <dt>"Registration ID"</dt>
                <dd>{receipt.id}</dd>
                <dt>"Username"</dt>
                <dd>{receipt.username}</dd>
                <dt>"Status"</dt>
                <dd>{receipt.status}</dd>
            </dl>
            <p class="registration-success__hint">
                {format!("This page closes automatically in {} seconds.", SUCCESS_VIEW_SECS)}
            </p>
            <button
                class="button button--primary"
                on:click=move |_| {
                    auto_close.cancel();
                    on_close.run(());
                }
            >
                "Close"
            </button>
        </div>
    }
}
