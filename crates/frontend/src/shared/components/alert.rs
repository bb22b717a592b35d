use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// Page-level message shown above the content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            AlertKind::Success => "alert alert--success",
            AlertKind::Error => "alert alert--error",
        }
    }
}

/// Renders the current alert with a close button.
#[component]
pub fn AlertBanner(alert: RwSignal<Option<Alert>>) -> impl IntoView {
    move || {
        alert.get().map(|a| {
            view! {
                <div class=a.css_class() role="alert">
                    <span class="alert__text">{a.message.clone()}</span>
                    <button class="alert__close" on:click=move |_| alert.set(None) title="Dismiss">
                        "×"
                    </button>
                </div>
            }
        })
    }
}
