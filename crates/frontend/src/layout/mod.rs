pub mod global_context;
pub mod top_header;

use leptos::prelude::*;
use top_header::TopHeader;

/// Signed-in application shell.
///
/// ```text
/// +------------------------------------------+
/// |              TopHeader                    |
/// +------------------------------------------+
/// |               Content                     |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    view! {
        <div class="app-layout">
            <TopHeader />
            <main class="app-main">
                {children()}
            </main>
        </div>
    }
}
