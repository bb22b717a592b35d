use contracts::domain::crops::{CropMasterResponse, NewCrop};
use contracts::domain::demographics::Crop;
use contracts::shared::api_error::ApiError;
use contracts::shared::pagination::{LoadState, PageState, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

use crate::domain::crops::api;
use crate::shared::api_utils::{live_client, use_api};
use crate::shared::components::alert::{Alert, AlertBanner};
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::{report_api_error, use_auth};

/// Admin list of crop and variety rows with an add form.
#[component]
pub fn CropMasterPage() -> impl IntoView {
    let (_, set_auth_state) = use_auth();
    let api_client = StoredValue::new(use_api());
    let crops = RwSignal::new(PageState::<Crop>::new(DEFAULT_PAGE_SIZE));
    let load = RwSignal::new(LoadState::Loading);
    let alert = RwSignal::new(None::<Alert>);
    let form = RwSignal::new(NewCrop::default());
    let saving = RwSignal::new(false);

    // every change answers with the whole list
    let apply = move |result: Result<CropMasterResponse, ApiError>| match result {
        Ok(response) => {
            crops.update(|s| s.reload(response.crops));
            if let Some(message) = response.message {
                alert.set(Some(Alert::success(message)));
            }
            true
        }
        Err(e) => {
            log::warn!("crop master update failed: {}", e);
            alert.set(Some(Alert::error(report_api_error(set_auth_state, &e))));
            false
        }
    };

    let client = api_client.get_value();
    wasm_bindgen_futures::spawn_local(async move {
        match api::fetch_crops(&client).await {
            Ok(rows) => {
                crops.update(|s| s.load(rows));
                load.set(LoadState::Loaded);
            }
            Err(e) => {
                log::error!("failed to load crops: {}", e);
                load.set(LoadState::Failed(report_api_error(set_auth_state, &e)));
            }
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let new_crop = form.get_untracked();
        if let Err(e) = new_crop.validate() {
            alert.set(Some(Alert::error(e.to_string())));
            return;
        }
        let Some(client) = live_client(api_client) else {
            return;
        };
        alert.set(None);
        saving.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            if apply(api::add_crop(&client, &new_crop).await) {
                form.set(NewCrop::default());
            }
            saving.set(false);
        });
    };

    let on_remove = move |crop: Crop| {
        let label = crop.crop_name.clone().unwrap_or_else(|| crop.crop_id.clone());
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("Remove {} from the crop master?", label)).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let Some(client) = live_client(api_client) else {
            return;
        };
        alert.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            apply(api::remove_crop(&client, &crop.crop_id).await);
        });
    };

    let text_input = move |label: &'static str,
                           get: fn(&NewCrop) -> String,
                           set: fn(&mut NewCrop, String)| {
        view! {
            <div class="form-group">
                <label>{label}</label>
                <input
                    type="text"
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    let rows = move || {
        let message = match load.get() {
            LoadState::Loading => Some("Loading..."),
            LoadState::Failed(_) => Some(LoadState::FAILED_MESSAGE),
            LoadState::Loaded if crops.with(PageState::is_empty) => Some("No crops defined"),
            LoadState::Loaded => None,
        };
        if let Some(text) = message {
            return view! {
                <tr>
                    <td class="table__cell table__cell--muted" colspan="5">{text}</td>
                </tr>
            }
            .into_any();
        }
        crops
            .with(|s| s.page_view().rows.to_vec())
            .into_iter()
            .map(|crop| {
                let cell = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
                let name = cell(&crop.crop_name);
                let variety = cell(&crop.crop_variety_name);
                let variety_id = cell(&crop.crop_variety_id);
                let crop_id = crop.crop_id.clone();
                view! {
                    <tr>
                        <td class="table__cell">{name}</td>
                        <td class="table__cell">{crop_id}</td>
                        <td class="table__cell">{variety}</td>
                        <td class="table__cell">{variety_id}</td>
                        <td class="table__cell">
                            <button
                                class="button button--danger button--small"
                                title="Remove"
                                on:click=move |_| on_remove(crop.clone())
                            >
                                {icon("delete")}
                            </button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <PageFrame page_id="crops--list" category=PAGE_CAT_LIST>
            <PageHeader title="Crop Master" subtitle="Crops and varieties offered to aggregators".to_string() />
            <AlertBanner alert=alert />

            <div class="page__content">
                <form class="crop-form" on:submit=on_submit>
                    {text_input("Crop Name *", |f| f.crop_name.clone(), |f, v| f.crop_name = v)}
                    {text_input("Crop ID *", |f| f.crop_id.clone(), |f, v| f.crop_id = v)}
                    {text_input("Variety Name", |f| f.variety_name.clone(), |f, v| f.variety_name = v)}
                    {text_input("Variety ID", |f| f.variety_id.clone(), |f, v| f.variety_id = v)}
                    <button type="submit" class="button button--primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Add Crop" }}
                    </button>
                </form>

                <div class="table">
                    <table class="table__data table--striped">
                        <thead class="table__head">
                            <tr>
                                {["Crop", "Crop ID", "Variety", "Variety ID", ""]
                                    .into_iter()
                                    .map(|h| view! { <th class="table__header-cell">{h}</th> })
                                    .collect_view()}
                            </tr>
                        </thead>
                        <tbody>{rows}</tbody>
                    </table>
                </div>
                <PaginationControls
                    pager=Signal::derive(move || crops.with(PageState::pager))
                    on_page_change=Callback::new(move |page: usize| {
                        crops.update(|s| {
                            s.go_to_page(page);
                        });
                    })
                />
            </div>
        </PageFrame>
    }
}
