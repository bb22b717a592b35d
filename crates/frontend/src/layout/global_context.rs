use contracts::domain::approvals::ApplicantKind;
use contracts::enums::UserRole;
use leptos::prelude::Effect;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use web_sys::window;

/// Every view of the portal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Login,
    Register(ApplicantKind),
    AdminApprovals,
    CropMaster,
    Dashboard,
    CatchmentRequest,
    Batches,
    Traceability(String),
}

/// `?page=...&batch=...` query of the address bar.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    batch: Option<String>,
}

impl Page {
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Register(ApplicantKind::Aggregator) => "register-aggregator",
            Page::Register(ApplicantKind::Buyer) => "register-buyer",
            Page::AdminApprovals => "admin-approvals",
            Page::CropMaster => "crop-master",
            Page::Dashboard => "dashboard",
            Page::CatchmentRequest => "catchment-request",
            Page::Batches => "batches",
            Page::Traceability(_) => "traceability",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Login => "Login",
            Page::Register(ApplicantKind::Aggregator) => "Aggregator Registration",
            Page::Register(ApplicantKind::Buyer) => "Buyer Registration",
            Page::AdminApprovals => "Admin Approvals",
            Page::CropMaster => "Crop Master",
            Page::Dashboard => "Dashboard",
            Page::CatchmentRequest => "Catchment Area Request",
            Page::Batches => "My Batches",
            Page::Traceability(_) => "Traceability",
        }
    }

    fn from_query(query: PageQuery) -> Option<Self> {
        let page = match query.page.as_deref()? {
            "login" => Page::Login,
            "register-aggregator" => Page::Register(ApplicantKind::Aggregator),
            "register-buyer" => Page::Register(ApplicantKind::Buyer),
            "admin-approvals" => Page::AdminApprovals,
            "crop-master" => Page::CropMaster,
            "dashboard" => Page::Dashboard,
            "catchment-request" => Page::CatchmentRequest,
            "batches" => Page::Batches,
            "traceability" => Page::Traceability(query.batch?),
            _ => return None,
        };
        Some(page)
    }

    fn to_query(&self) -> PageQuery {
        PageQuery {
            page: Some(self.slug().to_string()),
            batch: match self {
                Page::Traceability(id) => Some(id.clone()),
                _ => None,
            },
        }
    }

    /// Pages reachable without a session.
    pub fn is_public(&self) -> bool {
        self.required_role().is_none()
    }

    /// Role a signed-in user needs for this page; `None` for public pages.
    pub fn required_role(&self) -> Option<UserRole> {
        match self {
            Page::Login | Page::Register(_) => None,
            Page::AdminApprovals | Page::CropMaster => Some(UserRole::Admin),
            Page::Dashboard | Page::CatchmentRequest | Page::Batches | Page::Traceability(_) => {
                Some(UserRole::Aggregator)
            }
        }
    }

    /// Whether `role` may open this page.
    pub fn allows(&self, role: UserRole) -> bool {
        self.required_role().map_or(true, |required| required == role)
    }

    /// Landing page after login.
    pub fn home_for(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Page::AdminApprovals,
            UserRole::Aggregator => Page::Dashboard,
            UserRole::Buyer => Page::Login,
        }
    }
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active: RwSignal<Page>,
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(Page::Login),
        }
    }

    pub fn navigate(&self, page: Page) {
        log::debug!("navigate: {}", page.slug());
        self.active.set(page);
    }

    /// Reads the initial page from the address bar and keeps the address bar
    /// in sync afterwards.
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let query: PageQuery =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(page) = Page::from_query(query) {
            self.active.set(page);
        }

        let this = *self;
        Effect::new(move |_| {
            let page = this.active.get();
            let query_string = serde_qs::to_string(&page.to_query()).unwrap_or_default();
            let new_url = format!("?{}", query_string);

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();

            if current_search != new_url {
                if let Some(w) = window() {
                    if let Ok(history) = w.history() {
                        let _ = history.replace_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&new_url),
                        );
                    }
                }
            }
        });
    }
}

pub fn use_global_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext not found")
}

/// Page titles for the navigation bar, per role.
pub fn nav_items(role: UserRole) -> Vec<Page> {
    match role {
        UserRole::Admin => vec![Page::AdminApprovals, Page::CropMaster],
        UserRole::Aggregator => vec![Page::Dashboard, Page::CatchmentRequest, Page::Batches],
        UserRole::Buyer => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_round_trip() {
        let page = Page::Traceability("BATCH-1".to_string());
        let query = serde_qs::to_string(&page.to_query()).unwrap();
        assert_eq!(query, "page=traceability&batch=BATCH-1");
        let parsed: PageQuery = serde_qs::from_str(&query).unwrap();
        assert_eq!(Page::from_query(parsed), Some(page));
    }

    #[test]
    fn test_traceability_needs_batch() {
        let parsed: PageQuery = serde_qs::from_str("page=traceability").unwrap();
        assert_eq!(Page::from_query(parsed), None);
    }

    #[test]
    fn test_role_access() {
        assert!(Page::AdminApprovals.allows(UserRole::Admin));
        assert!(!Page::AdminApprovals.allows(UserRole::Aggregator));
        assert!(Page::Batches.allows(UserRole::Aggregator));
        assert!(!Page::Dashboard.allows(UserRole::Buyer));
        assert_eq!(Page::home_for(UserRole::Aggregator), Page::Dashboard);
    }

    #[test]
    fn test_crop_master_is_admin_only() {
        let parsed: PageQuery = serde_qs::from_str("page=crop-master").unwrap();
        assert_eq!(Page::from_query(parsed), Some(Page::CropMaster));
        assert!(!Page::CropMaster.allows(UserRole::Aggregator));
        assert!(nav_items(UserRole::Admin).contains(&Page::CropMaster));
    }
}
