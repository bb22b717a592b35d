//! Cascading dependent selectors.
//!
//! A [`SelectorChain`] owns a small forest of select fields where every
//! field may depend on exactly one parent. Changing a value synchronously
//! resets every descendant before any lookup is issued, and each issued
//! lookup carries a [`FetchTicket`] so that responses for a superseded parent
//! value are dropped when they finally arrive.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use super::sentinel::{is_not_applicable, DEFAULT_VARIETY_LABEL, NA};

/// One entry of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    /// Metadata carried by the option for derived children (crop → variety).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked: Option<LinkedOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedOption {
    pub id: String,
    pub name: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            linked: None,
        }
    }

    pub fn with_linked(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.linked = Some(LinkedOption {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// The sentinel entry offered by optional fields.
    pub fn not_applicable() -> Self {
        Self::new("", NA)
    }
}

/// Lifecycle of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Idle,
    Loading,
    Populated,
    Empty,
    Error,
}

/// How a field obtains its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSource {
    /// Remote lookup keyed by the parent value.
    Remote,
    /// Built from the [`LinkedOption`] of the selected parent option.
    Derived,
}

/// Static description of a field.
#[derive(Debug, Clone)]
pub struct NodeSpec<K> {
    pub key: K,
    pub parent: Option<K>,
    pub label: &'static str,
    pub plural: &'static str,
    pub required: bool,
    pub source: NodeSource,
    /// Issue the lookup even when the parent was cleared (SHG after VO).
    pub fetch_on_empty_parent: bool,
}

impl<K> NodeSpec<K> {
    pub fn required(key: K, label: &'static str, plural: &'static str) -> Self {
        Self {
            key,
            parent: None,
            label,
            plural,
            required: true,
            source: NodeSource::Remote,
            fetch_on_empty_parent: false,
        }
    }

    pub fn optional(key: K, label: &'static str, plural: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(key, label, plural)
        }
    }

    pub fn child_of(mut self, parent: K) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn derived(mut self) -> Self {
        self.source = NodeSource::Derived;
        self
    }

    pub fn fetch_on_empty_parent(mut self) -> Self {
        self.fetch_on_empty_parent = true;
        self
    }
}

/// Live state of a field.
#[derive(Debug, Clone)]
pub struct SelectorNode<K> {
    pub spec: NodeSpec<K>,
    pub value: String,
    pub options: Vec<SelectOption>,
    /// Leading empty-valued entry shown above the options, if any.
    pub placeholder: Option<String>,
    pub enabled: bool,
    pub state: NodeState,
    /// Parent value the current options belong to.
    pub parent_value: String,
    generation: u64,
}

impl<K: Copy> SelectorNode<K> {
    fn new(spec: NodeSpec<K>) -> Self {
        let mut node = Self {
            spec,
            value: String::new(),
            options: Vec::new(),
            placeholder: None,
            enabled: false,
            state: NodeState::Idle,
            parent_value: String::new(),
            generation: 0,
        };
        node.reset();
        node
    }

    /// Back to `Idle`: placeholder for required fields, the sentinel for
    /// optional ones. Invalidates every outstanding ticket for this field.
    fn reset(&mut self) {
        self.generation += 1;
        self.value.clear();
        self.parent_value.clear();
        self.state = NodeState::Idle;
        match (self.spec.source, self.spec.required) {
            (NodeSource::Derived, _) => {
                self.placeholder = None;
                self.options = vec![SelectOption::new(NA, DEFAULT_VARIETY_LABEL)];
                self.value = NA.to_string();
                self.enabled = false;
            }
            (NodeSource::Remote, true) => {
                self.placeholder = Some(format!("Select {}...", self.spec.label));
                self.options.clear();
                self.enabled = false;
            }
            (NodeSource::Remote, false) => self.fill_sentinel(),
        }
    }

    fn fill_sentinel(&mut self) {
        self.placeholder = None;
        self.options = vec![SelectOption::not_applicable()];
        self.value.clear();
        self.enabled = true;
    }

    fn start_loading(&mut self, parent_value: &str) -> u64 {
        self.generation += 1;
        self.value.clear();
        self.options.clear();
        self.parent_value = parent_value.to_string();
        self.placeholder = Some(format!("Loading {}...", self.spec.plural));
        self.enabled = false;
        self.state = NodeState::Loading;
        self.generation
    }

    pub fn is_optional(&self) -> bool {
        !self.spec.required
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.value == self.value)
    }

    /// Label of the current selection, empty when nothing is selected.
    pub fn selected_label(&self) -> String {
        if self.value.is_empty() && self.spec.required {
            return String::new();
        }
        self.selected_option()
            .map(|o| o.label.clone())
            .unwrap_or_default()
    }
}

/// Handle for an issued lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    pub key: K,
    /// Parent value the lookup was issued for.
    pub parent_value: String,
    /// Values of every ancestor, root first.
    pub ancestors: Vec<(K, String)>,
    generation: u64,
}

/// Outcome of [`SelectorChain::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Applied(NodeState),
    /// The field moved on since the lookup was issued; nothing changed.
    Stale,
}

/// Required fields left empty at submission time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please select: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

/// The set of dependent select fields of one form.
#[derive(Debug, Clone)]
pub struct SelectorChain<K> {
    nodes: Vec<SelectorNode<K>>,
    banner: Option<String>,
}

impl<K: Copy + Eq + Hash + Debug> SelectorChain<K> {
    /// Specs must list parents before their children.
    pub fn new(specs: Vec<NodeSpec<K>>) -> Self {
        Self {
            nodes: specs.into_iter().map(SelectorNode::new).collect(),
            banner: None,
        }
    }

    pub fn node(&self, key: K) -> Option<&SelectorNode<K>> {
        self.nodes.iter().find(|n| n.spec.key == key)
    }

    fn node_mut(&mut self, key: K) -> Option<&mut SelectorNode<K>> {
        self.nodes.iter_mut().find(|n| n.spec.key == key)
    }

    pub fn nodes(&self) -> &[SelectorNode<K>] {
        &self.nodes
    }

    pub fn value(&self, key: K) -> &str {
        self.node(key).map(|n| n.value.as_str()).unwrap_or("")
    }

    /// Page-level error raised by a failed required lookup.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Every field that transitively depends on `key`, in declaration order.
    pub fn descendants(&self, key: K) -> Vec<K> {
        let mut found: Vec<K> = Vec::new();
        for node in &self.nodes {
            if let Some(parent) = node.spec.parent {
                if parent == key || found.contains(&parent) {
                    found.push(node.spec.key);
                }
            }
        }
        found
    }

    fn ancestors(&self, key: K) -> Vec<(K, String)> {
        let mut chain = Vec::new();
        let mut current = self.node(key).and_then(|n| n.spec.parent);
        while let Some(k) = current {
            chain.push((k, self.value(k).to_string()));
            current = self.node(k).and_then(|n| n.spec.parent);
        }
        chain.reverse();
        chain
    }

    /// Starts a lookup for `key` against the current parent value.
    pub fn begin_load(&mut self, key: K) -> Option<FetchTicket<K>> {
        let parent_value = self
            .node(key)?
            .spec
            .parent
            .map(|p| self.value(p).to_string())
            .unwrap_or_default();
        let ancestors = self.ancestors(key);
        let generation = self.node_mut(key)?.start_loading(&parent_value);
        Some(FetchTicket {
            key,
            parent_value,
            ancestors,
            generation,
        })
    }

    /// Sets the value of `key`, resets all descendants and returns the
    /// lookups to issue for the direct remote children.
    pub fn select(&mut self, key: K, value: &str) -> Vec<FetchTicket<K>> {
        let Some(node) = self.node_mut(key) else {
            return Vec::new();
        };
        node.value = value.to_string();
        let linked = node.selected_option().and_then(|o| o.linked.clone());

        for descendant in self.descendants(key) {
            if let Some(n) = self.node_mut(descendant) {
                n.reset();
            }
        }

        let children: Vec<(K, NodeSource, bool)> = self
            .nodes
            .iter()
            .filter(|n| n.spec.parent == Some(key))
            .map(|n| (n.spec.key, n.spec.source, n.spec.fetch_on_empty_parent))
            .collect();

        let mut tickets = Vec::new();
        for (child, source, on_empty) in children {
            match source {
                NodeSource::Derived => self.fill_derived(child, value, linked.as_ref()),
                NodeSource::Remote => {
                    if !value.is_empty() || on_empty {
                        tickets.extend(self.begin_load(child));
                    }
                }
            }
        }
        tickets
    }

    fn fill_derived(&mut self, key: K, parent_value: &str, linked: Option<&LinkedOption>) {
        let Some(node) = self.node_mut(key) else {
            return;
        };
        if parent_value.is_empty() {
            return;
        }
        node.parent_value = parent_value.to_string();
        if let Some(linked) = linked {
            if !is_not_applicable(&linked.name) {
                node.options
                    .push(SelectOption::new(linked.id.clone(), linked.name.clone()));
            }
        }
        node.enabled = true;
        node.state = if node.options.len() > 1 {
            NodeState::Populated
        } else {
            NodeState::Empty
        };
    }

    /// Applies a lookup result, unless the ticket is stale.
    ///
    /// `Err` covers transport failures, non-2xx answers and `success:false`
    /// bodies alike.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket<K>,
        result: Result<Vec<SelectOption>, String>,
    ) -> Resolution {
        let current_parent = self
            .node(ticket.key)
            .and_then(|n| n.spec.parent)
            .map(|p| self.value(p).to_string())
            .unwrap_or_default();
        let Some(node) = self.node_mut(ticket.key) else {
            return Resolution::Stale;
        };
        if node.generation != ticket.generation
            || node.parent_value != ticket.parent_value
            || current_parent != ticket.parent_value
        {
            return Resolution::Stale;
        }

        let label = node.spec.label;
        let plural = node.spec.plural;
        let is_root = node.spec.parent.is_none();
        let mut banner = None;

        match (result, node.spec.required) {
            (Ok(options), _) if !options.is_empty() => {
                node.placeholder = Some(format!("Select {}...", label));
                node.options = options;
                if node.is_optional() {
                    node.options.push(SelectOption::not_applicable());
                }
                node.enabled = true;
                node.state = NodeState::Populated;
            }
            (Ok(_), false) => {
                node.fill_sentinel();
                node.state = NodeState::Empty;
            }
            (Err(_), false) => {
                node.fill_sentinel();
                node.state = NodeState::Error;
            }
            (Ok(_), true) => {
                node.placeholder = Some(format!("No {} found", plural));
                node.options.clear();
                node.enabled = false;
                node.state = NodeState::Empty;
                if is_root {
                    banner = Some(format!("No {} available.", plural));
                }
            }
            (Err(_), true) => {
                node.placeholder = Some(format!("Error loading {}", plural));
                node.options.clear();
                node.enabled = false;
                node.state = NodeState::Error;
                banner = Some(format!(
                    "Failed to load {}. Please check if the backend server is running.",
                    plural
                ));
            }
        }

        let state = node.state;
        if banner.is_some() {
            self.banner = banner;
        }
        Resolution::Applied(state)
    }

    /// Submission gate: every required field must hold a value.
    pub fn validate(&self) -> Result<(), MissingFields> {
        let missing: Vec<&'static str> = self
            .nodes
            .iter()
            .filter(|n| n.spec.required && n.value.is_empty())
            .map(|n| n.spec.label)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields(missing))
        }
    }

    /// Inline error for a required field left empty.
    pub fn field_error(&self, key: K) -> Option<String> {
        let node = self.node(key)?;
        (node.spec.required && node.value.is_empty())
            .then(|| format!("Please select a {}", node.spec.label))
    }

    /// Value as sent to the backend: optional fields never go out empty.
    pub fn submission_value(&self, key: K) -> String {
        match self.node(key) {
            Some(n) if n.is_optional() && n.value.is_empty() => NA.to_string(),
            Some(n) => n.value.clone(),
            None => NA.to_string(),
        }
    }

    /// Label as sent to the backend, `NA` for unset optional fields.
    pub fn submission_label(&self, key: K) -> String {
        match self.node(key) {
            Some(n) => {
                let label = n.selected_label();
                if n.is_optional() && (label.is_empty() || is_not_applicable(&label)) {
                    NA.to_string()
                } else {
                    label
                }
            }
            None => NA.to_string(),
        }
    }

    /// Clears every selection. Root fields keep their loaded options.
    pub fn reset_all(&mut self) {
        for node in self.nodes.iter_mut() {
            if node.spec.parent.is_none() && node.spec.source == NodeSource::Remote {
                node.value.clear();
            } else {
                node.reset();
            }
        }
        self.banner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum F {
        District,
        Mandal,
        Panchayat,
        Village,
        Vo,
        Shg,
        Crop,
        Variety,
    }

    fn chain() -> SelectorChain<F> {
        SelectorChain::new(vec![
            NodeSpec::required(F::District, "District", "districts"),
            NodeSpec::required(F::Mandal, "Mandal", "mandals").child_of(F::District),
            NodeSpec::required(F::Panchayat, "Panchayat", "panchayats").child_of(F::Mandal),
            NodeSpec::required(F::Village, "Village", "villages").child_of(F::Panchayat),
            NodeSpec::optional(F::Vo, "VO", "VOs").child_of(F::Village),
            NodeSpec::optional(F::Shg, "SHG", "SHGs")
                .child_of(F::Vo)
                .fetch_on_empty_parent(),
            NodeSpec::required(F::Crop, "Crop", "crops"),
            NodeSpec::optional(F::Variety, "Variety", "varieties")
                .child_of(F::Crop)
                .derived(),
        ])
    }

    fn opts(prefix: &str, n: usize) -> Vec<SelectOption> {
        (1..=n)
            .map(|i| SelectOption::new(format!("{}{}", prefix, i), format!("{} {}", prefix, i)))
            .collect()
    }

    fn loaded_districts() -> SelectorChain<F> {
        let mut c = chain();
        let t = c.begin_load(F::District).unwrap();
        assert_eq!(
            c.resolve(&t, Ok(vec![SelectOption::new("D1", "One"), SelectOption::new("D2", "Two")])),
            Resolution::Applied(NodeState::Populated)
        );
        c
    }

    #[test]
    fn test_initial_states() {
        let c = chain();
        let mandal = c.node(F::Mandal).unwrap();
        assert_eq!(mandal.state, NodeState::Idle);
        assert!(!mandal.enabled);
        assert_eq!(mandal.placeholder.as_deref(), Some("Select Mandal..."));

        let vo = c.node(F::Vo).unwrap();
        assert!(vo.enabled);
        assert_eq!(vo.options, vec![SelectOption::not_applicable()]);

        let variety = c.node(F::Variety).unwrap();
        assert!(!variety.enabled);
        assert_eq!(variety.value, "NA");
    }

    #[test]
    fn test_select_resets_descendants_before_fetch() {
        let mut c = loaded_districts();
        let t = c.select(F::District, "D1").remove(0);
        c.resolve(&t, Ok(opts("M", 2)));
        let t = c.select(F::Mandal, "M1").remove(0);
        c.resolve(&t, Ok(opts("P", 2)));
        c.select(F::Panchayat, "P1");

        let tickets = c.select(F::District, "D2");
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].key, F::Mandal);
        assert_eq!(tickets[0].parent_value, "D2");

        let mandal = c.node(F::Mandal).unwrap();
        assert_eq!(mandal.state, NodeState::Loading);
        assert!(mandal.options.is_empty());
        let panchayat = c.node(F::Panchayat).unwrap();
        assert_eq!(panchayat.state, NodeState::Idle);
        assert!(panchayat.options.is_empty());
        assert_eq!(panchayat.value, "");
        assert_eq!(c.node(F::Vo).unwrap().options, vec![SelectOption::not_applicable()]);
    }

    #[test]
    fn test_stale_response_is_discarded_in_either_order() {
        // D1's mandals arrive after D2's
        let mut c = loaded_districts();
        let t1 = c.select(F::District, "D1").remove(0);
        let t2 = c.select(F::District, "D2").remove(0);
        assert_eq!(c.resolve(&t2, Ok(opts("D2-M", 2))), Resolution::Applied(NodeState::Populated));
        assert_eq!(c.resolve(&t1, Ok(opts("D1-M", 3))), Resolution::Stale);
        let mandal = c.node(F::Mandal).unwrap();
        assert_eq!(mandal.options, opts("D2-M", 2));
        assert_eq!(mandal.parent_value, "D2");

        // D1's mandals arrive first
        let mut c = loaded_districts();
        let t1 = c.select(F::District, "D1").remove(0);
        let t2 = c.select(F::District, "D2").remove(0);
        assert_eq!(c.resolve(&t1, Ok(opts("D1-M", 3))), Resolution::Stale);
        assert_eq!(c.node(F::Mandal).unwrap().state, NodeState::Loading);
        c.resolve(&t2, Ok(opts("D2-M", 2)));
        assert_eq!(c.node(F::Mandal).unwrap().options, opts("D2-M", 2));
    }

    #[test]
    fn test_reselecting_same_parent_still_drops_older_ticket() {
        let mut c = loaded_districts();
        let t1 = c.select(F::District, "D1").remove(0);
        let t2 = c.select(F::District, "D1").remove(0);
        assert_eq!(c.resolve(&t1, Ok(opts("M", 1))), Resolution::Stale);
        assert_eq!(c.resolve(&t2, Ok(opts("M", 1))), Resolution::Applied(NodeState::Populated));
    }

    #[test]
    fn test_clearing_parent_issues_no_fetch() {
        let mut c = loaded_districts();
        c.select(F::District, "D1");
        assert!(c.select(F::District, "").is_empty());
        assert_eq!(c.node(F::Mandal).unwrap().state, NodeState::Idle);
    }

    #[test]
    fn test_optional_failure_falls_back_to_single_sentinel() {
        let mut c = chain();
        c.select(F::Panchayat, "P1");
        let t = c.select(F::Village, "V1").remove(0);
        assert_eq!(t.key, F::Vo);
        assert_eq!(c.resolve(&t, Err("success: false".into())), Resolution::Applied(NodeState::Error));

        let vo = c.node(F::Vo).unwrap();
        assert_eq!(vo.options, vec![SelectOption::not_applicable()]);
        assert!(vo.enabled);
        assert!(c.banner().is_none());
        assert_eq!(c.submission_value(F::Vo), "NA");
        assert_eq!(c.submission_label(F::Vo), "NA");
    }

    #[test]
    fn test_optional_empty_result_is_sentinel() {
        let mut c = chain();
        let t = c.select(F::Village, "V1").remove(0);
        assert_eq!(c.resolve(&t, Ok(Vec::new())), Resolution::Applied(NodeState::Empty));
        assert_eq!(c.node(F::Vo).unwrap().options.len(), 1);
    }

    #[test]
    fn test_optional_populated_gets_trailing_sentinel() {
        let mut c = chain();
        let t = c.select(F::Village, "V1").remove(0);
        c.resolve(&t, Ok(opts("VO", 2)));
        let vo = c.node(F::Vo).unwrap();
        assert_eq!(vo.options.len(), 3);
        assert_eq!(vo.options.last(), Some(&SelectOption::not_applicable()));
    }

    #[test]
    fn test_shg_fetch_follows_vo_even_when_cleared() {
        let mut c = chain();
        c.select(F::Panchayat, "P1");
        let t = c.select(F::Village, "V1").remove(0);
        c.resolve(&t, Ok(opts("VO", 1)));

        let tickets = c.select(F::Vo, "");
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].key, F::Shg);
        assert_eq!(
            tickets[0].ancestors,
            vec![
                (F::District, String::new()),
                (F::Mandal, String::new()),
                (F::Panchayat, "P1".to_string()),
                (F::Village, "V1".to_string()),
                (F::Vo, String::new()),
            ]
        );
    }

    #[test]
    fn test_required_failure_raises_banner() {
        let mut c = loaded_districts();
        let t = c.select(F::District, "D1").remove(0);
        assert_eq!(c.resolve(&t, Err("HTTP 500".into())), Resolution::Applied(NodeState::Error));
        let mandal = c.node(F::Mandal).unwrap();
        assert!(!mandal.enabled);
        assert_eq!(mandal.placeholder.as_deref(), Some("Error loading mandals"));
        assert!(c.banner().unwrap().contains("mandals"));
    }

    #[test]
    fn test_required_empty_shows_none_found() {
        let mut c = loaded_districts();
        let t = c.select(F::District, "D1").remove(0);
        c.resolve(&t, Ok(Vec::new()));
        let mandal = c.node(F::Mandal).unwrap();
        assert_eq!(mandal.state, NodeState::Empty);
        assert_eq!(mandal.placeholder.as_deref(), Some("No mandals found"));
        assert!(!mandal.enabled);
    }

    #[test]
    fn test_variety_derived_from_crop() {
        let mut c = chain();
        let t = c.begin_load(F::Crop).unwrap();
        c.resolve(
            &t,
            Ok(vec![
                SelectOption::new("C1", "Groundnut").with_linked("CV1", "TMV-2"),
                SelectOption::new("C2", "Millet").with_linked("NA", "NA"),
            ]),
        );

        assert!(c.select(F::Crop, "C1").is_empty());
        let variety = c.node(F::Variety).unwrap();
        assert!(variety.enabled);
        assert_eq!(
            variety.options,
            vec![
                SelectOption::new("NA", "NA - Default Variety"),
                SelectOption::new("CV1", "TMV-2"),
            ]
        );
        assert_eq!(c.submission_value(F::Variety), "NA");

        c.select(F::Crop, "C2");
        assert_eq!(c.node(F::Variety).unwrap().options.len(), 1);

        c.select(F::Crop, "");
        assert!(!c.node(F::Variety).unwrap().enabled);
    }

    #[test]
    fn test_validation_gate() {
        let mut c = chain();
        let err = c.validate().unwrap_err();
        assert_eq!(err.to_string(), "Please select: District, Mandal, Panchayat, Village, Crop");
        assert_eq!(c.field_error(F::Crop).as_deref(), Some("Please select a Crop"));
        assert_eq!(c.field_error(F::Vo), None);

        c.select(F::District, "D1");
        c.select(F::Mandal, "M1");
        c.select(F::Panchayat, "P1");
        c.select(F::Village, "V1");
        c.select(F::Crop, "C1");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_reset_all_keeps_root_options() {
        let mut c = loaded_districts();
        c.select(F::District, "D1");
        c.reset_all();
        let district = c.node(F::District).unwrap();
        assert_eq!(district.value, "");
        assert_eq!(district.options.len(), 2);
        assert_eq!(c.node(F::Mandal).unwrap().state, NodeState::Idle);
    }
}
