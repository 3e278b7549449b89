//! Table controller for the resource dashboard.
//!
//! [`TableState`] is an immutable per-session snapshot of everything the
//! dashboard table tracks: the active sort, filters, pagination, the set of
//! expanded rows and the per-row analysis lifecycle. Every transition goes
//! through [`TableState::apply`], which consumes the current snapshot and
//! returns the next one, so callers can reason about each update in
//! isolation and re-render from a consistent state.
//!
//! The state never owns the resource collection. Views such as
//! [`TableState::filtered_rows`] and [`TableState::page_rows`] take the
//! collection as a slice and compute the visible subset on demand.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{FhirVersion, ProcessingState, ResourceWrapper};
use crate::{DashboardError, DashboardResult};

/// Literal shown in place of an analysis when the proxy call fails.
///
/// The row stays actionable afterwards so the user may retry.
pub const ANALYSIS_FAILED_FALLBACK: &str = "Analysis failed. Please try again.";

/// The table columns, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Column {
    Key,
    PatientId,
    ResourceType,
    State,
    Version,
    Created,
    Summary,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Key,
        Column::PatientId,
        Column::ResourceType,
        Column::State,
        Column::Version,
        Column::Created,
        Column::Summary,
    ];

    /// Stable column id, used in sort parameters.
    pub fn id(self) -> &'static str {
        match self {
            Column::Key => "key",
            Column::PatientId => "patientId",
            Column::ResourceType => "resourceType",
            Column::State => "state",
            Column::Version => "version",
            Column::Created => "createdTime",
            Column::Summary => "summary",
        }
    }

    /// Column display name, used for table headers and the CSV header row.
    pub fn header(self) -> &'static str {
        match self {
            Column::Key => "Resource Key",
            Column::PatientId => "Patient ID",
            Column::ResourceType => "Resource Type",
            Column::State => "Status",
            Column::Version => "FHIR Version",
            Column::Created => "Created",
            Column::Summary => "Summary",
        }
    }

    /// The single accessor used for rendering, free-text matching, sorting
    /// and CSV export.
    pub fn value(self, row: &ResourceWrapper) -> String {
        let metadata = &row.resource.metadata;
        match self {
            Column::Key => metadata.identifier.key.clone(),
            Column::PatientId => metadata.identifier.patient_id.clone(),
            Column::ResourceType => metadata.resource_type.clone(),
            Column::State => metadata.state.to_string(),
            Column::Version => metadata.version.to_string(),
            Column::Created => metadata
                .created_time
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            Column::Summary => row.resource.human_readable_str.clone(),
        }
    }
}

impl std::str::FromStr for Column {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashboardError::InvalidInput(format!("unrecognised column: {s}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl std::str::FromStr for SortDirection {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(DashboardError::InvalidInput(format!(
                "unrecognised sort direction: {other}"
            ))),
        }
    }
}

/// Rows-per-page setting, restricted to the selectable values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    pub const ALLOWED: [usize; 6] = [5, 10, 20, 30, 40, 50];

    pub fn new(size: usize) -> DashboardResult<Self> {
        if Self::ALLOWED.contains(&size) {
            Ok(Self(size))
        } else {
            Err(DashboardError::InvalidPageSize(size))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(5)
    }
}

/// Per-row analysis lifecycle.
///
/// A key that is absent from the analysis map has never been analysed (or has
/// been reset); [`AnalysisState::InFlight`] marks a request in progress and is
/// the authoritative duplicate-trigger guard; [`AnalysisState::Available`]
/// holds the session-cached text, optionally hidden from view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisState {
    InFlight,
    Available { text: String, hidden: bool },
}

/// One transition of the table state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableAction {
    /// Column-header interaction: cycles unsorted → ascending → descending →
    /// unsorted on the same column; a different column replaces the sort key.
    ToggleSort(Column),
    /// Directly set (or clear) the sort, bypassing the toggle cycle.
    SetSort(Option<(Column, SortDirection)>),
    /// Free-text filter matched against every column's rendered text.
    SetSearch(String),
    SetStateFilter(Option<ProcessingState>),
    SetResourceTypeFilter(Option<String>),
    SetVersionFilter(Option<FhirVersion>),
    /// Clears the free-text filter and all three column filters.
    ClearFilters,
    SetPageSize(PageSize),
    NextPage,
    PreviousPage,
    /// Flips membership of the key in the expanded-row set.
    ToggleExpansion(String),
    /// Marks an analysis request in flight. No-op when the key is already in
    /// flight, so a duplicate trigger never issues a second outbound call.
    BeginAnalysis(String),
    /// Caches the returned text for the rest of the session.
    FinishAnalysis { key: String, analysis: String },
    /// Stores [`ANALYSIS_FAILED_FALLBACK`] and leaves the row actionable.
    FailAnalysis(String),
    /// Flips available ↔ available-but-hidden without re-fetching.
    ToggleAnalysisVisibility(String),
}

/// Immutable snapshot of the dashboard table's session state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableState {
    sort: Option<(Column, SortDirection)>,
    search: String,
    state_filter: Option<ProcessingState>,
    resource_type_filter: Option<String>,
    version_filter: Option<FhirVersion>,
    page_size: PageSize,
    page_index: usize,
    expanded: BTreeSet<String>,
    analyses: BTreeMap<String, AnalysisState>,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one action, consuming this snapshot and returning the next.
    ///
    /// Filter and sort transitions reset the page index to the first page;
    /// page-size changes rely on view-time clamping instead so the current
    /// rows stay reachable.
    pub fn apply(mut self, action: TableAction) -> Self {
        match action {
            TableAction::ToggleSort(column) => {
                self.sort = match self.sort {
                    Some((current, SortDirection::Ascending)) if current == column => {
                        Some((column, SortDirection::Descending))
                    }
                    Some((current, SortDirection::Descending)) if current == column => None,
                    _ => Some((column, SortDirection::Ascending)),
                };
                self.page_index = 0;
            }
            TableAction::SetSort(sort) => {
                self.sort = sort;
                self.page_index = 0;
            }
            TableAction::SetSearch(search) => {
                self.search = search;
                self.page_index = 0;
            }
            TableAction::SetStateFilter(filter) => {
                self.state_filter = filter;
                self.page_index = 0;
            }
            TableAction::SetResourceTypeFilter(filter) => {
                self.resource_type_filter = filter;
                self.page_index = 0;
            }
            TableAction::SetVersionFilter(filter) => {
                self.version_filter = filter;
                self.page_index = 0;
            }
            TableAction::ClearFilters => {
                self.search.clear();
                self.state_filter = None;
                self.resource_type_filter = None;
                self.version_filter = None;
                self.page_index = 0;
            }
            TableAction::SetPageSize(page_size) => {
                self.page_size = page_size;
            }
            TableAction::NextPage => {
                self.page_index += 1;
            }
            TableAction::PreviousPage => {
                self.page_index = self.page_index.saturating_sub(1);
            }
            TableAction::ToggleExpansion(key) => {
                if !self.expanded.remove(&key) {
                    self.expanded.insert(key);
                }
            }
            TableAction::BeginAnalysis(key) => {
                match self.analyses.get(&key) {
                    Some(AnalysisState::InFlight) => {}
                    _ => {
                        self.analyses.insert(key, AnalysisState::InFlight);
                    }
                }
            }
            TableAction::FinishAnalysis { key, analysis } => {
                self.analyses.insert(
                    key,
                    AnalysisState::Available {
                        text: analysis,
                        hidden: false,
                    },
                );
            }
            TableAction::FailAnalysis(key) => {
                self.analyses.insert(
                    key,
                    AnalysisState::Available {
                        text: ANALYSIS_FAILED_FALLBACK.to_string(),
                        hidden: false,
                    },
                );
            }
            TableAction::ToggleAnalysisVisibility(key) => {
                if let Some(AnalysisState::Available { hidden, .. }) = self.analyses.get_mut(&key) {
                    *hidden = !*hidden;
                }
            }
        }
        self
    }

    pub fn sort(&self) -> Option<(Column, SortDirection)> {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn expanded_rows(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    pub fn analysis(&self, key: &str) -> Option<&AnalysisState> {
        self.analyses.get(key)
    }

    /// Whether an analysis request is currently in flight for `key`.
    ///
    /// This flag is authoritative: callers must check it (or rely on
    /// [`TableAction::BeginAnalysis`] being a no-op) before issuing an
    /// outbound call, so a row already in flight never triggers a second one.
    pub fn analysis_in_flight(&self, key: &str) -> bool {
        matches!(self.analyses.get(key), Some(AnalysisState::InFlight))
    }

    /// The cached analysis text for `key`, or `None` when it is absent,
    /// in flight, or hidden by the visibility toggle.
    pub fn visible_analysis(&self, key: &str) -> Option<&str> {
        match self.analyses.get(key) {
            Some(AnalysisState::Available { text, hidden: false }) => Some(text),
            _ => None,
        }
    }

    fn matches_filters(&self, row: &ResourceWrapper, needle: &str) -> bool {
        let metadata = &row.resource.metadata;
        if let Some(state) = self.state_filter {
            if metadata.state != state {
                return false;
            }
        }
        if let Some(resource_type) = &self.resource_type_filter {
            if &metadata.resource_type != resource_type {
                return false;
            }
        }
        if let Some(version) = self.version_filter {
            if metadata.version != version {
                return false;
            }
        }
        if needle.is_empty() {
            return true;
        }
        Column::ALL
            .into_iter()
            .any(|column| column.value(row).to_lowercase().contains(needle))
    }

    /// The filtered (not paginated) row set, in current sort order.
    ///
    /// All filters combine with AND semantics; the free-text filter matches
    /// case-insensitively against any column's rendered text. Sorting is
    /// stable, so ties keep collection order.
    pub fn filtered_rows<'a>(&self, data: &'a [ResourceWrapper]) -> Vec<&'a ResourceWrapper> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&ResourceWrapper> = data
            .iter()
            .filter(|row| self.matches_filters(row, &needle))
            .collect();

        if let Some((column, direction)) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = column.value(a).cmp(&column.value(b));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        rows
    }

    /// Number of pages for a filtered row count (zero when nothing matches).
    pub fn page_count(&self, filtered_len: usize) -> usize {
        filtered_len.div_ceil(self.page_size.get())
    }

    /// The stored page index clamped into the valid range, so the view can
    /// never point past the last page after filters or page size change.
    pub fn effective_page_index(&self, filtered_len: usize) -> usize {
        self.page_index
            .min(self.page_count(filtered_len).saturating_sub(1))
    }

    /// The rows of the current (clamped) page.
    pub fn page_rows<'a>(&self, data: &'a [ResourceWrapper]) -> Vec<&'a ResourceWrapper> {
        let filtered = self.filtered_rows(data);
        let size = self.page_size.get();
        let start = self.effective_page_index(filtered.len()) * size;
        filtered.into_iter().skip(start).take(size).collect()
    }
}
