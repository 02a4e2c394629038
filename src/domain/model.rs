use serde::Serialize;
use serde_json::{Number, Value};

/// One event as returned by the remote API. Only partially consumed downstream.
pub type RawEventRecord = Value;

/// Successful payloads in fetch-completion order.
pub type ExtractedDataset = Vec<RawEventRecord>;

/// Output columns, in order. Every flattened row has exactly this many cells.
pub const COLUMNS: [&str; 49] = [
    "event_id",
    "country_name",
    "iso_code",
    "admin_division",
    "disease_name",
    "disease_subtype",
    "disease_group",
    "causal_agent_type",
    "species_name",
    "is_wild",
    "epi_unit_type",
    "is_domestic",
    "is_aquatic",
    "latitude",
    "longitude",
    "location_approx",
    "event_started_on",
    "event_confirmed_on",
    "event_ended_on",
    "outbreak_start_date",
    "outbreak_end_date",
    "last_occurrence",
    "reported_on",
    "susceptible",
    "cases",
    "deaths",
    "killed",
    "slaughtered",
    "vaccinated",
    "intervention_quarantine_applied",
    "intervention_movement_control_applied",
    "intervention_stamping_out_applied",
    "intervention_disinfection_applied",
    "intervention_surveillance_applied",
    "intervention_screening_applied",
    "intervention_disposal_applied",
    "intervention_vaccination_applied",
    "intervention_zoning_applied",
    "intervention_vector_control_applied",
    "intervention_wildlife_control_applied",
    "intervention_traceability_applied",
    "intervention_treatment_applied",
    "intervention_slaughter_applied",
    "intervention_count",
    "all_intervention",
    "lab_test_performed",
    "diagnostic_method_types",
    "event_status",
    "reason_type",
];

/// Classification of a single id attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(RawEventRecord),
    /// The remote rejected the id (HTTP 400).
    Skipped,
    Error { status: u16 },
    NetworkError { message: String },
}

impl FetchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "SUCCESS",
            FetchOutcome::Skipped => "SKIPPED",
            FetchOutcome::Error { .. } => "ERROR",
            FetchOutcome::NetworkError { .. } => "NETWORK ERROR",
        }
    }

    /// Payload worth keeping. Empty successes (`null`, `""`, `0`, `false`) carry no record.
    pub fn into_payload(self) -> Option<RawEventRecord> {
        match self {
            FetchOutcome::Success(payload) if !is_empty_payload(&payload) => Some(payload),
            _ => None,
        }
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub errors: usize,
    pub network_errors: usize,
}

impl FetchReport {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        self.attempted += 1;
        match outcome {
            FetchOutcome::Success(_) => self.succeeded += 1,
            FetchOutcome::Skipped => self.skipped += 1,
            FetchOutcome::Error { .. } => self.errors += 1,
            FetchOutcome::NetworkError { .. } => self.network_errors += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterventionFlag {
    pub name: String,
    pub applied: bool,
}

/// Derived from an event's measure names; never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterventionFlags {
    pub flags: Vec<InterventionFlag>,
    pub intervention_count: usize,
    pub all_intervention: Vec<String>,
}

impl InterventionFlags {
    pub fn is_applied(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name && f.applied)
    }

    pub fn applied_count(&self) -> usize {
        self.flags.iter().filter(|f| f.applied).count()
    }
}

/// A single CSV cell before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<String>),
}

impl Cell {
    pub fn count(n: usize) -> Self {
        Cell::Number(Number::from(n))
    }
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => Cell::Number(n.clone()),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Array(items) => Cell::List(items.iter().map(list_element).collect()),
            Value::Object(_) => Cell::Text(value.to_string()),
        }
    }
}

/// Text of an array element once joined into a list cell; null becomes empty.
fn list_element(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedRow(pub Vec<Cell>);

impl FlattenedRow {
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
