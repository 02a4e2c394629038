use crate::config::keywords::KeywordTable;
use crate::domain::model::{
    Cell, FlattenedRow, InterventionFlag, InterventionFlags, RawEventRecord, COLUMNS,
};
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;

const OUTBREAK: &str = "/outbreaks/0";
const TOTALS: &str = "/quantitativeData/totals/0";

/// Encodes one cell for the CSV output.
///
/// Nulls, empty lists and blank strings all become the literal `null`;
/// booleans become `1`/`0`; strings and lists are always quoted.
pub fn format_value(cell: &Cell) -> String {
    match cell {
        Cell::Null => "null".to_string(),
        Cell::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        // Source text as parsed: `112.0` stays `112.0`.
        Cell::Number(n) => n.to_string(),
        Cell::List(items) if items.is_empty() => "null".to_string(),
        Cell::List(items) => quote(&items.join("|")),
        Cell::Text(s) if s.trim().is_empty() => "null".to_string(),
        Cell::Text(s) => quote(s),
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Derives the intervention flags from an event's `measures` list.
pub fn extract_interventions(measures: &[Value], table: &KeywordTable) -> InterventionFlags {
    let names: Vec<String> = measures
        .iter()
        .map(|m| {
            m.pointer("/measure/name")
                .and_then(Value::as_str)
                .map(str::to_lowercase)
                .unwrap_or_default()
        })
        .collect();

    let flags = table
        .flags
        .iter()
        .map(|flag| InterventionFlag {
            name: flag.name.clone(),
            applied: names.iter().any(|n| flag.matches(n)),
        })
        .collect();

    InterventionFlags {
        flags,
        intervention_count: names.len(),
        all_intervention: names,
    }
}

fn cell_at(record: &Value, pointer: &str) -> Cell {
    record.pointer(pointer).map(Cell::from).unwrap_or(Cell::Null)
}

fn counter_at(record: &Value, field: &str) -> Cell {
    match record.pointer(&format!("{}/{}", TOTALS, field)) {
        None | Some(Value::Null) => Cell::count(0),
        Some(value) => Cell::from(value),
    }
}

fn array_at<'a>(record: &'a Value, pointer: &str) -> &'a [Value] {
    record
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Flattens one event into a row matching [`COLUMNS`].
pub fn transform(record: &RawEventRecord, table: &KeywordTable) -> FlattenedRow {
    let outbreak = |field: &str| cell_at(record, &format!("{}/{}", OUTBREAK, field));
    let totals = |field: &str| cell_at(record, &format!("{}/{}", TOTALS, field));

    let interventions = extract_interventions(array_at(record, "/measures"), table);
    let diagnostic_methods: Vec<Value> = array_at(record, "/methods")
        .iter()
        .map(|m| m.pointer("/nature/keyValue").cloned().unwrap_or(Value::Null))
        .collect();

    let mut cells = vec![
        cell_at(record, "/event/eventId"),
        cell_at(record, "/event/country/name"),
        cell_at(record, "/event/country/isoCode"),
        outbreak("adminDivision"),
        cell_at(record, "/event/disease/name"),
        cell_at(record, "/event/subType/disease/name"),
        cell_at(record, "/event/disease/group"),
        cell_at(record, "/event/causalAgent/type"),
        totals("speciesName"),
        totals("isWild"),
        outbreak("epiUnitType"),
        cell_at(record, "/event/disease/isDomestic"),
        cell_at(record, "/event/disease/isAquatic"),
        outbreak("latitude"),
        outbreak("longitude"),
        outbreak("locationApprox"),
        cell_at(record, "/event/startedOn"),
        cell_at(record, "/event/confirmOn"),
        cell_at(record, "/event/endedOn"),
        outbreak("startDate"),
        outbreak("endDate"),
        cell_at(record, "/event/lastOccurrence"),
        cell_at(record, "/report/reportedOn"),
    ];

    for field in [
        "susceptible",
        "cases",
        "deaths",
        "killed",
        "slaughtered",
        "vaccinated",
    ] {
        cells.push(counter_at(record, field));
    }

    cells.extend(interventions.flags.iter().map(|f| Cell::Bool(f.applied)));
    cells.push(Cell::count(interventions.intervention_count));
    cells.push(Cell::List(interventions.all_intervention));

    cells.push(Cell::count(array_at(record, "/laboratoryTests").len()));
    cells.push(Cell::from(&Value::Array(diagnostic_methods)));
    cells.push(cell_at(record, "/event/eventStatus/translation"));
    cells.push(cell_at(record, "/event/reason/translation"));

    FlattenedRow(cells)
}

/// Header line plus one encoded line per row, joined with `\n` (no trailing newline).
pub fn render_csv(rows: &[FlattenedRow]) -> Result<String> {
    // Cells arrive already quoted by `format_value`.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row.cells().iter().map(format_value))?;
    }

    let mut bytes = writer.into_inner().map_err(|e| EtlError::Io(e.into_error()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }

    String::from_utf8(bytes).map_err(|e| EtlError::InvalidDataset {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

/// Reads the JSON dataset, flattens every record and writes the CSV file.
pub struct Transformer<S: Storage> {
    storage: S,
    keywords: KeywordTable,
}

impl<S: Storage> Transformer<S> {
    pub fn new(storage: S, keywords: KeywordTable) -> Self {
        Self { storage, keywords }
    }

    pub fn transform_dataset(&self, dataset: &[RawEventRecord]) -> Vec<FlattenedRow> {
        dataset.iter().map(|r| transform(r, &self.keywords)).collect()
    }

    /// Returns the number of data rows written.
    pub async fn run(&self, input_path: &str, output_path: &str) -> Result<usize> {
        let raw = self.storage.read_file(input_path).await?;
        let parsed: Value = serde_json::from_slice(&raw)?;
        let Value::Array(dataset) = parsed else {
            return Err(EtlError::InvalidDataset {
                message: format!("{} does not contain a JSON array", input_path),
            });
        };
        tracing::debug!("Loaded {} records from {}", dataset.len(), input_path);

        let rows = self.transform_dataset(&dataset);
        let csv = render_csv(&rows)?;
        self.storage.write_file(output_path, csv.as_bytes()).await?;

        tracing::info!("CSV Generated: {} ({} rows)", output_path, rows.len());
        Ok(rows.len())
    }
}
