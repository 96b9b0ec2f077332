//! Ingredient CSV import
//!
//! Accepts `name,units` rows, with or without a header line. Each row is
//! inserted by name; rows whose name already exists are skipped, so running
//! the import twice changes nothing.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};
use serde::Serialize;

use crate::domain::DomainError;
use crate::models::ingredient;

const MAX_NAME_LEN: usize = 116;
const MAX_UNIT_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRow {
    pub name: String,
    pub measurement_unit: String,
}

/// What happened to one input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Imported,
    SkippedDuplicate,
    Malformed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowResult {
    /// 1-based line number in the source file
    pub line: u64,
    pub name: Option<String>,
    pub outcome: RowOutcome,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub rows: Vec<RowResult>,
}

impl ImportReport {
    fn push(&mut self, line: u64, name: Option<String>, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Imported => self.imported += 1,
            RowOutcome::SkippedDuplicate => self.skipped += 1,
            RowOutcome::Malformed { .. } => self.malformed += 1,
        }
        self.rows.push(RowResult {
            line,
            name,
            outcome,
        });
    }
}

fn is_header(record: &csv::StringRecord) -> bool {
    record.len() == 2
        && record[0].eq_ignore_ascii_case("name")
        && record[1].eq_ignore_ascii_case("units")
}

fn parse_record(record: &csv::StringRecord) -> Result<IngredientRow, String> {
    if record.len() != 2 {
        return Err(format!("expected 2 columns, found {}", record.len()));
    }

    let (name, units) = (&record[0], &record[1]);
    if name.is_empty() {
        return Err("empty name".to_string());
    }
    if units.is_empty() {
        return Err("empty units".to_string());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("name longer than {} characters", MAX_NAME_LEN));
    }
    if units.chars().count() > MAX_UNIT_LEN {
        return Err(format!("units longer than {} characters", MAX_UNIT_LEN));
    }

    Ok(IngredientRow {
        name: name.to_string(),
        measurement_unit: units.to_string(),
    })
}

/// Parse every line into a row or the reason it is malformed.
pub fn parse_ingredients_csv(content: &[u8]) -> Vec<(u64, Result<IngredientRow, String>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 1);
                rows.push((line, Err(format!("CSV parse error: {}", e))));
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);

        if index == 0 && is_header(&record) {
            continue;
        }

        rows.push((line, parse_record(&record)));
    }

    rows
}

/// Insert the parsed rows, recording one outcome per line.
pub async fn import_ingredients<C: ConnectionTrait>(
    db: &C,
    content: &[u8],
) -> Result<ImportReport, DomainError> {
    let mut report = ImportReport::default();

    for (line, parsed) in parse_ingredients_csv(content) {
        let row = match parsed {
            Ok(row) => row,
            Err(reason) => {
                tracing::warn!("Ingredient import line {}: {}", line, reason);
                report.push(line, None, RowOutcome::Malformed { reason });
                continue;
            }
        };

        let model = ingredient::ActiveModel {
            name: Set(row.name.clone()),
            measurement_unit: Set(row.measurement_unit),
            ..Default::default()
        };
        let inserted = ingredient::Entity::insert(model)
            .on_conflict(
                OnConflict::column(ingredient::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        let outcome = if inserted == 0 {
            tracing::debug!("Ingredient {} already present, skipped", row.name);
            RowOutcome::SkippedDuplicate
        } else {
            RowOutcome::Imported
        };
        report.push(line, Some(row.name), outcome);
    }

    tracing::info!(
        "Ingredient import: {} imported, {} skipped, {} malformed",
        report.imported,
        report.skipped,
        report.malformed
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let rows = parse_ingredients_csv(b"name,units\napple,pcs\nsugar,g\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].1,
            Ok(IngredientRow {
                name: "apple".to_string(),
                measurement_unit: "pcs".to_string()
            })
        );
        assert_eq!(rows[1].0, 3);
    }

    #[test]
    fn test_parse_headerless_and_trims() {
        let rows = parse_ingredients_csv("  flour , g\n\"salt, sea\",g\n".as_bytes());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1.as_ref().unwrap().name, "flour");
        assert_eq!(rows[1].1.as_ref().unwrap().name, "salt, sea");
    }

    #[test]
    fn test_parse_malformed_rows() {
        let rows = parse_ingredients_csv(b"apple\n,g\nmilk,\nbutter,g,extra\nhoney,ml\n");
        let errors: Vec<bool> = rows.iter().map(|(_, r)| r.is_err()).collect();
        assert_eq!(errors, vec![true, true, true, true, false]);
    }
}
