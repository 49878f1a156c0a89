//! CSV rendering of an anonymized dataset.

use std::io::Write;

use crate::anonymizer::AnonymizedDataset;
use crate::error::Result;

/// Writes the dataset header and one row per record.
///
/// Cells a record has no value for are written empty.
pub fn write_csv<W: Write>(dataset: &AnonymizedDataset, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&dataset.columns)?;
    for record in &dataset.records {
        csv_writer.write_record(
            dataset
                .columns
                .iter()
                .map(|column| record.value(column).unwrap_or_default()),
        )?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use hecon_model::{AnonymizedField, AnonymizedRecord, Technique};

    use super::*;

    #[test]
    fn writes_header_and_rows_in_column_order() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "sexo".to_string(),
            AnonymizedField {
                technique: Technique::Retained,
                value: "F".to_string(),
            },
        );
        let dataset = AnonymizedDataset {
            columns: vec!["edad_grupo".to_string(), "sexo".to_string()],
            records: vec![AnonymizedRecord::new(fields)],
        };
        let mut out = Vec::new();
        write_csv(&dataset, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "edad_grupo,sexo\n,F\n");
    }
}
