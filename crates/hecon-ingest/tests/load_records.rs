//! Integration tests for loading and normalizing discharge extracts.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use hecon_ingest::{FieldRole, IngestError, SchemaMapping, load_records};
use hecon_model::Sex;
use tempfile::TempDir;

fn temp_csv(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("egresos.csv");
    let mut file = File::create(&path).expect("create csv");
    file.write_all(contents.as_bytes()).expect("write csv");
    (dir, path)
}

#[test]
fn ages_outside_plausible_range_become_null() {
    let (_dir, path) = temp_csv(
        "edad,sexo,gasto_nivel_6\n\
         -5,M,100\n\
         0,F,200\n\
         18,MUJER,300\n\
         45,HOMBRE,400\n\
         130,X,500\n\
         ,,600\n",
    );
    let batch = load_records(&path, &SchemaMapping::default()).unwrap();

    let ages: Vec<_> = batch.records.iter().map(|r| r.age).collect();
    assert_eq!(ages, vec![None, Some(0), Some(18), Some(45), None, None]);

    let sexes: Vec<_> = batch.records.iter().map(|r| r.sex).collect();
    assert_eq!(
        sexes,
        vec![
            Sex::Male,
            Sex::Female,
            Sex::Female,
            Sex::Male,
            Sex::Unspecified,
            Sex::Unspecified
        ]
    );

    assert_eq!(batch.warnings.for_column("edad").out_of_range, 2);
    assert_eq!(batch.warnings.for_column("sexo").unparseable, 1);
}

#[test]
fn missing_required_column_names_it() {
    let (_dir, path) = temp_csv("edad,sexo\n30,M\n");
    let err = load_records(&path, &SchemaMapping::default()).unwrap_err();
    assert!(matches!(err, IngestError::Schema { ref column } if column == "gasto_nivel_6"));
}

#[test]
fn missing_optional_columns_are_reported() {
    let (_dir, path) = temp_csv("gasto_nivel_6\n100\n");
    let batch = load_records(&path, &SchemaMapping::default()).unwrap();
    assert_eq!(batch.len(), 1);
    assert!(batch.missing_optional.contains(&FieldRole::Service));
    assert!(batch.missing_optional.contains(&FieldRole::Age));
}

#[test]
fn missing_file_is_file_read_error() {
    let dir = TempDir::new().unwrap();
    let err = load_records(&dir.path().join("absent.csv"), &SchemaMapping::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
}

#[test]
fn mapping_from_toml_overrides_columns() {
    let mapping: SchemaMapping = toml::from_str(
        r#"
        service = "FYF7Y9IB2I2II_L5JF77Y5J5F1B"
        billed_cost = { column = "costo_total", required = true }
        "#,
    )
    .unwrap();
    assert_eq!(mapping.service.column, "FYF7Y9IB2I2II_L5JF77Y5J5F1B");
    assert_eq!(mapping.age.column, "edad");

    let (_dir, path) = temp_csv(
        "costo_total,FYF7Y9IB2I2II_L5JF77Y5J5F1B,fecha_egreso_general\n\
         1500.5,URGENCIAS,2025-03-14 10:00:00\n",
    );
    let batch = load_records(&path, &mapping).unwrap();
    let record = &batch.records[0];
    assert_eq!(record.billed_cost, Some(1500.5));
    assert_eq!(record.service.as_deref(), Some("URGENCIAS"));
    assert!(record.closed_at.is_some());
}
