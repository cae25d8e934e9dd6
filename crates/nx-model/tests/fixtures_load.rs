use std::path::Path;

use nx_model::schema::*;
use nx_model::{
    DimensionDescriptor, EntityReader, MemoryFile, ModelError, OdmlType, Value, from_yaml_str,
    load_json,
};

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn json_fixture_loads() {
    let file = load_json(&fixture_path("minimal.json")).expect("fixture should load");
    let header = file.file().unwrap();
    assert_eq!(header.version, vec![1, 2, 1]);
    assert_eq!(header.format, "nix");
    assert_eq!(header.blocks.len(), 1);

    let block = file.block(header.blocks[0]).unwrap();
    assert_eq!(block.name.as_deref(), Some("session"));
    assert_eq!(block.data_arrays.len(), 2);

    let trace = file.data_array(block.data_arrays[0]).unwrap();
    assert_eq!(trace.shape, vec![4, 3]);
    assert_eq!(trace.dimensions[0].index, 1);
    assert_eq!(
        trace.dimensions[0].descriptor,
        DimensionDescriptor::Sampled {
            interval: 0.5,
            offset: None,
            unit: Some("ms".into())
        }
    );
    assert_eq!(trace.dimensions[1].index, 2);

    let tag = file.tag(block.tags[0]).unwrap();
    assert_eq!(tag.references, vec![block.data_arrays[0]]);

    let mtag = file.multi_tag(block.multi_tags[0]).unwrap();
    assert_eq!(mtag.positions, Some(block.data_arrays[1]));
    assert_eq!(mtag.extents, None);

    let section = file.section(header.sections[0]).unwrap();
    let weight = file.property(section.properties[0]).unwrap();
    assert_eq!(weight.values, vec![Value::Float(21.5)]);
    let alive = file.property(section.properties[1]).unwrap();
    assert_eq!(alive.odml_type, Some(OdmlType::Boolean));
}

#[test]
fn yaml_and_json_describe_the_same_file() {
    let json = std::fs::read_to_string(fixture_path("minimal.json")).unwrap();
    let def: FileDef = serde_json::from_str(&json).unwrap();
    let yaml = serde_yaml::to_string(&def).unwrap();

    let from_json = MemoryFile::from_def(&def).unwrap();
    let from_yaml = from_yaml_str(&yaml).unwrap();
    assert_eq!(from_json.file().unwrap(), from_yaml.file().unwrap());
    for &id in from_json.block_ids() {
        assert_eq!(from_json.block(id).unwrap(), from_yaml.block(id).unwrap());
    }
}

#[test]
fn explicit_dimension_index_is_kept() {
    let yaml = r#"
format: nix
version: [1, 2, 1]
blocks:
  - name: b
    type: t
    data_arrays:
      - name: da
        type: t
        shape: [3]
        dimensions:
          - dimension_type: set
            index: 10
          - dimension_type: polar
"#;
    let file = from_yaml_str(yaml).unwrap();
    let da = file.data_array(file.block(file.block_ids()[0]).unwrap().data_arrays[0]).unwrap();
    assert_eq!(da.dimensions[0].index, 10);
    assert_eq!(da.dimensions[1].index, 2);
    assert_eq!(
        da.dimensions[1].descriptor,
        DimensionDescriptor::Unknown {
            dimension_type: "polar".into()
        }
    );
}

#[test]
fn unknown_reference_name_is_rejected() {
    let yaml = r#"
blocks:
  - name: b
    type: t
    tags:
      - name: tag
        type: t
        position: [1]
        references: [nowhere]
"#;
    match from_yaml_str(yaml) {
        Err(ModelError::MissingReference { name, context }) => {
            assert_eq!(name, "nowhere");
            assert!(context.contains("block 'b'"));
        }
        other => panic!("expected MissingReference, got {other:?}"),
    }
}

#[test]
fn duplicate_data_array_name_is_rejected() {
    let yaml = r#"
blocks:
  - name: b
    type: t
    data_arrays:
      - { name: da, type: t, shape: [1] }
      - { name: da, type: t, shape: [2] }
"#;
    assert!(matches!(
        from_yaml_str(yaml),
        Err(ModelError::DuplicateName { name, .. }) if name == "da"
    ));
}

#[test]
fn malformed_yaml_is_an_error() {
    assert!(matches!(
        from_yaml_str("blocks: [ {name: "),
        Err(ModelError::Yaml(_))
    ));
}
