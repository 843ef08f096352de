use tumpuk::types::{
    error::DatabaseError,
    schema::{FieldSchema, Schema},
    value::DataType,
};

fn users_schema() -> Schema {
    Schema::from_pairs([
        ("id", DataType::Integer),
        ("name", DataType::Text),
        ("score", DataType::Real),
    ])
    .unwrap()
}

#[test]
fn test_schema_requires_at_least_one_field() {
    let result = Schema::new(vec![]);
    assert!(matches!(result, Err(DatabaseError::InvalidSchema { .. })));
}

#[test]
fn test_schema_field_accessors() -> Result<(), DatabaseError> {
    let schema = users_schema();
    assert_eq!(schema.num_fields(), 3);
    assert_eq!(schema.field_name(1)?, "name");
    assert_eq!(schema.field_type(2)?, DataType::Real);
    assert_eq!(schema.field_index("score")?, 2);
    Ok(())
}

#[test]
fn test_schema_out_of_range_and_unknown_names() {
    let schema = users_schema();
    assert!(matches!(
        schema.field_type(3),
        Err(DatabaseError::FieldIndexOutOfBounds { index: 3, len: 3 })
    ));
    assert!(matches!(
        schema.field_index("missing"),
        Err(DatabaseError::FieldNotFound { .. })
    ));
}

#[test]
fn test_schema_merge_keeps_order() -> Result<(), DatabaseError> {
    let left = users_schema();
    let right = Schema::new(vec![FieldSchema::new("active", DataType::Boolean)])?;
    let merged = Schema::merge(&left, &right);

    assert_eq!(merged.num_fields(), 4);
    let names: Vec<&str> = merged.fields().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "score", "active"]);
    assert_eq!(merged.field_type(3)?, DataType::Boolean);
    Ok(())
}

#[test]
fn test_schema_display_and_equality() {
    let schema = users_schema();
    assert_eq!(schema.to_string(), "id(INTEGER), name(TEXT), score(REAL)");
    assert_eq!(schema, users_schema());
    let other = Schema::from_pairs([("id", DataType::Integer)]).unwrap();
    assert_ne!(schema, other);
}
