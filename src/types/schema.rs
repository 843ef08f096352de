use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{
    error::{DatabaseError, Result},
    value::DataType,
};

/// A single named, typed field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub data_type: DataType,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered field-type contract every row of a table conforms to.
///
/// A schema always has at least one field and never changes after it is
/// built; rows share it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self> {
        if fields.is_empty() {
            return Err(DatabaseError::InvalidSchema {
                details: "a schema needs at least one field".to_string(),
            });
        }
        Ok(Self { fields })
    }

    /// Builds a schema from `(name, type)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, DataType)>) -> Result<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, data_type)| FieldSchema::new(name, data_type))
                .collect(),
        )
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, index: usize) -> Result<&FieldSchema> {
        self.fields
            .get(index)
            .ok_or(DatabaseError::FieldIndexOutOfBounds {
                index,
                len: self.fields.len(),
            })
    }

    pub fn field_name(&self, index: usize) -> Result<&str> {
        self.field(index).map(|field| field.name.as_str())
    }

    pub fn field_type(&self, index: usize) -> Result<DataType> {
        self.field(index).map(|field| field.data_type)
    }

    /// Position of the first field called `name`.
    pub fn field_index(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|field| field.name == name)
            .ok_or_else(|| DatabaseError::FieldNotFound {
                name: name.to_string(),
            })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter()
    }

    /// Concatenates two schemas, `first`'s fields before `second`'s.
    pub fn merge(first: &Schema, second: &Schema) -> Schema {
        let mut fields = first.fields.clone();
        fields.extend(second.fields.iter().cloned());
        Schema { fields }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}({})", field.name, field.data_type)?;
        }
        Ok(())
    }
}
