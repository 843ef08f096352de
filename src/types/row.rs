use std::{fmt, sync::Arc};

use crate::types::{
    error::{DatabaseError, Result},
    record_id::RecordId,
    schema::Schema,
    value::Value,
};

/// One record of a table: a value slot per schema field plus, once the row is
/// known to live on a page, the address it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<Schema>,
    values: Vec<Option<Value>>,
    record_id: Option<RecordId>,
}

impl Row {
    /// Creates a row with every field unset.
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = vec![None; schema.num_fields()];
        Self {
            schema,
            values,
            record_id: None,
        }
    }

    /// Creates a row and fills its fields in order.
    pub fn with_values(schema: Arc<Schema>, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.num_fields() {
            return Err(DatabaseError::ArityMismatch {
                expected: schema.num_fields(),
                actual: values.len(),
            });
        }
        let mut row = Self::new(schema);
        for (index, value) in values.into_iter().enumerate() {
            row.set_value(index, value)?;
        }
        Ok(row)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    pub fn set_record_id(&mut self, record_id: Option<RecordId>) {
        self.record_id = record_id;
    }

    pub fn num_fields(&self) -> usize {
        self.values.len()
    }

    /// Value of field `index`, `None` while the field is unset.
    pub fn get_value(&self, index: usize) -> Result<Option<&Value>> {
        self.values
            .get(index)
            .map(Option::as_ref)
            .ok_or(DatabaseError::FieldIndexOutOfBounds {
                index,
                len: self.values.len(),
            })
    }

    pub fn set_value(&mut self, index: usize, value: Value) -> Result<()> {
        let expected = self.schema.field_type(index)?;
        if value.data_type() != expected {
            return Err(DatabaseError::TypeMismatch {
                expected: expected.to_string(),
                actual: value.data_type().to_string(),
            });
        }
        self.values[index] = Some(value);
        Ok(())
    }

    pub fn clear_value(&mut self, index: usize) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(DatabaseError::FieldIndexOutOfBounds { index, len })?;
        *slot = None;
        Ok(())
    }

    pub fn fields(&self) -> impl Iterator<Item = Option<&Value>> {
        self.values.iter().map(Option::as_ref)
    }

    pub fn size(&self) -> usize {
        self.values
            .iter()
            .map(|value| 1 + value.as_ref().map_or(0, Value::serialized_size))
            .sum()
    }

    /// Cell encoding: per field a presence byte, then the value when present.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.size());
        for value in &self.values {
            match value {
                Some(value) => {
                    buffer.push(1);
                    buffer.extend_from_slice(&value.to_bytes());
                }
                None => buffer.push(0),
            }
        }
        buffer
    }

    pub fn from_bytes(schema: Arc<Schema>, bytes: &[u8]) -> Result<Self> {
        let mut row = Self::new(schema);
        let mut cursor = 0;
        for index in 0..row.values.len() {
            let present = *bytes
                .get(cursor)
                .ok_or_else(|| DatabaseError::SerializationError {
                    details: format!("Missing presence flag for field {}", index),
                })?;
            cursor += 1;
            match present {
                0 => {}
                1 => {
                    let (value, consumed) = Value::from_bytes(&bytes[cursor..])?;
                    cursor += consumed;
                    row.set_value(index, value)?;
                }
                other => {
                    return Err(DatabaseError::SerializationError {
                        details: format!("Invalid presence flag {} for field {}", other, index),
                    });
                }
            }
        }
        if cursor != bytes.len() {
            return Err(DatabaseError::SerializationError {
                details: format!("{} trailing bytes after row", bytes.len() - cursor),
            });
        }
        Ok(row)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            match value {
                Some(value) => write!(f, "{}", value)?,
                None => f.write_str("null")?,
            }
        }
        f.write_str("\n")
    }
}
