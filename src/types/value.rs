use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::types::error::{DatabaseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Real,
    Text,
    Blob,
    Boolean,
}

impl DataType {
    pub fn as_u8(&self) -> u8 {
        match self {
            DataType::Integer => 1,
            DataType::Real => 2,
            DataType::Text => 3,
            DataType::Blob => 4,
            DataType::Boolean => 5,
        }
    }

    pub fn from_u8(tag: u8) -> Result<Self> {
        match tag {
            1 => Ok(DataType::Integer),
            2 => Ok(DataType::Real),
            3 => Ok(DataType::Text),
            4 => Ok(DataType::Blob),
            5 => Ok(DataType::Boolean),
            _ => Err(DatabaseError::SerializationError {
                details: format!("Unknown type discriminant: {}", tag),
            }),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "INTEGER",
            DataType::Real => "REAL",
            DataType::Text => "TEXT",
            DataType::Blob => "BLOB",
            DataType::Boolean => "BOOLEAN",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Real(_) => DataType::Real,
            Value::Text(_) => DataType::Text,
            Value::Blob(_) => DataType::Blob,
            Value::Boolean(_) => DataType::Boolean,
        }
    }

    /// Payload size, without the type tag.
    pub fn size(&self) -> usize {
        match self {
            Value::Integer(_) => 8,
            Value::Real(_) => 8,
            Value::Text(s) => s.len(),
            Value::Blob(b) => b.len(),
            Value::Boolean(_) => 1,
        }
    }

    pub fn serialized_size(&self) -> usize {
        match self {
            Value::Text(_) | Value::Blob(_) => 1 + 4 + self.size(),
            _ => 1 + self.size(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.serialized_size());
        buffer.push(self.data_type().as_u8());
        match self {
            Value::Integer(i) => buffer.extend_from_slice(&i.to_le_bytes()),
            Value::Real(r) => buffer.extend_from_slice(&r.to_le_bytes()),
            Value::Text(s) => {
                buffer.extend_from_slice(&(s.len() as u32).to_le_bytes());
                buffer.extend_from_slice(s.as_bytes());
            }
            Value::Blob(b) => {
                buffer.extend_from_slice(&(b.len() as u32).to_le_bytes());
                buffer.extend_from_slice(b);
            }
            Value::Boolean(b) => buffer.push(u8::from(*b)),
        }
        buffer
    }

    /// Decodes one value from the front of `bytes`, returning it with the
    /// number of bytes consumed.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize)> {
        let Some(&tag) = bytes.first() else {
            return Err(DatabaseError::SerializationError {
                details: "Empty value bytes".to_string(),
            });
        };
        let data_type = DataType::from_u8(tag)?;
        let body = &bytes[1..];
        match data_type {
            DataType::Integer => {
                let raw = take::<8>(body, "integer")?;
                Ok((Value::Integer(i64::from_le_bytes(raw)), 9))
            }
            DataType::Real => {
                let raw = take::<8>(body, "real")?;
                Ok((Value::Real(f64::from_le_bytes(raw)), 9))
            }
            DataType::Boolean => {
                let raw = take::<1>(body, "boolean")?;
                Ok((Value::Boolean(raw[0] != 0), 2))
            }
            DataType::Text | DataType::Blob => {
                let length = u32::from_le_bytes(take::<4>(body, "length")?) as usize;
                let payload = body.get(4..4 + length).ok_or_else(|| {
                    DatabaseError::SerializationError {
                        details: format!(
                            "Insufficient bytes for {}: expected {}, got {}",
                            data_type,
                            length,
                            body.len().saturating_sub(4)
                        ),
                    }
                })?;
                let value = if data_type == DataType::Text {
                    let text = String::from_utf8(payload.to_vec()).map_err(|e| {
                        DatabaseError::SerializationError {
                            details: format!("Invalid UTF-8 text: {}", e),
                        }
                    })?;
                    Value::Text(text)
                } else {
                    Value::Blob(payload.to_vec())
                };
                Ok((value, 1 + 4 + length))
            }
        }
    }
}

fn take<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| DatabaseError::SerializationError {
            details: format!("Incomplete {} value", what),
        })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Real(b)) => (*a as f64).partial_cmp(b),
            (Value::Real(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            (Value::Blob(a), Value::Blob(b)) => a.partial_cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.partial_cmp(b),
            _ => None, // Mixed types
        }
    }
}
