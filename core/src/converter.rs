//! Value converters applied to request payloads and response bodies.
//!
//! # Design
//! A `Converter` is a named pair of functions over `serde_json::Value`. A
//! `ConverterSet` is an ordered chain: encoding folds the converters
//! front-to-back, decoding folds them back-to-front, so a chain of
//! well-formed pairs round-trips any value it accepts.
//!
//! The client treats the functions as opaque. `Converter::deep` is provided
//! for the common case of a transform that targets individual nodes (for
//! example a tagged representation of a type plain JSON cannot carry).

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type ConvertFn = dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync;

/// Which half of a converter failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Encode => "encode",
            Direction::Decode => "decode",
        })
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("converter `{converter}` failed to {direction}: {source}")]
    Converter {
        converter: String,
        direction: Direction,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A bidirectional transform between an application value and its wire
/// representation.
#[derive(Clone)]
pub struct Converter {
    name: String,
    encode: Arc<ConvertFn>,
    decode: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<E, D>(name: impl Into<String>, encode: E, decode: D) -> Self
    where
        E: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
        D: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    /// Build a converter whose functions are applied to every node of the
    /// value tree, children before their parent.
    ///
    /// Both functions must return nodes they do not recognise unchanged.
    pub fn deep<E, D>(name: impl Into<String>, encode: E, decode: D) -> Self
    where
        E: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
        D: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self::new(
            name,
            move |value| walk(value, &encode),
            move |value| walk(value, &decode),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encode(&self, value: Value) -> Result<Value, ConvertError> {
        (self.encode)(value).map_err(|source| ConvertError::Converter {
            converter: self.name.clone(),
            direction: Direction::Encode,
            source,
        })
    }

    pub fn decode(&self, value: Value) -> Result<Value, ConvertError> {
        (self.decode)(value).map_err(|source| ConvertError::Converter {
            converter: self.name.clone(),
            direction: Direction::Decode,
            source,
        })
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("name", &self.name).finish_non_exhaustive()
    }
}

fn walk<F>(value: Value, f: &F) -> Result<Value, BoxError>
where
    F: Fn(Value) -> Result<Value, BoxError>,
{
    let value = match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| walk(item, f))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, item)| Ok((key, walk(item, f)?)))
                .collect::<Result<Map<String, Value>, BoxError>>()?,
        ),
        other => other,
    };
    f(value)
}

/// An ordered chain of converters shared by a client and its requests.
#[derive(Debug, Clone, Default)]
pub struct ConverterSet {
    converters: Vec<Converter>,
}

impl ConverterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, converter: Converter) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn push(&mut self, converter: Converter) {
        self.converters.push(converter);
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Converter> {
        self.converters.iter()
    }

    pub fn encode_value(&self, value: Value) -> Result<Value, ConvertError> {
        self.converters
            .iter()
            .try_fold(value, |acc, converter| converter.encode(acc))
    }

    pub fn decode_value(&self, value: Value) -> Result<Value, ConvertError> {
        self.converters
            .iter()
            .rev()
            .try_fold(value, |acc, converter| converter.decode(acc))
    }

    /// Serialize `value` and run it through the chain, producing the wire
    /// payload.
    pub fn to_payload<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, ConvertError> {
        self.encode_value(serde_json::to_value(value)?)
    }

    /// Run a wire payload back through the chain and deserialize it.
    pub fn to_object<T: DeserializeOwned>(&self, payload: Value) -> Result<T, ConvertError> {
        Ok(serde_json::from_value(self.decode_value(payload)?)?)
    }
}

impl FromIterator<Converter> for ConverterSet {
    fn from_iter<I: IntoIterator<Item = Converter>>(iter: I) -> Self {
        Self {
            converters: iter.into_iter().collect(),
        }
    }
}
