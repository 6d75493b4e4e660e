//! Runtime values and collections
//!
//! Every evaluation step produces a [`Collection`]: an ordered sequence of
//! [`Value`]s. A record field always holds a collection, so a JSON array
//! and a JSON scalar navigate the same way.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Precision of a date value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

/// Precision of a date-time value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateTimePrecision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

/// Precision of a time-of-day value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimePrecision {
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl From<DatePrecision> for DateTimePrecision {
    fn from(precision: DatePrecision) -> Self {
        match precision {
            DatePrecision::Year => DateTimePrecision::Year,
            DatePrecision::Month => DateTimePrecision::Month,
            DatePrecision::Day => DateTimePrecision::Day,
        }
    }
}

/// A record: field name to the collection stored under it
pub type Record = BTreeMap<Arc<str>, Collection>;

/// Value payload
#[derive(Debug, Clone, PartialEq)]
pub enum ValueData {
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    String(Arc<str>),
    Date {
        value: NaiveDate,
        precision: DatePrecision,
    },
    /// Local date-time as written, with its offset in seconds east of UTC
    DateTime {
        value: NaiveDateTime,
        precision: DateTimePrecision,
        offset: Option<i32>,
    },
    Time {
        value: NaiveTime,
        precision: TimePrecision,
    },
    Object(Arc<Record>),
}

/// Cheap-to-clone handle to an immutable value
#[derive(Clone, PartialEq)]
pub struct Value {
    data: Arc<ValueData>,
}

impl Value {
    pub fn new(data: ValueData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub fn data(&self) -> &ValueData {
        &self.data
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ValueData::Boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(ValueData::Integer(value))
    }

    pub fn decimal(value: Decimal) -> Self {
        Self::new(ValueData::Decimal(value))
    }

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Self::new(ValueData::String(value.into()))
    }

    pub fn date_with_precision(value: NaiveDate, precision: DatePrecision) -> Self {
        Self::new(ValueData::Date { value, precision })
    }

    pub fn datetime_with_precision_and_offset(
        value: NaiveDateTime,
        precision: DateTimePrecision,
        offset: Option<i32>,
    ) -> Self {
        Self::new(ValueData::DateTime {
            value,
            precision,
            offset,
        })
    }

    pub fn time_with_precision(value: NaiveTime, precision: TimePrecision) -> Self {
        Self::new(ValueData::Time { value, precision })
    }

    pub fn object(record: Record) -> Self {
        Self::new(ValueData::Object(Arc::new(record)))
    }

    /// Build a record from `(field, collection)` pairs
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Collection)>,
    {
        Self::object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Name of the value kind, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self.data() {
            ValueData::Boolean(_) => "Boolean",
            ValueData::Integer(_) => "Integer",
            ValueData::Decimal(_) => "Decimal",
            ValueData::String(_) => "String",
            ValueData::Date { .. } => "Date",
            ValueData::DateTime { .. } => "DateTime",
            ValueData::Time { .. } => "Time",
            ValueData::Object(_) => "Record",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data() {
            ValueData::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.data() {
            ValueData::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self.data() {
            ValueData::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Field lookup; `None` for absent keys and non-record values
    pub fn field(&self, name: &str) -> Option<&Collection> {
        self.as_record().and_then(|record| record.get(name))
    }

    /// Convert a JSON document into a single value.
    ///
    /// `None` for `null` and for arrays that do not hold exactly one item.
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        Collection::from_json(json).as_singleton().cloned()
    }

    /// JSON form of the value. See the `Serialize` impl for how record
    /// fields are shaped.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.fmt(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            ValueData::Boolean(b) => write!(f, "{}", b),
            ValueData::Integer(i) => write!(f, "{}", i),
            ValueData::Decimal(d) => write!(f, "{}", d),
            ValueData::String(s) => f.write_str(s),
            ValueData::Date { value, precision } => {
                f.write_str(&crate::temporal::format_date(*value, *precision))
            }
            ValueData::DateTime {
                value,
                precision,
                offset,
            } => f.write_str(&crate::temporal::format_datetime(
                *value, *precision, *offset,
            )),
            ValueData::Time { value, precision } => {
                f.write_str(&crate::temporal::format_time(*value, *precision))
            }
            ValueData::Object(_) => f.write_str(&self.to_json().to_string()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::string(value)
    }
}

/// Records keep one collection per field and forget whether the source held
/// an array, a scalar or `null`. A field with one item serializes as that
/// item, any other field as an array: `{"type": ["A"]}` comes back as
/// `{"type": "A"}` and `{"end": null}` as `{"end": []}`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.data() {
            ValueData::Boolean(b) => serializer.serialize_bool(*b),
            ValueData::Integer(i) => serializer.serialize_i64(*i),
            ValueData::Decimal(d) => serializer.serialize_f64(d.to_f64().unwrap_or_default()),
            ValueData::String(s) => serializer.serialize_str(s),
            ValueData::Date { .. } | ValueData::DateTime { .. } | ValueData::Time { .. } => {
                serializer.collect_str(self)
            }
            ValueData::Object(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (key, items) in record.iter() {
                    match items.as_singleton() {
                        Some(item) => map.serialize_entry(key.as_ref(), item)?,
                        None => map.serialize_entry(key.as_ref(), items)?,
                    }
                }
                map.end()
            }
        }
    }
}

/// Ordered sequence of values; duplicates are kept
#[derive(Clone, Default, PartialEq)]
pub struct Collection {
    items: SmallVec<[Value; 1]>,
}

impl Collection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn singleton(value: Value) -> Self {
        let mut items = SmallVec::new();
        items.push(value);
        Self { items }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: SmallVec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn extend_from(&mut self, other: &Collection) {
        self.items.extend(other.items.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// The only item of a singleton collection
    pub fn as_singleton(&self) -> Option<&Value> {
        match self.items.as_slice() {
            [item] => Some(item),
            _ => None,
        }
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items.into_vec()
    }

    /// Convert JSON into a focus collection.
    ///
    /// Arrays contribute their items (nested arrays are flattened), `null`
    /// contributes nothing, everything else becomes one value.
    pub fn from_json(json: &serde_json::Value) -> Self {
        let mut collection = Collection::empty();
        push_json(&mut collection, json);
        collection
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.iter().map(Value::to_json).collect())
    }
}

fn push_json(collection: &mut Collection, json: &serde_json::Value) {
    use serde_json::Value as Json;

    match json {
        Json::Null => {}
        Json::Array(items) => {
            for item in items {
                push_json(collection, item);
            }
        }
        Json::Bool(b) => collection.push(Value::boolean(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                collection.push(Value::integer(i));
            } else if let Some(d) = Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64_retain))
            {
                collection.push(Value::decimal(d));
            }
        }
        Json::String(s) => collection.push(Value::string(s.as_str())),
        Json::Object(map) => {
            let record: Record = map
                .iter()
                .map(|(key, value)| (Arc::from(key.as_str()), Collection::from_json(value)))
                .collect();
            collection.push(Value::object(record));
        }
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self.iter() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Collection {
    type Item = Value;
    type IntoIter = smallvec::IntoIter<[Value; 1]>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Value> for Collection {
    fn from(value: Value) -> Self {
        Collection::singleton(value)
    }
}
