//! Comparison and collection operators
//!
//! Equality and ordering are type-aware: integers and decimals compare
//! numerically, temporal strings chronologically, records structurally.

use crate::ast::BinaryOperator;
use crate::error::{EvalError, Result};
use crate::temporal::{as_temporal, compare_temporal, compare_temporal_strings, is_temporal};
use crate::value::{Collection, Record, Value, ValueData};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Type-aware equality between two items. Mismatched kinds are unequal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.data(), right.data()) {
        (ValueData::Boolean(a), ValueData::Boolean(b)) => a == b,
        (ValueData::Integer(a), ValueData::Integer(b)) => a == b,
        (ValueData::Decimal(a), ValueData::Decimal(b)) => a == b,
        (ValueData::Integer(a), ValueData::Decimal(b))
        | (ValueData::Decimal(b), ValueData::Integer(a)) => Decimal::from(*a) == *b,
        (ValueData::String(a), ValueData::String(b)) => match compare_temporal_strings(a, b) {
            Some(ordering) => ordering == Ordering::Equal,
            None => a == b,
        },
        (ValueData::Object(a), ValueData::Object(b)) => records_equal(a, b),
        _ if is_temporal(left) || is_temporal(right) => {
            temporal_ordering(left, right) == Some(Ordering::Equal)
        }
        _ => false,
    }
}

/// Ordering between two items, `None` when the kinds are not mutually ordered
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left.data(), right.data()) {
        (ValueData::Integer(a), ValueData::Integer(b)) => Some(a.cmp(b)),
        (ValueData::Decimal(a), ValueData::Decimal(b)) => Some(a.cmp(b)),
        (ValueData::Integer(a), ValueData::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
        (ValueData::Decimal(a), ValueData::Integer(b)) => Some(a.cmp(&Decimal::from(*b))),
        (ValueData::Boolean(a), ValueData::Boolean(b)) => Some(a.cmp(b)),
        (ValueData::String(a), ValueData::String(b)) => {
            Some(compare_temporal_strings(a, b).unwrap_or_else(|| a.cmp(b)))
        }
        _ if is_temporal(left) || is_temporal(right) => temporal_ordering(left, right),
        _ => None,
    }
}

fn temporal_ordering(left: &Value, right: &Value) -> Option<Ordering> {
    compare_temporal(&as_temporal(left)?, &as_temporal(right)?)
}

fn records_equal(left: &Record, right: &Record) -> bool {
    left.len() == right.len()
        && left.iter().all(|(key, items)| {
            right
                .get(key)
                .is_some_and(|other| collections_equal(items, other))
        })
}

/// Pairwise, order-sensitive equality of two collections
pub fn collections_equal(left: &Collection, right: &Collection) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(a, b)| values_equal(a, b))
}

/// Apply a comparison operator to two operand collections.
///
/// Operands that are not singletons make the comparison undefined, which
/// yields the empty collection rather than an error.
pub fn compare(
    operator: BinaryOperator,
    left: &Collection,
    right: &Collection,
) -> Result<Collection> {
    let (Some(a), Some(b)) = (left.as_singleton(), right.as_singleton()) else {
        return Ok(Collection::empty());
    };

    let result = match operator {
        BinaryOperator::Equal => values_equal(a, b),
        BinaryOperator::NotEqual => !values_equal(a, b),
        _ => {
            let ordering = compare_values(a, b).ok_or_else(|| EvalError::IncomparableOperands {
                operator: operator.symbol().to_string(),
                left: a.type_name().to_string(),
                right: b.type_name().to_string(),
            })?;
            match operator {
                BinaryOperator::LessThan => ordering == Ordering::Less,
                BinaryOperator::LessThanOrEqual => ordering != Ordering::Greater,
                BinaryOperator::GreaterThan => ordering == Ordering::Greater,
                BinaryOperator::GreaterThanOrEqual => ordering != Ordering::Less,
                // not a comparison operator
                _ => return Ok(Collection::empty()),
            }
        }
    };

    Ok(Collection::singleton(Value::boolean(result)))
}

/// Membership: `left in right`
pub fn membership(left: &Collection, right: &Collection) -> Collection {
    match left.as_singleton() {
        Some(item) => {
            let found = right.iter().any(|candidate| values_equal(item, candidate));
            Collection::singleton(Value::boolean(found))
        }
        None => Collection::empty(),
    }
}

/// Remove items equal to an earlier item, keeping first occurrences in order
pub fn distinct(collection: &Collection) -> Collection {
    let mut result = Collection::with_capacity(collection.len());
    for item in collection.iter() {
        if !result.iter().any(|seen| values_equal(seen, item)) {
            result.push(item.clone());
        }
    }
    result
}

/// Concatenate operand results in order, keeping duplicates
pub fn union<'a, I>(collections: I) -> Collection
where
    I: IntoIterator<Item = &'a Collection>,
{
    let mut result = Collection::empty();
    for collection in collections {
        result.extend_from(collection);
    }
    result
}
