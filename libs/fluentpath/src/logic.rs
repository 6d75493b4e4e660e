//! Three-valued boolean logic

use crate::value::{Collection, Value};

/// Boolean with an explicit "unknown" state for absent data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreeValuedBoolean {
    True,
    False,
    Empty,
}

impl ThreeValuedBoolean {
    /// Coerce a collection for use as a boolean operand.
    ///
    /// A singleton boolean is itself, any other singleton counts as `True`,
    /// an empty or multi-item collection is `Empty`.
    pub fn from_collection(collection: &Collection) -> Self {
        match collection.as_singleton() {
            Some(item) => match item.as_bool() {
                Some(b) => b.into(),
                None => ThreeValuedBoolean::True,
            },
            None => ThreeValuedBoolean::Empty,
        }
    }

    pub fn and(self, other: Self) -> Self {
        use ThreeValuedBoolean::*;
        match (self, other) {
            (False, _) | (_, False) => False,
            (True, True) => True,
            _ => Empty,
        }
    }

    pub fn or(self, other: Self) -> Self {
        use ThreeValuedBoolean::*;
        match (self, other) {
            (True, _) | (_, True) => True,
            (False, False) => False,
            _ => Empty,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            ThreeValuedBoolean::True => ThreeValuedBoolean::False,
            ThreeValuedBoolean::False => ThreeValuedBoolean::True,
            ThreeValuedBoolean::Empty => ThreeValuedBoolean::Empty,
        }
    }

    pub fn is_true(self) -> bool {
        self == ThreeValuedBoolean::True
    }

    /// Known values become a singleton boolean, `Empty` the empty collection
    pub fn into_collection(self) -> Collection {
        match self {
            ThreeValuedBoolean::True => Collection::singleton(Value::boolean(true)),
            ThreeValuedBoolean::False => Collection::singleton(Value::boolean(false)),
            ThreeValuedBoolean::Empty => Collection::empty(),
        }
    }
}

impl From<bool> for ThreeValuedBoolean {
    fn from(value: bool) -> Self {
        if value {
            ThreeValuedBoolean::True
        } else {
            ThreeValuedBoolean::False
        }
    }
}
