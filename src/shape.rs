//! Shape descriptors and outcome classification.
//!
//! A [`ShapeDescriptor`] names a candidate outcome shape by the set of field
//! names a value must carry to count as that shape. Classification walks an
//! ordered candidate list and picks the first descriptor whose required
//! fields are all present on the value; field *values* are never inspected,
//! only key presence.

use std::fmt;

use serde_json::Value;

/// A type that can serve as a classification target.
///
/// `REQUIRED_FIELDS` is the capability set: a value classifies as this shape
/// when every listed field name is present on it. An empty list matches any
/// value vacuously, including null and primitives.
pub trait Shape: Default {
    /// Name used in diagnostics and debug output.
    const NAME: &'static str;
    /// Field names a value must carry to classify as this shape.
    const REQUIRED_FIELDS: &'static [&'static str];
}

/// A candidate outcome shape: a declared field set plus a constructor for
/// the fresh instance handed to the matching callback.
///
/// Usually derived from a [`Shape`] implementation via
/// [`ShapeDescriptor::of`]; [`ShapeDescriptor::new`] assembles one directly
/// for targets that cannot implement the trait.
pub struct ShapeDescriptor<T> {
    name: &'static str,
    required_fields: &'static [&'static str],
    construct: fn() -> T,
}

impl<T> ShapeDescriptor<T> {
    /// Build a descriptor from explicit parts.
    #[must_use]
    pub fn new(
        name: &'static str,
        required_fields: &'static [&'static str],
        construct: fn() -> T,
    ) -> Self {
        Self {
            name,
            required_fields,
            construct,
        }
    }

    /// Derive a descriptor from a [`Shape`] implementation.
    #[must_use]
    pub fn of<Concrete>() -> Self
    where
        Concrete: Shape + Into<T>,
    {
        Self {
            name: Concrete::NAME,
            required_fields: Concrete::REQUIRED_FIELDS,
            construct: || Concrete::default().into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn required_fields(&self) -> &'static [&'static str] {
        self.required_fields
    }

    /// Presence test: does `value` carry every required field?
    ///
    /// Zero required fields match any value. Non-object values (null,
    /// numbers, strings, arrays, booleans) cannot be probed for fields and
    /// fail every non-empty descriptor.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        if self.required_fields.is_empty() {
            return true;
        }
        match value.as_object() {
            Some(map) => self
                .required_fields
                .iter()
                .all(|field| map.contains_key(*field)),
            None => false,
        }
    }

    /// Construct the fresh instance handed to the callback on a match.
    #[must_use]
    pub fn construct(&self) -> T {
        (self.construct)()
    }
}

impl<T> fmt::Debug for ShapeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeDescriptor")
            .field("name", &self.name)
            .field("required_fields", &self.required_fields)
            .finish_non_exhaustive()
    }
}

/// Find the first descriptor in `candidates` that `value` matches.
///
/// Candidates are tested in list order; ordering is the only ambiguity
/// resolution.
#[must_use]
pub fn classify<'a, T>(
    value: &Value,
    candidates: &'a [ShapeDescriptor<T>],
) -> Option<&'a ShapeDescriptor<T>> {
    candidates.iter().find(|candidate| candidate.matches(value))
}
