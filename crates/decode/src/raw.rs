//! Defensive traversal over untyped positional payloads.
//!
//! The upstream format is undocumented and known to add or drop trailing
//! fields between service versions, so every path access here short-circuits
//! to "absent" instead of failing. A truncated or malformed item must decode
//! into a partially-populated entity, never into an error.

use serde_json::Value;

/// A cursor into a raw payload that may point at nothing.
///
/// All navigation methods are total: stepping off the end of an array,
/// indexing a scalar, or looking up a missing extension tag all yield an
/// absent cursor, from which every terminal accessor returns `None`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use snapops_decode::raw::Raw;
///
/// let payload = json!([101, ["thumb", 800, 600]]);
/// let raw = Raw::new(&payload);
/// assert_eq!(raw.get(1).get(2).as_u64(), Some(600));
/// assert_eq!(raw.get(9).get(0).as_u64(), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Raw<'a>(Option<&'a Value>);

impl<'a> Raw<'a> {
    /// Point at the root of a payload.
    pub fn new(value: &'a Value) -> Self {
        // JSON null behaves like an absent value throughout.
        if value.is_null() { Self(None) } else { Self(Some(value)) }
    }

    /// A cursor pointing at nothing.
    pub fn absent() -> Self {
        Self(None)
    }

    /// Step to a fixed array offset.
    pub fn get(self, index: usize) -> Self {
        Self(self.0.and_then(|v| v.get(index)).filter(|v| !v.is_null()))
    }

    /// Step to the last element of an array; this is where the extension
    /// map lives on every item grammar.
    pub fn last(self) -> Self {
        Self(self.0.and_then(Value::as_array).and_then(|a| a.last()).filter(|v| !v.is_null()))
    }

    /// Look up an extension-field tag by exact integer key equality.
    ///
    /// The extension map is an untyped object whose keys are decimal
    /// renderings of large integers; lookup must work regardless of how many
    /// other tags are present or in what order they appear.
    pub fn ext(self, tag: u64) -> Self {
        let found = self.0.and_then(Value::as_object).and_then(|map| {
            map.iter().find(|(key, _)| key.parse::<u64>() == Ok(tag)).map(|(_, value)| value)
        });
        Self(found.filter(|v| !v.is_null()))
    }

    /// Whether the cursor points at a value at all.
    pub fn is_present(self) -> bool {
        self.0.is_some()
    }

    /// The underlying array, when the cursor points at one.
    pub fn as_array(self) -> Option<&'a Vec<Value>> {
        self.0.and_then(Value::as_array)
    }

    /// Decode each element of the underlying array; absent → empty.
    pub fn map_items<T>(self, f: impl Fn(Raw<'a>) -> T) -> Vec<T> {
        self.as_array().map(|items| items.iter().map(|item| f(Raw::new(item))).collect()).unwrap_or_default()
    }

    /// Identifier accessor: strings pass through, bare numbers are
    /// stringified rather than dropped.
    pub fn as_id(self) -> Option<String> {
        match self.0 {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Lenient signed integer: accepts numbers and numeric strings (the
    /// service renders some timestamps as strings).
    pub fn as_i64(self) -> Option<i64> {
        match self.0 {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
    }

    /// Lenient unsigned integer, same coercions as [`as_i64`](Self::as_i64).
    pub fn as_u64(self) -> Option<u64> {
        match self.0 {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
    }

    /// Truthiness in the source grammar: booleans as-is, numbers by
    /// non-zero-ness. Anything else is absent, not `false`.
    pub fn as_flag(self) -> Option<bool> {
        match self.0 {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Number(n)) => Some(n.as_i64().is_some_and(|i| i != 0) || n.as_f64().is_some_and(|f| f != 0.0)),
            _ => None,
        }
    }
}

impl<'a> From<&'a Value> for Raw<'a> {
    fn from(value: &'a Value) -> Self {
        Self::new(value)
    }
}
