//! Datum, schema and dataset model.
//!
//! A [`Schema`] declares a view's fields once, each with a [`FieldRole`].
//! A [`Datum`] stores its values positionally, aligned with the schema, so
//! field access is by [`FieldId`] rather than by name.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::SchemaError;
use crate::id::{FieldId, Key};

/// How a view uses a declared field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Identity key of the mark. Exactly one per schema.
    Identity,
    /// Color and emphasis category shared across views. At most one per
    /// schema; the identity field is the category when absent.
    Category,
    /// Horizontal position. Exactly one per schema.
    PositionX,
    /// Vertical position. Exactly one per schema.
    PositionY,
    /// Text drawn with the mark. At most one per schema.
    Label,
    /// Extra field shown in the tooltip.
    Attribute,
    /// Carried on the datum but never displayed.
    Hidden,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Identity => "identity",
            Self::Category => "category",
            Self::PositionX => "x position",
            Self::PositionY => "y position",
            Self::Label => "label",
            Self::Attribute => "attribute",
            Self::Hidden => "hidden",
        };
        f.write_str(s)
    }
}

/// A declared field: a name and its role in the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name, used for tooltip lines.
    pub name: String,
    /// Role of the field in the view.
    pub role: FieldRole,
}

impl FieldDef {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, role: FieldRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// The declared field layout of one view instantiation.
///
/// Validated on construction: exactly one identity, x and y field, at most
/// one category and one label field, and no duplicate names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDef>,
    identity: FieldId,
    category: Option<FieldId>,
    x: FieldId,
    y: FieldId,
    label: Option<FieldId>,
}

impl Schema {
    /// Build a schema from fields in declaration order.
    pub fn new(fields: Vec<FieldDef>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut identity = None;
        let mut category = None;
        let mut x = None;
        let mut y = None;
        let mut label = None;
        for (i, def) in fields.iter().enumerate() {
            if fields[..i].iter().any(|prev| prev.name == def.name) {
                return Err(SchemaError::DuplicateName {
                    name: def.name.clone(),
                });
            }
            let id = FieldId(i as u32);
            let slot = match def.role {
                FieldRole::Identity => &mut identity,
                FieldRole::Category => &mut category,
                FieldRole::PositionX => &mut x,
                FieldRole::PositionY => &mut y,
                FieldRole::Label => &mut label,
                FieldRole::Attribute | FieldRole::Hidden => continue,
            };
            if slot.replace(id).is_some() {
                return Err(SchemaError::DuplicateRole { role: def.role });
            }
        }
        Ok(Self {
            identity: identity.ok_or(SchemaError::MissingRole {
                role: FieldRole::Identity,
            })?,
            category,
            x: x.ok_or(SchemaError::MissingRole {
                role: FieldRole::PositionX,
            })?,
            y: y.ok_or(SchemaError::MissingRole {
                role: FieldRole::PositionY,
            })?,
            label,
            fields,
        })
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a validated schema.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field definition at `id`, if declared.
    pub fn field(&self, id: FieldId) -> Option<&FieldDef> {
        self.fields.get(id.0 as usize)
    }

    /// Look up a field by name.
    pub fn index_of(&self, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .map(|i| FieldId(i as u32))
    }

    /// The identity field.
    pub fn identity(&self) -> FieldId {
        self.identity
    }

    /// The category field: the declared one, else the identity field.
    pub fn category(&self) -> FieldId {
        self.category.unwrap_or(self.identity)
    }

    /// The horizontal position field.
    pub fn x(&self) -> FieldId {
        self.x
    }

    /// The vertical position field.
    pub fn y(&self) -> FieldId {
        self.y
    }

    /// The label field, if declared.
    pub fn label(&self) -> Option<FieldId> {
        self.label
    }
}

/// A single field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(String),
    /// The field was absent in the source record.
    Missing,
}

impl FieldValue {
    /// Numeric view of the value, coerced to `0.0` when not usable.
    ///
    /// Finite numbers pass through, text is parsed, and everything else
    /// (missing, unparsable, NaN, infinite) becomes `0.0`.
    pub fn as_number(&self) -> f64 {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Self::Missing => 0.0,
        };
        if v.is_finite() {
            v
        } else {
            0.0
        }
    }

    /// True for [`FieldValue::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write_number(f, *n),
            Self::Text(s) => f.write_str(s),
            Self::Missing => Ok(()),
        }
    }
}

/// Integral values print without a fractional part (`2021`, not `2021.0`).
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Missing, Into::into)
    }
}

static MISSING: FieldValue = FieldValue::Missing;

/// One record bound to one mark.
///
/// Values are positional and aligned with the owning dataset's schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Datum {
    key: Key,
    category: Key,
    values: SmallVec<[FieldValue; 6]>,
}

impl Datum {
    /// The identity key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The category key used for color and hover/selection matching.
    pub fn category(&self) -> &Key {
        &self.category
    }

    /// The value of a field, or `Missing` if out of range.
    pub fn value(&self, field: FieldId) -> &FieldValue {
        self.values.get(field.0 as usize).unwrap_or(&MISSING)
    }

    /// The value of a field coerced to a number (see [`FieldValue::as_number`]).
    pub fn number(&self, field: FieldId) -> f64 {
        self.value(field).as_number()
    }

    /// All values in schema order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }
}

/// An immutable snapshot of records delivered by the data layer.
///
/// Each update is a full replacement. Row order is display order only.
/// Identity keys are expected to be unique within one dataset; this is
/// a precondition and is not checked.
#[derive(Clone, Debug)]
pub struct Dataset {
    schema: Arc<Schema>,
    rows: Vec<Datum>,
}

impl Dataset {
    /// An empty dataset for `schema`.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Append a row given its values in schema order.
    ///
    /// Short rows are padded with `Missing`, long rows are truncated. The
    /// identity and category keys are the display forms of their fields.
    pub fn push<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let width = self.schema.len();
        let mut values: SmallVec<[FieldValue; 6]> =
            values.into_iter().take(width).map(Into::into).collect();
        values.resize(width, FieldValue::Missing);
        let key = Key::from(values[self.schema.identity().0 as usize].to_string());
        let category = if self.schema.category() == self.schema.identity() {
            key.clone()
        } else {
            Key::from(values[self.schema.category().0 as usize].to_string())
        };
        self.rows.push(Datum {
            key,
            category,
            values,
        });
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.push(values);
        self
    }

    /// A new dataset keeping only rows matching `pred`.
    pub fn filter(&self, mut pred: impl FnMut(&Datum) -> bool) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            rows: self.rows.iter().filter(|d| pred(d)).cloned().collect(),
        }
    }

    /// The schema shared by every row.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Datum] {
        &self.rows
    }

    /// Iterate rows in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Datum> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a row by identity key.
    pub fn get(&self, key: &str) -> Option<&Datum> {
        self.rows.iter().find(|d| d.key.as_str() == key)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Datum;
    type IntoIter = std::slice::Iter<'a, Datum>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
