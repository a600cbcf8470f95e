use serde::{Deserialize, Serialize};

/// A requested change to one field of a record.
///
/// Edits are partial: only fields tagged [`SetTo`](FieldUpdate::SetTo) are
/// written, everything else keeps its stored value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldUpdate<T> {
    Unchanged,
    SetTo(T),
}

impl<T> FieldUpdate<T> {
    /// Borrow the requested value without consuming the update.
    pub fn as_set_ref(&self) -> FieldUpdate<&T> {
        match self {
            Self::Unchanged => FieldUpdate::Unchanged,
            Self::SetTo(value) => FieldUpdate::SetTo(value),
        }
    }

    /// Write the new value into `target` if one was supplied.
    ///
    /// Returns `true` if `target` was overwritten.
    pub fn apply(self, target: &mut T) -> bool {
        match self {
            Self::Unchanged => false,
            Self::SetTo(value) => {
                *target = value;
                true
            }
        }
    }
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unchanged, Self::SetTo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_leaves_target() {
        let mut title = String::from("kept");
        assert!(!FieldUpdate::<String>::Unchanged.apply(&mut title));
        assert_eq!(title, "kept");
    }

    #[test]
    fn set_to_overwrites() {
        let mut tags = vec!["a".to_string()];
        assert!(FieldUpdate::SetTo(Vec::new()).apply(&mut tags));
        assert!(tags.is_empty());
    }

    #[test]
    fn from_option() {
        assert_eq!(FieldUpdate::from(Some(3)), FieldUpdate::SetTo(3));
        assert_eq!(FieldUpdate::<u8>::from(None), FieldUpdate::Unchanged);
    }

    #[test]
    fn as_set_ref_borrows() {
        let update = FieldUpdate::SetTo(String::from("draft"));
        assert_eq!(update.as_set_ref(), FieldUpdate::SetTo(&String::from("draft")));
        assert_eq!(FieldUpdate::<u8>::Unchanged.as_set_ref(), FieldUpdate::Unchanged);
        assert_eq!(update, FieldUpdate::SetTo(String::from("draft")));
    }
}
