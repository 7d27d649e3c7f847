/// Three-state edit for an optional quest field.
///
/// ```
/// use shadow_domain::FieldUpdate;
///
/// let mut description = Some("old".to_string());
/// FieldUpdate::Set("new".to_string()).apply_to(&mut description);
/// assert_eq!(description.as_deref(), Some("new"));
///
/// FieldUpdate::<String>::Clear.apply_to(&mut description);
/// assert_eq!(description, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Keep the existing value
    NoChange,
    Set(T),
    /// Reset the field to `None`
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::NoChange
    }
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl FieldUpdate<String> {
    /// Builds an update from free text input. Blank text clears the field,
    /// since an empty description is never rendered.
    pub fn from_text(text: Option<String>, clear: bool) -> Self {
        if clear {
            return FieldUpdate::Clear;
        }
        match text {
            Some(value) if value.trim().is_empty() => FieldUpdate::Clear,
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        assert_eq!(
            FieldUpdate::from_text(Some("notes".to_string()), false),
            FieldUpdate::Set("notes".to_string())
        );
        assert_eq!(
            FieldUpdate::from_text(Some("   ".to_string()), false),
            FieldUpdate::Clear
        );
        assert_eq!(FieldUpdate::from_text(None, false), FieldUpdate::NoChange);
        assert_eq!(
            FieldUpdate::from_text(Some("ignored".to_string()), true),
            FieldUpdate::Clear
        );
    }

    #[test]
    fn test_no_change_keeps_value() {
        let mut field = Some(3);
        FieldUpdate::NoChange.apply_to(&mut field);
        assert_eq!(field, Some(3));
        assert!(!FieldUpdate::<i32>::NoChange.is_change());
    }
}
