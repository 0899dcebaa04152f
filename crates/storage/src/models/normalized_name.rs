/// Comparison form of an exercise name.
///
/// Lower-cased with every non-alphanumeric character removed, so spelling
/// differences in punctuation, hyphenation, case or spacing collapse to the
/// same key. Matching is exact on this key; there is no edit-distance scoring.
///
/// # Examples
///
/// ```
/// use storage::models::NormalizedExerciseName;
///
/// let a = NormalizedExerciseName::new("Push-ups");
/// let b = NormalizedExerciseName::new("push ups");
///
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedExerciseName(String);

impl NormalizedExerciseName {
    pub fn new(raw: &str) -> Self {
        Self(
            raw.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
