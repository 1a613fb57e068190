/// Dispatcher configuration.
///
/// # Example
///
/// ```
/// use datumbridge_values::options::ConvertOptions;
///
/// let options = ConvertOptions::default().with_max_nesting_depth(4);
/// assert_eq!(options.max_nesting_depth, 4);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// How many tuples may enclose a converted tuple. The outermost tuple
    /// sits at depth zero; converting one at this depth or deeper fails
    /// with `NestingTooDeep`.
    pub max_nesting_depth: u16,
}

impl ConvertOptions {
    pub const DEFAULT_MAX_NESTING_DEPTH: u16 = 32;

    pub fn with_max_nesting_depth(mut self, max_nesting_depth: u16) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}
