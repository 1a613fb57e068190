pub trait ArrayView<E> {
    fn len(&self) -> usize;

    /// Bounds-checked read.
    fn get(&self, index: usize) -> Option<E>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> impl Iterator<Item = E> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}
