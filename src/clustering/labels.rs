use std::collections::BTreeMap;

/// Canonical enumeration of the distinct labels of a clustering.
///
/// Levels are sorted by label value, so the same clustering always yields the
/// same level order regardless of the order in which items are listed.
/// `codes[i]` is the position of item `i`'s label among the levels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet<L> {
    levels: Vec<L>,
    codes: Vec<usize>,
}

impl<L> LabelSet<L>
where
    L: Ord + Clone,
{
    pub fn from_labels(labels: &[L]) -> Self {
        let mut positions: BTreeMap<&L, usize> = labels.iter().map(|label| (label, 0)).collect();
        for (position, slot) in positions.values_mut().enumerate() {
            *slot = position;
        }

        let codes = labels.iter().map(|label| positions[label]).collect();
        let levels = positions.into_keys().cloned().collect();

        LabelSet { levels, codes }
    }

    pub fn levels(&self) -> &[L] {
        &self.levels
    }

    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Number of labelled items.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes of the items at `chosen`, in that order, against the same levels.
    pub fn select(&self, chosen: &[usize]) -> Vec<usize> {
        chosen.iter().map(|&item| self.codes[item]).collect()
    }

    pub fn position(&self, label: &L) -> Option<usize> {
        self.levels.binary_search(label).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_sorted() {
        let labels = vec!["T cell", "B cell", "T cell", "NK", "B cell"];
        let set = LabelSet::from_labels(&labels);

        assert_eq!(set.levels(), &["B cell", "NK", "T cell"]);
        assert_eq!(set.codes(), &[2, 0, 2, 1, 0]);
        assert_eq!(set.n_levels(), 3);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_select_keeps_levels() {
        let set = LabelSet::from_labels(&[3usize, 1, 2, 1]);
        assert_eq!(set.select(&[0, 0, 3]), vec![2, 2, 0]);
        assert_eq!(set.n_levels(), 3);
    }

    #[test]
    fn test_position() {
        let set = LabelSet::from_labels(&[10, 20, 30]);
        assert_eq!(set.position(&20), Some(1));
        assert_eq!(set.position(&25), None);
    }

    #[test]
    fn test_empty() {
        let set: LabelSet<u32> = LabelSet::from_labels(&[]);
        assert!(set.is_empty());
        assert_eq!(set.n_levels(), 0);
    }
}
