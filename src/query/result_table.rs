use std::collections::{BTreeSet, HashMap};

pub type Row = Vec<String>;

/// Rows of synonym values, joined on shared columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Row>,
    initialized: bool,
}

impl ResultTable {
    pub fn from_values<I>(synonym: &str, values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            columns: vec![synonym.to_string()],
            rows: values.into_iter().map(|value| vec![value]).collect(),
            initialized: true,
        }
    }

    pub fn from_pairs<I>(first: &str, second: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            columns: vec![first.to_string(), second.to_string()],
            rows: pairs.into_iter().map(|(a, b)| vec![a, b]).collect(),
            initialized: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, synonym: &str) -> bool {
        self.column(synonym).is_some()
    }

    fn column(&self, synonym: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == synonym)
    }

    /// Natural join with `other`; a cross product when no column is shared.
    /// Returns false once the table is empty, after which no join can refill it.
    pub fn merge(&mut self, other: ResultTable) -> bool {
        if !self.initialized {
            *self = other;
            return !self.is_empty();
        }

        let mut ours = Vec::new();
        let mut theirs = Vec::new();
        let mut extra = Vec::new();
        for (idx, column) in other.columns.iter().enumerate() {
            match self.column(column) {
                Some(own) => {
                    ours.push(own);
                    theirs.push(idx);
                }
                None => extra.push(idx),
            }
        }

        let mut buckets: HashMap<Row, Vec<&Row>> = HashMap::new();
        for row in &other.rows {
            buckets.entry(project(row, &theirs)).or_default().push(row);
        }
        let mut joined = Vec::new();
        for row in &self.rows {
            let Some(matches) = buckets.get(&project(row, &ours)) else {
                continue;
            };
            for matched in matches {
                let mut combined = row.clone();
                combined.extend(extra.iter().map(|&idx| matched[idx].clone()));
                joined.push(combined);
            }
        }

        self.columns.extend(extra.iter().map(|&idx| other.columns[idx].clone()));
        self.rows = joined;
        !self.is_empty()
    }

    /// Distinct value tuples of `synonyms`, in the given column order.
    pub fn tuples(&self, synonyms: &[&str]) -> Option<BTreeSet<Row>> {
        let indices = synonyms.iter().map(|s| self.column(s)).collect::<Option<Vec<usize>>>()?;
        Some(self.rows.iter().map(|row| project(row, &indices)).collect())
    }
}

fn project(row: &Row, indices: &[usize]) -> Row {
    indices.iter().map(|&idx| row[idx].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn joins_on_shared_column() {
        let mut table = ResultTable::from_pairs("a", "b", vec![("1".into(), "2".into()), ("3".into(), "4".into())]);
        assert!(table.merge(ResultTable::from_pairs("b", "c", vec![("2".into(), "x".into())])));
        let rows = table.tuples(&["a", "c"]).unwrap();
        assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![strings(&["1", "x"])]);
    }

    #[test]
    fn cross_product_without_shared_column() {
        let mut table = ResultTable::from_values("a", strings(&["1", "2"]));
        table.merge(ResultTable::from_values("b", strings(&["x", "y"])));
        assert_eq!(table.len(), 4);
        assert!(!table.merge(ResultTable::from_values("a", Vec::new())));
        assert!(table.tuples(&["missing"]).is_none());
    }
}
