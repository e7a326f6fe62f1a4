// src/data/dataset.rs
use log::{debug, info};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::feature_group::FeatureGroup;
use super::record::{DocLabel, Feature, Record};
use crate::error::{ClassifyError, ClassifyResult};

/// Columns per row: class code followed by the four features in `Feature::ALL` order.
const COLUMN_COUNT: usize = 5;
const DELIMITER: char = ',';

/// Training classes, in binary target order (index 0 -> target 0).
pub const TRAINING_LABELS: [DocLabel; 2] = [DocLabel::Uws, DocLabel::Mcs];

/// Immutable, ordered table of patient records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Loads a headerless, comma-delimited table from disk.
    pub fn load(path: impl AsRef<Path>) -> ClassifyResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            ClassifyError::Io { source, .. } => ClassifyError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(
            "Loaded {} records from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parses records from any buffered reader. Rows are numbered from 1 and
    /// blank lines are skipped; any other malformed row aborts the load.
    pub fn from_reader<R: BufRead>(reader: R) -> ClassifyResult<Self> {
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let row = idx + 1;
            let line = line.map_err(|source| ClassifyError::Io {
                path: Default::default(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_row(row, &line)?);
        }
        debug!("Parsed {} records", records.len());
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Splits the table once into the training partition (records whose
    /// label is in `training_labels`) and the evaluation partition (all
    /// other records).
    pub fn split(&self, training_labels: [DocLabel; 2]) -> Split<'_> {
        let (training, evaluation): (Vec<usize>, Vec<usize>) = (0..self.records.len())
            .partition(|&i| training_labels.contains(&self.records[i].label()));
        Split {
            training_labels,
            training: Partition {
                dataset: self,
                indices: training,
            },
            evaluation: Partition {
                dataset: self,
                indices: evaluation,
            },
        }
    }
}

fn parse_row(row: usize, line: &str) -> ClassifyResult<Record> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if fields.len() != COLUMN_COUNT {
        return Err(ClassifyError::MalformedRecord {
            row,
            reason: format!("expected {} columns, found {}", COLUMN_COUNT, fields.len()),
        });
    }

    let code = fields[0]
        .parse::<u8>()
        .map_err(|_| ClassifyError::MalformedRecord {
            row,
            reason: format!("class code '{}' is not a valid code", fields[0]),
        })?;

    let mut values = [0.0; 4];
    for (feature, raw) in Feature::ALL.iter().zip(&fields[1..]) {
        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ClassifyError::MalformedRecord {
                row,
                reason: format!("{} value '{}' is not a finite number", feature, raw),
            })?;
        values[feature.index()] = value;
    }

    Record::new(row, code, values)
}

/// Non-owning view of the dataset, in dataset order.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> Partition<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dataset positions of the records in this partition.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.indices.iter().map(move |&i| &self.dataset.records[i])
    }

    pub fn get(&self, position: usize) -> Option<&'a Record> {
        self.indices
            .get(position)
            .map(|&i| &self.dataset.records[i])
    }

    pub fn column(&self, feature: Feature) -> Vec<f64> {
        self.records().map(|r| r.value(feature)).collect()
    }

    /// Rows x 2 matrix of the group's raw feature values.
    pub fn project(&self, group: &FeatureGroup) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.len(), 2));
        for (mut row, record) in matrix.outer_iter_mut().zip(self.records()) {
            row[0] = record.value(group.x());
            row[1] = record.value(group.y());
        }
        matrix
    }

    pub fn labels(&self) -> Vec<DocLabel> {
        self.records().map(Record::label).collect()
    }
}

/// Training/evaluation partitions computed once per dataset.
#[derive(Debug, Clone)]
pub struct Split<'a> {
    pub training_labels: [DocLabel; 2],
    pub training: Partition<'a>,
    pub evaluation: Partition<'a>,
}

impl<'a> Split<'a> {
    /// Binary targets for the training partition: 0 for the first training
    /// label, 1 for the second.
    pub fn binary_targets(&self) -> Vec<usize> {
        self.training
            .records()
            .map(|r| usize::from(r.label() == self.training_labels[1]))
            .collect()
    }

    pub fn positive_label(&self) -> DocLabel {
        self.training_labels[1]
    }

    pub fn negative_label(&self) -> DocLabel {
        self.training_labels[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feature_group::RIGHT_HEMISPHERE;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::io::Write;

    const SAMPLE: &str = "0,1.0,2.0,3.0,4.0\n\
                          1,1.5,2.5,3.5,4.5\n\
                          2,9.0,8.0,7.0,6.0\n\
                          0,1.1,2.1,3.1,4.1\n\
                          \n\
                          1,1.6,2.6,3.6,4.6\n";

    fn sample() -> Dataset {
        Dataset::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    fn malformed_row(input: &str) -> usize {
        match Dataset::from_reader(input.as_bytes()).unwrap_err() {
            ClassifyError::MalformedRecord { row, .. } => row,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_sample() {
        let dataset = sample();
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.records()[2].label(), DocLabel::Ma);
        assert_eq!(dataset.records()[4].value(Feature::RhTemp), 4.6);
    }

    #[test]
    fn test_malformed_rows_are_identified() {
        assert_eq!(malformed_row("0,1,2,3,4\n0,1,2,3\n"), 2);
        assert_eq!(malformed_row("0,1,2,3,4\n0,1,2,3,4\n1,1,x,3,4\n"), 3);
        assert_eq!(malformed_row("3,1,2,3,4\n"), 1);
        assert_eq!(malformed_row("-1,1,2,3,4\n"), 1);
        assert_eq!(malformed_row("0,1,2,3,4,5\n"), 1);
        assert_eq!(malformed_row("0,1,NaN,3,4\n"), 1);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let dataset = sample();
        let split = dataset.split(TRAINING_LABELS);
        let training: HashSet<usize> = split.training.indices().iter().copied().collect();
        let evaluation: HashSet<usize> = split.evaluation.indices().iter().copied().collect();

        assert!(training.is_disjoint(&evaluation));
        assert_eq!(training.len() + evaluation.len(), dataset.len());
        assert_eq!(split.evaluation.labels(), vec![DocLabel::Ma]);
        assert_eq!(split.binary_targets(), vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_projection_uses_group_columns() {
        let dataset = sample();
        let split = dataset.split(TRAINING_LABELS);
        let projected = split.training.project(&RIGHT_HEMISPHERE);
        assert_eq!(projected.dim(), (4, 2));
        assert_eq!(projected[[1, 0]], 3.5);
        assert_eq!(projected[[1, 1]], 4.5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Dataset::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, ClassifyError::Io { .. }));
    }

    proptest! {
        #[test]
        fn prop_split_partitions_every_dataset(
            codes in prop::collection::vec(0u8..3, 0..60)
        ) {
            let records: Vec<Record> = codes
                .iter()
                .enumerate()
                .map(|(i, &code)| Record::new(i + 1, code, [i as f64; 4]).unwrap())
                .collect();
            let dataset = Dataset::from_records(records);
            let split = dataset.split(TRAINING_LABELS);

            let training: HashSet<usize> = split.training.indices().iter().copied().collect();
            let evaluation: HashSet<usize> = split.evaluation.indices().iter().copied().collect();
            prop_assert!(training.is_disjoint(&evaluation));
            prop_assert_eq!(training.len() + evaluation.len(), dataset.len());

            for record in split.training.records() {
                prop_assert!(TRAINING_LABELS.contains(&record.label()));
            }
            for record in split.evaluation.records() {
                prop_assert!(!TRAINING_LABELS.contains(&record.label()));
            }
            prop_assert_eq!(split.binary_targets().len(), split.training.len());
            prop_assert!(split.training.indices().windows(2).all(|w| w[0] < w[1]));
            prop_assert!(split.evaluation.indices().windows(2).all(|w| w[0] < w[1]));
        }
    }
}
