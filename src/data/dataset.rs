use crate::data::example_set::Example;
use crate::error::{Result, TreeError};
use csv::ReaderBuilder;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::path::Path;

/// String used for missing values when rendering and parsing.
pub const MISSING_VALUE: &str = "?";

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeKind {
    /// Categorical attribute; cells hold the index into `values`.
    Nominal { values: Vec<String> },
    Numerical,
}

/// A typed column of a [`Dataset`].
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
}

impl Attribute {
    pub fn nominal(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal { values },
        }
    }

    pub fn numerical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numerical,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self.kind, AttributeKind::Nominal { .. })
    }

    pub fn is_numerical(&self) -> bool {
        matches!(self.kind, AttributeKind::Numerical)
    }

    /// Value mapping of a nominal attribute, empty for numerical ones.
    pub fn values(&self) -> &[String] {
        match &self.kind {
            AttributeKind::Nominal { values } => values,
            AttributeKind::Numerical => &[],
        }
    }

    /// Renders a stored cell value the way it was read in.
    pub fn format_value(&self, value: f64) -> String {
        if value.is_nan() {
            return MISSING_VALUE.to_string();
        }
        match &self.kind {
            AttributeKind::Nominal { values } => values
                .get(value as usize)
                .cloned()
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            AttributeKind::Numerical => format!("{}", value),
        }
    }
}

/// Owned labelled table: regular attributes in `x` (one column each) and the
/// nominal label in `y`. Missing values are stored as `NaN`.
#[derive(Clone)]
pub struct Dataset {
    attributes: Vec<Attribute>,
    label: Attribute,
    x: DMatrix<f64>,
    y: DVector<f64>,
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    attributes: [")?;
        for attribute in &self.attributes {
            write!(f, "{}, ", attribute.name())?;
        }
        write!(f, "],\n    label: {},\n    rows: [\n", self.label.name())?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for (j, attribute) in self.attributes.iter().enumerate() {
                write!(f, "{}, ", attribute.format_value(self.x[(i, j)]))?;
            }
            writeln!(f, "] -> {},", self.label.format_value(self.y[i]))?;
        }

        write!(f, "    ]\n}}")
    }
}

impl Dataset {
    pub fn new(
        attributes: Vec<Attribute>,
        x: DMatrix<f64>,
        label: Attribute,
        y: DVector<f64>,
    ) -> Result<Self> {
        if x.ncols() != attributes.len() {
            return Err(TreeError::dataset(format!(
                "{} attributes declared but the value matrix has {} columns",
                attributes.len(),
                x.ncols()
            )));
        }
        if x.nrows() != y.len() {
            return Err(TreeError::dataset(format!(
                "value matrix has {} rows but the label has {}",
                x.nrows(),
                y.len()
            )));
        }
        if !label.is_nominal() {
            return Err(TreeError::dataset(format!(
                "label attribute '{}' must be nominal",
                label.name()
            )));
        }
        for (column, attribute) in attributes.iter().enumerate() {
            if attribute.is_nominal() {
                check_nominal_codes(attribute, x.column(column).iter())?;
            }
        }
        check_nominal_codes(&label, y.iter())?;

        Ok(Self {
            attributes,
            label,
            x,
            y,
        })
    }

    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Builds a dataset from string records. A column is numerical when every
    /// non-missing cell parses as a number; the label column is always nominal.
    pub fn from_records(header: &[String], records: &[Vec<String>], label: &str) -> Result<Self> {
        let label_index = header
            .iter()
            .position(|name| name == label)
            .ok_or_else(|| TreeError::dataset(format!("label column '{}' not found", label)))?;

        for (row, record) in records.iter().enumerate() {
            if record.len() != header.len() {
                return Err(TreeError::dataset(format!(
                    "record {} has {} fields, expected {}",
                    row,
                    record.len(),
                    header.len()
                )));
            }
        }

        let mut builder = DatasetBuilder::default();
        for (column, name) in header.iter().enumerate() {
            let cells: Vec<&str> = records.iter().map(|r| r[column].trim()).collect();
            if column == label_index {
                builder = builder.label(name, &cells);
                continue;
            }

            let parsed: Option<Vec<f64>> = cells
                .iter()
                .map(|cell| {
                    if is_missing(cell) {
                        Some(f64::NAN)
                    } else {
                        cell.parse::<f64>().ok()
                    }
                })
                .collect();
            builder = match parsed {
                Some(values) => builder.numerical(name, &values),
                None => builder.nominal(name, &cells),
            };
        }
        builder.build()
    }

    pub fn from_csv_path(path: impl AsRef<Path>, label: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
        let header = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(String::from).collect::<Vec<_>>());
        }
        log::debug!("read {} records with {} columns", records.len(), header.len());

        Self::from_records(&header, &records, label)
    }

    pub fn nrows(&self) -> usize {
        self.y.len()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    pub fn label(&self) -> &Attribute {
        &self.label
    }

    pub fn value(&self, row: usize, attribute: usize) -> f64 {
        self.x[(row, attribute)]
    }

    pub fn label_value(&self, row: usize) -> f64 {
        self.y[row]
    }

    pub fn example(&self, row: usize) -> Example<'_> {
        Example::new(self, row)
    }

    pub fn missing_label_count(&self) -> usize {
        self.y.iter().filter(|v| v.is_nan()).count()
    }
}

/// Nominal cells must be `NaN` or an integral index into the value mapping.
fn check_nominal_codes<'a>(
    attribute: &Attribute,
    mut codes: impl Iterator<Item = &'a f64>,
) -> Result<()> {
    let number_of_values = attribute.values().len() as f64;
    match codes.find(|&&code| {
        !code.is_nan() && (code < 0.0 || code >= number_of_values || code.fract() != 0.0)
    }) {
        Some(code) => Err(TreeError::dataset(format!(
            "nominal attribute '{}' holds {}, which is not an index into its {} values",
            attribute.name(),
            code,
            attribute.values().len()
        ))),
        None => Ok(()),
    }
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell == MISSING_VALUE
}

/// Maps string cells onto a nominal attribute, values indexed by first appearance.
fn encode_nominal(name: &str, cells: &[&str]) -> (Attribute, Vec<f64>) {
    let mut mapping: HashMap<&str, usize> = HashMap::new();
    let mut values = Vec::new();
    let encoded = cells
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                return f64::NAN;
            }
            let index = *mapping.entry(*cell).or_insert_with(|| {
                values.push(cell.to_string());
                values.len() - 1
            });
            index as f64
        })
        .collect();
    (Attribute::nominal(name, values), encoded)
}

/// Column-wise construction of a [`Dataset`].
#[derive(Default)]
pub struct DatasetBuilder {
    columns: Vec<(Attribute, Vec<f64>)>,
    label: Option<(Attribute, Vec<f64>)>,
}

impl DatasetBuilder {
    /// Adds a nominal column; `""` and `"?"` are missing.
    pub fn nominal(mut self, name: &str, cells: &[&str]) -> Self {
        self.columns.push(encode_nominal(name, cells));
        self
    }

    /// Adds a numerical column; `NaN` is missing.
    pub fn numerical(mut self, name: &str, values: &[f64]) -> Self {
        self.columns.push((Attribute::numerical(name), values.to_vec()));
        self
    }

    pub fn label(mut self, name: &str, cells: &[&str]) -> Self {
        self.label = Some(encode_nominal(name, cells));
        self
    }

    pub fn build(self) -> Result<Dataset> {
        let (label, y) = self
            .label
            .ok_or_else(|| TreeError::dataset("no label column given"))?;
        let nrows = y.len();

        if let Some((attribute, _)) = self.columns.iter().find(|(_, v)| v.len() != nrows) {
            return Err(TreeError::dataset(format!(
                "column '{}' has a different length than the label ({} rows)",
                attribute.name(),
                nrows
            )));
        }

        let x = DMatrix::from_fn(nrows, self.columns.len(), |r, c| self.columns[c].1[r]);
        let attributes = self.columns.into_iter().map(|(a, _)| a).collect();
        Dataset::new(attributes, x, label, DVector::from_vec(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather() -> Dataset {
        Dataset::builder()
            .nominal("outlook", &["sunny", "rain", "sunny", "?"])
            .numerical("temperature", &[30.0, 18.5, f64::NAN, 21.0])
            .label("play", &["no", "yes", "no", "yes"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_encodes_nominal_values() {
        let dataset = weather();
        assert_eq!(dataset.nrows(), 4);
        assert_eq!(dataset.attributes().len(), 2);
        assert_eq!(dataset.attribute(0).values(), &["sunny", "rain"]);
        assert_eq!(dataset.value(1, 0), 1.0);
        assert!(dataset.value(3, 0).is_nan());
        assert!(dataset.value(2, 1).is_nan());
        assert_eq!(dataset.label().values(), &["no", "yes"]);
    }

    #[test]
    fn test_builder_rejects_length_mismatch() {
        let result = Dataset::builder()
            .numerical("a", &[1.0, 2.0])
            .label("l", &["x", "y", "z"])
            .build();
        assert!(matches!(result, Err(TreeError::Dataset { .. })));
    }

    #[test]
    fn test_builder_requires_label() {
        let result = Dataset::builder().numerical("a", &[1.0]).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_invalid_nominal_codes() {
        let values = vec!["p".to_string()];
        let label = Attribute::nominal("l", vec!["x".to_string(), "y".to_string()]);
        let labels = DVector::from_vec(vec![0.0, 1.0]);

        for bad in [5.0, -1.0, 0.5] {
            let result = Dataset::new(
                vec![Attribute::nominal("a", values.clone())],
                DMatrix::from_vec(2, 1, vec![0.0, bad]),
                label.clone(),
                labels.clone(),
            );
            assert!(matches!(result, Err(TreeError::Dataset { .. })), "{}", bad);
        }

        let bad_label = Dataset::new(
            vec![Attribute::numerical("n")],
            DMatrix::from_vec(2, 1, vec![5.0, 7.0]),
            label.clone(),
            DVector::from_vec(vec![0.0, 2.0]),
        );
        assert!(matches!(bad_label, Err(TreeError::Dataset { .. })));

        let valid = Dataset::new(
            vec![Attribute::nominal("a", values)],
            DMatrix::from_vec(2, 1, vec![0.0, f64::NAN]),
            label,
            labels,
        );
        assert!(valid.is_ok());
    }

    #[test]
    fn test_format_value() {
        let dataset = weather();
        assert_eq!(dataset.attribute(0).format_value(0.0), "sunny");
        assert_eq!(dataset.attribute(0).format_value(f64::NAN), "?");
        assert_eq!(dataset.attribute(1).format_value(18.5), "18.5");
        assert_eq!(dataset.attribute(1).format_value(30.0), "30");
    }

    #[test]
    fn test_from_records_infers_types() {
        let header = vec!["size".to_string(), "color".to_string(), "class".to_string()];
        let records = vec![
            vec!["1.5".to_string(), "red".to_string(), "a".to_string()],
            vec!["?".to_string(), "blue".to_string(), "b".to_string()],
            vec!["3".to_string(), "".to_string(), "a".to_string()],
        ];
        let dataset = Dataset::from_records(&header, &records, "class").unwrap();

        assert!(dataset.attribute(0).is_numerical());
        assert!(dataset.attribute(1).is_nominal());
        assert_eq!(dataset.label().name(), "class");
        assert!(dataset.value(1, 0).is_nan());
        assert!(dataset.value(2, 1).is_nan());
        assert_eq!(dataset.missing_label_count(), 0);
    }

    #[test]
    fn test_from_records_unknown_label() {
        let header = vec!["a".to_string()];
        let records = vec![vec!["1".to_string()]];
        assert!(Dataset::from_records(&header, &records, "missing").is_err());
    }

    #[test]
    fn test_missing_label_count() {
        let dataset = Dataset::builder()
            .numerical("a", &[1.0, 2.0, 3.0])
            .label("l", &["x", "?", ""])
            .build()
            .unwrap();
        assert_eq!(dataset.missing_label_count(), 2);
    }

    #[test]
    fn test_dataset_formatting() {
        let dataset = Dataset::builder()
            .nominal("a", &["p", "q"])
            .label("l", &["x", "y"])
            .build()
            .unwrap();

        let expected_str = "\
Dataset {
    attributes: [a, ],
    label: l,
    rows: [
        [p, ] -> x,
        [q, ] -> y,
    ]
}";
        assert_eq!(format!("{:?}", dataset), expected_str);
    }
}
