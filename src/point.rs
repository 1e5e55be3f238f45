use std::fmt;

/// A numeric field and the number of decimals it is written with.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub value: f64,
    pub precision: usize,
}

impl Field {
    pub fn new(key: &'static str, value: f64, precision: usize) -> Self {
        Self {
            key,
            value,
            precision,
        }
    }
}

/// One measurement sample.
///
/// Tags and fields keep insertion order so that the serialized line is
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: &'static str,
    pub tags: Vec<(&'static str, String)>,
    pub fields: Vec<Field>,
    pub timestamp: i64,
}

impl Point {
    pub fn new(measurement: &'static str, timestamp: i64) -> Self {
        Self {
            measurement,
            tags: vec![],
            fields: vec![],
            timestamp,
        }
    }

    pub fn tag(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.tags.push((key, value.into()));
        self
    }

    pub fn field(mut self, key: &'static str, value: f64, precision: usize) -> Self {
        self.fields.push(Field::new(key, value, precision));
        self
    }

    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn field_value(&self, key: &str) -> Option<f64> {
        self.fields.iter().find(|f| f.key == key).map(|f| f.value)
    }

    /// Serialize into a single line of line protocol.
    pub fn to_line_protocol(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.measurement)?;

        for (key, value) in &self.tags {
            write!(f, ",{}={}", key, escape_tag_value(value))?;
        }

        for (i, field) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ' ' } else { ',' };
            write!(f, "{}{}={:.*}", sep, field.key, field.precision, field.value)?;
        }

        write!(f, " {}", self.timestamp)
    }
}

fn escape_tag_value(value: &str) -> String {
    value
        .replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}
