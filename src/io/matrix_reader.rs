use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::Path,
};

use crate::matrix::{CostMatrix, NO_EDGE, NumCities};

pub type Result<T> = std::io::Result<T>;

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line when parsing {}.", $name)
        );

        match next.unwrap_or_default().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                return Err(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Invalid value found. Cannot parse {}.", $name),
                ));
            }
        }
    }};
}

pub trait MatrixReader: Sized {
    fn try_read_matrix<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl MatrixReader for CostMatrix {
    fn try_read_matrix<R: BufRead>(reader: R) -> Result<Self> {
        let mut values = ValueReader::try_new(reader)?;
        let n = values.number_of_cities();
        let expected = (n as usize).checked_mul(n as usize);
        raise_error_unless!(
            expected.is_some(),
            ErrorKind::InvalidData,
            format!("Invalid header found; {n} cities are too many")
        );
        let expected = expected.unwrap_or_default();

        // grows with the values actually present instead of trusting the header
        let mut cells = Vec::new();
        while cells.len() < expected {
            let value = values.try_next_value()?;
            raise_error_unless!(
                value.is_some(),
                ErrorKind::InvalidData,
                format!(
                    "Premature end of file; expected {expected} values, read {}",
                    cells.len()
                )
            );
            cells.push(value.unwrap_or(NO_EDGE));
        }

        raise_error_unless!(
            values.try_next_value()?.is_none(),
            ErrorKind::InvalidData,
            "Trailing values after the last row"
        );

        Ok(CostMatrix::from_cells(n, cells))
    }

    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_matrix(buf_reader)
    }
}

/// Tokenizes an instance: a header line holding the number of cities followed by the
/// whitespace-separated cells in row-major order. Lines starting with `c` are comments. A raw `0`
/// is returned as [`NO_EDGE`].
pub struct ValueReader<R> {
    lines: Lines<R>,
    pending: Vec<String>,
    number_of_cities: NumCities,
}

impl<R: BufRead> ValueReader<R> {
    pub fn try_new(reader: R) -> Result<Self> {
        let mut value_reader = Self {
            lines: reader.lines(),
            pending: Vec::new(),
            number_of_cities: 0,
        };

        value_reader.number_of_cities = value_reader.parse_header()?;
        Ok(value_reader)
    }

    pub fn number_of_cities(&self) -> NumCities {
        self.number_of_cities
    }

    /// Returns the next cell, or `None` at the end of the input
    pub fn try_next_value(&mut self) -> Result<Option<f64>> {
        while self.pending.is_empty() {
            let Some(line) = self.next_non_comment_line()? else {
                return Ok(None);
            };
            // reversed so that `pop` yields the tokens in order
            self.pending = line.split_whitespace().rev().map(String::from).collect();
        }

        let mut tokens = self.pending.pop().into_iter();
        let value: f64 = parse_next_value!(tokens, "cost");
        raise_error_unless!(
            value >= 0.0,
            ErrorKind::InvalidData,
            format!("Invalid cost {value}; costs have to be non-negative")
        );

        Ok(Some(if value == 0.0 { NO_EDGE } else { value }))
    }

    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x),
                Some(Ok(line)) if line.starts_with('c') || line.trim().is_empty() => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    fn parse_header(&mut self) -> Result<NumCities> {
        let line = self.next_non_comment_line()?;
        raise_error_unless!(line.is_some(), ErrorKind::InvalidData, "No header found");
        let line = line.unwrap_or_default();

        let mut parts = line.split_whitespace();
        let number_of_cities: NumCities = parse_next_value!(parts, "Header>Number of cities");

        raise_error_unless!(
            parts.next().is_none(),
            ErrorKind::InvalidData,
            "Invalid header found; expected end of line"
        );
        raise_error_unless!(
            number_of_cities > 0,
            ErrorKind::InvalidData,
            "Invalid header found; need at least one city"
        );

        Ok(number_of_cities)
    }
}
