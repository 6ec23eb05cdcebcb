use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;

use crate::matrix::{CostMatrix, is_edge};

/// Writes a matrix in the format understood by [`super::MatrixReader`]; missing edges are
/// written as `0`.
pub trait MatrixWriter {
    fn try_write_matrix<W: Write>(&self, writer: W) -> Result<(), std::io::Error>;
    fn try_write_matrix_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error>;
}

impl MatrixWriter for CostMatrix {
    fn try_write_matrix<W: Write>(&self, mut writer: W) -> Result<(), std::io::Error> {
        writeln!(writer, "{}", self.number_of_cities())?;

        for row in self.rows() {
            let line = row
                .iter()
                .map(|&cost| if is_edge(cost) { cost } else { 0.0 })
                .join(" ");
            writeln!(writer, "{line}")?;
        }

        Ok(())
    }

    fn try_write_matrix_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.try_write_matrix(&mut writer)?;
        writer.flush()
    }
}
