//! IO of the text based `.cmp` comparison tables.
//!
//! The first non blank line is the header, naming each column. Every following non blank line
//! is a row with one cell per column. Cells are separated by `|`; a leading and a trailing `|`
//! are optional and white space around a cell is ignored.
//!
//! ```text
//! |   a   |   b   |  out  |
//! |   0   |   0   |   0   |
//! |   0   |   1   |   1   |
//! ```
//!
//! A cell holding a word is either written in binary, one `0` or `1` per bit, or as a signed
//! decimal number.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use nand_kernel::{codec, Word, WORD_WIDTH};

use crate::{Bit16, Error};

fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Reader for a `.cmp` comparison table.
pub struct Reader<R> {
    inner: R,
    line_buffer: String,
    line: usize,
    columns: Vec<String>,
}

impl<R: BufRead> Reader<R> {
    /// Create a new reader. The header is read straight away.
    ///
    /// # Examples
    /// ```
    /// use nand_interface::cmp_io::Reader;
    /// let cmp = b"| a | b | out |\n| 0 | 1 | 1 |";
    /// let reader = Reader::new(&cmp[..]).unwrap();
    /// assert_eq!(reader.columns(), ["a", "b", "out"]);
    /// assert!(Reader::new(&b"\n\n"[..]).is_err());
    /// ```
    pub fn new(buf: R) -> Result<Self, Error> {
        let mut reader = Self {
            inner: buf,
            line_buffer: String::with_capacity(64),
            line: 0,
            columns: Vec::new(),
        };
        reader.columns = reader.next_cells()?.ok_or(Error::MissingHeader)?;
        Ok(reader)
    }

    /// Column names from the header, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cells of the next non blank line. `None` at End of File.
    fn next_cells(&mut self) -> Result<Option<Vec<String>>, Error> {
        loop {
            self.line_buffer.clear();
            if self.inner.read_line(&mut self.line_buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            if !self.line_buffer.trim().is_empty() {
                return Ok(Some(split_cells(&self.line_buffer)));
            }
        }
    }

    /// Reads the next row.
    ///
    /// If End of File has been reached, returns `None`
    ///
    /// # Examples
    /// ```
    /// use nand_interface::cmp_io::Reader;
    /// let cmp = b"| a | out |\n| 0 | 1 |\n\n| 1 | 0 |\n| 1 |";
    /// let mut reader = Reader::new(&cmp[..]).unwrap();
    /// assert_eq!(reader.read_row().unwrap().unwrap().bit("out").unwrap(), true);
    /// let row = reader.read_row().unwrap().unwrap();
    /// assert_eq!((row.line(), row.get("a")), (4, Some("1")));
    /// assert!(reader.read_row().is_err());
    /// ```
    pub fn read_row(&mut self) -> Result<Option<Row>, Error> {
        let cells = match self.next_cells()? {
            None => return Ok(None),
            Some(cells) => cells,
        };
        if cells.len() != self.columns.len() {
            Err(Error::Columns {
                line: self.line,
                expected: self.columns.len(),
                actual: cells.len(),
            })?
        }
        Ok(Some(Row {
            line: self.line,
            cells: self.columns.iter().cloned().zip(cells).collect(),
        }))
    }

    /// Returns iterator over the rows of the table.
    ///
    /// # Examples
    /// ```
    /// use nand_interface::cmp_io::Reader;
    /// let cmp = b"|in|\n|0|\n|1|";
    /// let mut reader = Reader::new(&cmp[..]).unwrap();
    /// let bits: Result<Vec<bool>, _> = reader.rows().map(|r| r?.bit("in")).collect();
    /// assert_eq!(bits.unwrap(), [false, true]);
    /// ```
    pub fn rows(&mut self) -> Rows<R> {
        Rows { inner: self }
    }
}

/// Iterates over the rows of a table.
///
/// Create by calling [Reader::rows]
pub struct Rows<'a, R> {
    inner: &'a mut Reader<R>,
}

impl<'a, R: BufRead> std::iter::Iterator for Rows<'a, R> {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.read_row().transpose()
    }
}

/// One row of a table, cells keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    line: usize,
    cells: BTreeMap<String, String>,
}

impl Row {
    /// Line number in the table, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    fn cell(&self, column: &str) -> Result<&str, Error> {
        self.get(column).ok_or_else(|| Error::Column {
            line: self.line,
            column: column.to_string(),
        })
    }

    fn bad_cell(&self, column: &str, cell: &str) -> Error {
        Error::Cell {
            line: self.line,
            column: column.to_string(),
            cell: cell.to_string(),
        }
    }

    /// A single `0` or `1`.
    pub fn bit(&self, column: &str) -> Result<bool, Error> {
        match self.cell(column)? {
            "0" => Ok(false),
            "1" => Ok(true),
            cell => Err(self.bad_cell(column, cell)),
        }
    }

    /// A signed decimal number.
    pub fn int(&self, column: &str) -> Result<i64, Error> {
        let cell = self.cell(column)?;
        cell.parse().map_err(|_| self.bad_cell(column, cell))
    }

    /// A word of `width` bits. A cell of exactly `width` binary digits is read as the bits
    /// themselves, anything else as a decimal number in two's complement.
    ///
    /// # Examples
    /// ```
    /// use nand_interface::cmp_io::Reader;
    /// let cmp = b"|x|y|\n|0110|-3|";
    /// let row = Reader::new(&cmp[..]).unwrap().read_row().unwrap().unwrap();
    /// assert_eq!(row.word("x", 4).unwrap(), [false, true, true, false]);
    /// assert_eq!(row.word("y", 4).unwrap(), [true, true, false, true]);
    /// assert!(row.word("y", 2).is_err());
    /// ```
    pub fn word(&self, column: &str, width: usize) -> Result<Word, Error> {
        let cell = self.cell(column)?;
        if cell.len() == width {
            if let Ok(word) = codec::string_to_word(cell) {
                return Ok(word);
            }
        }
        let value = self.int(column)?;
        codec::to_twos_complement(value, width).map_err(|_| self.bad_cell(column, cell))
    }

    /// A 16 bit word.
    pub fn bit16(&self, column: &str) -> Result<Bit16, Error> {
        Bit16::try_from(self.word(column, WORD_WIDTH)?.as_slice())
    }
}

/// Writes rows of a comparison table into any Write type.
///
/// Useful for writing into a vector for debugging or into a file for storage.
pub struct Writer<W> {
    inner: W,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write a single row. Use it for the header too.
    ///
    /// # Examples
    /// ```
    /// let mut w = nand_interface::cmp_io::Writer::new(Vec::new());
    /// w.write_row(["a", "out"]).unwrap();
    /// w.write_row([0, 1]).unwrap();
    /// assert_eq!(w.as_ref(), &b"| a | out |\n| 0 | 1 |\n".to_vec());
    /// ```
    pub fn write_row<I>(&mut self, cells: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: std::fmt::Display,
    {
        write!(self.inner, "|")?;
        for cell in cells {
            write!(self.inner, " {} |", cell)?;
        }
        writeln!(self.inner)?;
        Ok(())
    }
}

impl<W> std::convert::AsRef<W> for Writer<W> {
    fn as_ref(&self) -> &W {
        &self.inner
    }
}
