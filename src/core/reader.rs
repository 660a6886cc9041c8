use crate::domain::model::{RawRecord, ReaderMode};
use crate::utils::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

enum Rows<R: Read> {
    Strict(csv::StringRecordsIntoIter<R>),
    RawSplit {
        lines: Lines<BufReader<R>>,
        delimiter: char,
    },
}

/// Lazy, single-pass sequence of records read from a byte stream.
///
/// Yields `Err` once for a malformed row or read failure and then stops.
pub struct RecordSource<R: Read> {
    rows: Rows<R>,
    mode: ReaderMode,
    finished: bool,
}

impl RecordSource<File> {
    pub fn open<P: AsRef<Path>>(path: P, mode: ReaderMode) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file, mode))
    }
}

impl<R: Read> RecordSource<R> {
    pub fn new(reader: R, mode: ReaderMode) -> Self {
        let rows = match mode {
            ReaderMode::Strict => {
                tracing::debug!("Using CSV reader");
                Rows::Strict(
                    csv::ReaderBuilder::new()
                        .has_headers(false)
                        .from_reader(reader)
                        .into_records(),
                )
            }
            ReaderMode::RawSplit(delimiter) => {
                tracing::debug!("Using line reader split on {:?}", delimiter);
                Rows::RawSplit {
                    lines: BufReader::new(reader).lines(),
                    delimiter,
                }
            }
        };

        Self {
            rows,
            mode,
            finished: false,
        }
    }

    pub fn mode(&self) -> ReaderMode {
        self.mode
    }

    fn next_row(&mut self) -> Option<Result<RawRecord>> {
        match &mut self.rows {
            Rows::Strict(records) => records.next().map(|row| -> Result<RawRecord> {
                let row = row?;
                Ok(RawRecord::new(row.iter().map(str::to_string).collect()))
            }),
            Rows::RawSplit { lines, delimiter } => lines.next().map(|line| -> Result<RawRecord> {
                let line = line?;
                let line = line.strip_suffix('\r').unwrap_or(&line);
                Ok(RawRecord::new(
                    line.split(*delimiter).map(str::to_string).collect(),
                ))
            }),
        }
    }
}

impl<R: Read> Iterator for RecordSource<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = self.next_row();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}
