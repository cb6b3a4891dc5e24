use std::{fs::File, io::Read, path::Path};

use csv::{Reader, StringRecord, StringRecordsIntoIter};

use crate::{
    FIELD_SEPARATOR,
    error::{PipelineError, Rejection},
};

const BOM: char = '\u{feff}';

/// Reader for the `;` separated input files.
///
/// The files have no header row and no quoting, and lines do not share a field
/// count, so the csv reader is only used to split and trim.
pub fn create_input_reader<R: Read>(source: R) -> Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(FIELD_SEPARATOR as u8)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(source)
}

pub fn open_input(path: &Path) -> Result<Reader<File>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(create_input_reader(file))
}

/// Fields of the record without the empty ones at the end, so that
/// `P0001;3;` and `P0001;3` read the same and `;;` has no fields at all
pub fn significant_fields(record: &StringRecord) -> Vec<String> {
    let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// One non blank line of an input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Record { number: u64, fields: Vec<String> },
    /// The line could not be decoded, e.g. it is not valid UTF-8
    Unreadable { number: u64, rejection: Rejection },
}

impl InputLine {
    pub fn number(&self) -> u64 {
        match self {
            InputLine::Record { number, .. } | InputLine::Unreadable { number, .. } => *number,
        }
    }
}

/// Iterates the non blank lines of an input file.
///
/// Lines that are empty after trimming are skipped, their numbers are still
/// counted. Decoding problems are per line, an I/O error ends the iteration.
pub struct InputLines<R> {
    records: StringRecordsIntoIter<R>,
    first: bool,
    done: bool,
}

impl<R: Read> InputLines<R> {
    pub fn new(reader: Reader<R>) -> Self {
        Self {
            records: reader.into_records(),
            first: true,
            done: false,
        }
    }
}

impl<R: Read> Iterator for InputLines<R> {
    type Item = Result<InputLine, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) if e.is_io_error() => {
                    self.done = true;
                    return Some(Err(e));
                }
                Err(e) => {
                    self.first = false;
                    let number = e.position().map(|p| p.line()).unwrap_or_default();
                    return Some(Ok(InputLine::Unreadable {
                        number,
                        rejection: Rejection::Unreadable(e.to_string()),
                    }));
                }
            };
            let mut fields = significant_fields(&record);
            if std::mem::take(&mut self.first) {
                if let Some(head) = fields.first_mut() {
                    *head = head.trim_start_matches(BOM).trim_start().to_string();
                }
                while fields.last().is_some_and(|f| f.is_empty()) {
                    fields.pop();
                }
            }
            // a line of separators is not blank, it is a record without fields
            if fields.is_empty() && record.len() <= 1 {
                continue;
            }
            let number = record.position().map(|p| p.line()).unwrap_or_default();
            return Some(Ok(InputLine::Record { number, fields }));
        }
    }
}

/// Non blank lines of `source`
pub fn input_lines<R: Read>(source: R) -> InputLines<R> {
    InputLines::new(create_input_reader(source))
}
