use crate::domain::{DuplicateRecord, ScanSummary};
use crate::ports::ReportPort;
use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Reference rendering: one pipe-delimited line per confirmed duplicate,
/// with the header emitted lazily before the first record only. A scan with
/// no duplicates produces no output at all.
pub struct PipeReportAdapter<W: Write> {
    out: W,
    header_written: bool,
}

impl PipeReportAdapter<io::Stdout> {
    pub fn with_stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl PipeReportAdapter<BufWriter<File>> {
    pub fn with_file(path: &Path) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> PipeReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }
}

impl<W: Write> ReportPort for PipeReportAdapter<W> {
    fn record(&mut self, record: &DuplicateRecord) -> Result<()> {
        if !self.header_written {
            writeln!(self.out, "CheckSum|DuplicateNum|Filesize|Path")?;
            self.header_written = true;
        }
        writeln!(
            self.out,
            "{}|{}|{}|{}",
            record.checksum,
            record.duplicate_num,
            record.file_size,
            record.path.display()
        )?;
        Ok(())
    }

    fn finish(&mut self, _summary: &ScanSummary) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

pub struct CsvReportAdapter<W: Write> {
    out: W,
    header_written: bool,
}

impl CsvReportAdapter<io::Stdout> {
    pub fn with_stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl CsvReportAdapter<BufWriter<File>> {
    pub fn with_file(path: &Path) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> CsvReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl<W: Write> ReportPort for CsvReportAdapter<W> {
    fn record(&mut self, record: &DuplicateRecord) -> Result<()> {
        if !self.header_written {
            writeln!(self.out, "checksum,duplicate_num,file_size,path")?;
            self.header_written = true;
        }
        writeln!(
            self.out,
            "{},{},{},{}",
            record.checksum,
            record.duplicate_num,
            record.file_size,
            csv_field(&record.path.to_string_lossy())
        )?;
        Ok(())
    }

    fn finish(&mut self, _summary: &ScanSummary) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Buffers records and writes one JSON document on finish, so the output is
/// a single well-formed value rather than a line stream.
pub struct JsonReportAdapter<W: Write> {
    out: W,
    records: Vec<DuplicateRecord>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    duplicates: &'a [DuplicateRecord],
    summary: &'a ScanSummary,
}

impl JsonReportAdapter<io::Stdout> {
    pub fn with_stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl JsonReportAdapter<BufWriter<File>> {
    pub fn with_file(path: &Path) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records: Vec::new(),
        }
    }
}

impl<W: Write> ReportPort for JsonReportAdapter<W> {
    fn record(&mut self, record: &DuplicateRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &ScanSummary) -> Result<()> {
        let report = JsonReport {
            duplicates: &self.records,
            summary,
        };
        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(num: usize, path: &str) -> DuplicateRecord {
        DuplicateRecord {
            checksum: "abc123".to_string(),
            duplicate_num: num,
            file_size: 10_000,
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn pipe_header_is_written_once_before_the_first_record() {
        let mut sink = PipeReportAdapter::new(Vec::new());
        sink.record(&record(0, "a.txt")).unwrap();
        sink.record(&record(1, "b.txt")).unwrap();
        sink.finish(&ScanSummary::default()).unwrap();

        let output = String::from_utf8(sink.out).unwrap();
        assert_eq!(
            output,
            "CheckSum|DuplicateNum|Filesize|Path\n\
             abc123|0|10000|a.txt\n\
             abc123|1|10000|b.txt\n"
        );
    }

    #[test]
    fn pipe_output_is_empty_without_records() {
        let mut sink = PipeReportAdapter::new(Vec::new());
        sink.finish(&ScanSummary::default()).unwrap();
        assert!(sink.out.is_empty());
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let mut sink = CsvReportAdapter::new(Vec::new());
        sink.record(&record(0, "plain.txt")).unwrap();
        sink.record(&record(1, "with,comma.txt")).unwrap();
        sink.finish(&ScanSummary::default()).unwrap();

        let output = String::from_utf8(sink.out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "checksum,duplicate_num,file_size,path");
        assert_eq!(lines[1], "abc123,0,10000,plain.txt");
        assert_eq!(lines[2], "abc123,1,10000,\"with,comma.txt\"");
    }

    #[test]
    fn json_report_carries_records_and_summary() {
        let mut sink = JsonReportAdapter::new(Vec::new());
        sink.record(&record(0, "a.txt")).unwrap();
        sink.record(&record(1, "b.txt")).unwrap();
        let summary = ScanSummary {
            files_scanned: 5,
            duplicate_files: 2,
            duplicate_groups: 1,
            read_errors: 0,
        };
        sink.finish(&summary).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&sink.out).unwrap();
        assert_eq!(value["duplicates"].as_array().unwrap().len(), 2);
        assert_eq!(value["duplicates"][1]["duplicate_num"], 1);
        assert_eq!(value["summary"]["files_scanned"], 5);
    }
}
