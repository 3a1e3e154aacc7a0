//! Per-directory and per-archive conversion.
//!
//! A broken record costs one row; a broken archive costs the rest of that
//! file. Neither stops the batch.

use crate::core::archive;
use crate::core::row;
use crate::domain::model::{FileOutcome, FileReport, Row, RowSchema, SourceArchive};
use crate::domain::ports::WarningSink;
use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Lists gzip archives in `dir`, sorted by path, plus the count of other
/// entries that were passed over.
pub fn scan_source_dir(dir: &Path) -> Result<(Vec<SourceArchive>, usize)> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut archives = Vec::new();
    let mut skipped = 0;
    for path in paths {
        if !path.is_file() {
            skipped += 1;
            continue;
        }
        match archive::is_gzip(&path) {
            Ok(true) => archives.push(SourceArchive { path }),
            Ok(false) => {
                tracing::debug!("Skipping non-gzip file {}", path.display());
                skipped += 1;
            }
            Err(e) => {
                tracing::debug!("Skipping unreadable file {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }

    Ok((archives, skipped))
}

/// Keeps the first archive for each output path. Later archives that would
/// write the same CSV (`day.jsonl.gz` and `day.json.gz`) are warned about and
/// dropped; the second value is how many were dropped.
pub fn claim_outputs(
    archives: Vec<SourceArchive>,
    output_dir: &Path,
    sink: &dyn WarningSink,
) -> (Vec<SourceArchive>, usize) {
    let mut claimed = HashSet::new();
    let mut kept = Vec::with_capacity(archives.len());
    let mut dropped = 0;

    for source in archives {
        let output = archive::output_path_for(&source.path, output_dir);
        if claimed.insert(output.clone()) {
            kept.push(source);
        } else {
            dropped += 1;
            sink.warn(&format!(
                "Skipped {}: {} is already written by another archive",
                source.path.display(),
                output.display()
            ));
        }
    }

    (kept, dropped)
}

/// Parses one raw line and assembles its row. Invalid UTF-8 is a parse error
/// like any other malformed JSON.
pub fn parse_row(line: &[u8], schema: RowSchema) -> Result<Row> {
    let record: serde_json::Value = serde_json::from_slice(line)?;
    row::assemble_row_with(&record, schema)
}

/// Converts one archive into `<stem>.csv` under `output_dir`. Never fails:
/// problems end up in the report and the warning sink.
pub fn convert_archive(
    source: &SourceArchive,
    output_dir: &Path,
    schema: RowSchema,
    sink: &dyn WarningSink,
) -> FileReport {
    let mut report = FileReport {
        source: source.path.clone(),
        output: archive::output_path_for(&source.path, output_dir),
        rows_written: 0,
        records_skipped: 0,
        outcome: FileOutcome::Completed,
    };

    tracing::debug!(
        "Converting {} -> {}",
        report.source.display(),
        report.output.display()
    );

    if let Err(e) = write_csv(schema, sink, &mut report) {
        let reason = e.to_string();
        sink.warn(&format!(
            "Abandoned {} after {} rows: {}",
            report.source.display(),
            report.rows_written,
            reason
        ));
        report.outcome = FileOutcome::Abandoned(reason);
    }

    report
}

fn write_csv(schema: RowSchema, sink: &dyn WarningSink, report: &mut FileReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(&report.output)?;
    writer.write_record(row::headers(schema))?;

    let copied = copy_records(&mut writer, schema, sink, report);
    // rows written before a corrupt block stay on disk
    writer.flush()?;
    copied
}

fn copy_records<W: io::Write>(
    writer: &mut csv::Writer<W>,
    schema: RowSchema,
    sink: &dyn WarningSink,
    report: &mut FileReport,
) -> Result<()> {
    let source_name = report.source.display().to_string();
    let lines = archive::read_lines(&report.source).map_err(|e| EtlError::ArchiveError {
        path: source_name.clone(),
        message: e.to_string(),
    })?;

    for (index, line) in lines.enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| EtlError::ArchiveError {
            path: source_name.clone(),
            message: format!("line {}: {}", line_number, e),
        })?;

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match parse_row(&line, schema) {
            Ok(row) => {
                writer.write_record(&row)?;
                report.rows_written += 1;
            }
            Err(e) => {
                report.records_skipped += 1;
                sink.warn(&format!(
                    "{}:{}: skipped record: {}",
                    source_name, line_number, e
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CollectingSink;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const GOOD_POST: &str = r#"{"id_str":"1","text":"hi","entities":{"hashtags":[],"urls":[]},"user":{"screen_name":"a"}}"#;

    fn write_gz(path: &Path, body: &str) {
        let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        encoder.write_all(body.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn test_scan_skips_non_archives() {
        let dir = TempDir::new().unwrap();
        write_gz(&dir.path().join("b.jsonl.gz"), GOOD_POST);
        write_gz(&dir.path().join("a.jsonl.gz"), GOOD_POST);
        fs::write(dir.path().join("notes.txt"), "not an archive").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let (archives, skipped) = scan_source_dir(dir.path()).unwrap();
        let names: Vec<_> = archives
            .iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jsonl.gz", "b.jsonl.gz"]);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_scan_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(scan_source_dir(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_parse_row_reports_json_errors() {
        assert!(matches!(
            parse_row(b"{not json", RowSchema::Standard),
            Err(EtlError::SerializationError(_))
        ));
        assert!(matches!(
            parse_row(b"{\"text\":\"\xff\xfe\"}", RowSchema::Standard),
            Err(EtlError::SerializationError(_))
        ));
        assert_eq!(
            parse_row(GOOD_POST.as_bytes(), RowSchema::Standard).unwrap().len(),
            36
        );
    }

    #[test]
    fn test_convert_skips_bad_records() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("day.jsonl.gz");
        write_gz(
            &source,
            &format!("{}\n{{\"id_str\":\"2\"}}\n\n{}\n", GOOD_POST, GOOD_POST),
        );

        let sink = CollectingSink::new();
        let report = convert_archive(
            &SourceArchive { path: source },
            dir.path(),
            RowSchema::Standard,
            &sink,
        );

        assert!(report.is_completed());
        assert_eq!(report.rows_written, 2);
        assert_eq!(report.records_skipped, 1);
        assert_eq!(report.output, dir.path().join("day.csv"));

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains(":2: skipped record"));

        let csv_text = fs::read_to_string(&report.output).unwrap();
        assert_eq!(csv_text.lines().count(), 3);
        assert!(csv_text.starts_with("id,tweet_url,created_at,"));
    }

    #[test]
    fn test_invalid_utf8_costs_one_record() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("mixed.jsonl.gz");

        let mut encoder = GzEncoder::new(File::create(&source).unwrap(), Compression::default());
        encoder.write_all(GOOD_POST.as_bytes()).unwrap();
        encoder.write_all(b"\n{\"text\":\"\xff\xfe\"}\n").unwrap();
        encoder.write_all(GOOD_POST.as_bytes()).unwrap();
        encoder.write_all(b"\n").unwrap();
        encoder.finish().unwrap();

        let sink = CollectingSink::new();
        let report = convert_archive(
            &SourceArchive { path: source },
            dir.path(),
            RowSchema::Standard,
            &sink,
        );

        assert!(report.is_completed());
        assert_eq!(report.rows_written, 2);
        assert_eq!(report.records_skipped, 1);
        assert!(sink.messages()[0].contains(":2: skipped record"));
    }

    #[test]
    fn test_truncated_archive_keeps_partial_output() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("cut.jsonl.gz");

        // first member intact, second member cut in half
        let mut bytes = Vec::new();
        for (id, count) in [("first", 3), ("second", 200)] {
            let post = GOOD_POST.replace(r#""id_str":"1""#, &format!(r#""id_str":"{}""#, id));
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            for _ in 0..count {
                encoder.write_all(post.as_bytes()).unwrap();
                encoder.write_all(b"\n").unwrap();
            }
            let member = encoder.finish().unwrap();
            let keep = if id == "first" { member.len() } else { member.len() / 2 };
            bytes.extend_from_slice(&member[..keep]);
        }
        fs::write(&source, bytes).unwrap();

        let sink = CollectingSink::new();
        let report = convert_archive(
            &SourceArchive { path: source },
            dir.path(),
            RowSchema::Standard,
            &sink,
        );

        assert!(matches!(report.outcome, FileOutcome::Abandoned(_)));
        assert!(report.rows_written >= 3);
        assert!(sink.messages().iter().any(|m| m.starts_with("Abandoned")));

        let mut reader = csv::Reader::from_path(&report.output).unwrap();
        let ids: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(ids.len(), report.rows_written);
        assert_eq!(&ids[..3], ["first", "first", "first"]);
    }

    #[test]
    fn test_claim_outputs_drops_colliding_archives() {
        let archives = ["raw/day.json.gz", "raw/day.jsonl.gz", "raw/night.jsonl.gz"]
            .iter()
            .map(|p| SourceArchive {
                path: Path::new(p).to_path_buf(),
            })
            .collect();

        let sink = CollectingSink::new();
        let (kept, dropped) = claim_outputs(archives, Path::new("out"), &sink);

        let kept: Vec<_> = kept.iter().map(|a| a.path.to_string_lossy().into_owned()).collect();
        assert_eq!(kept, vec!["raw/day.json.gz", "raw/night.jsonl.gz"]);
        assert_eq!(dropped, 1);
        assert!(sink.messages()[0].contains("day.jsonl.gz"));
    }
}
