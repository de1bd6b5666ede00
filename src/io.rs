//! CSV collaborator around the engine: reads `x,y` records and writes
//! `x,y,c` records.

use crate::error::{ClusterError, Result};
use crate::point_store::LabeledPoint;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

pub const OUTPUT_HEADER: [&str; 3] = ["x", "y", "c"];

/// Read points from a file. Each record must start with two numeric fields;
/// anything after them is ignored.
pub fn read_points(path: impl AsRef<Path>, has_header: bool) -> Result<Vec<(f64, f64)>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let points = read_points_from(BufReader::new(file), has_header)?;
    info!("Read {} points from {}", points.len(), path.display());
    Ok(points)
}

pub fn read_points_from<R: Read>(reader: R, has_header: bool) -> Result<Vec<(f64, f64)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() < 2 {
            return Err(ClusterError::Parse {
                line,
                message: format!("expected at least 2 fields, found {}", record.len()),
            });
        }
        let x = parse_coordinate(&record[0], "x", line)?;
        let y = parse_coordinate(&record[1], "y", line)?;
        points.push((x, y));
    }

    debug!("Parsed {} point records", points.len());
    Ok(points)
}

fn parse_coordinate(field: &str, name: &str, line: u64) -> Result<f64> {
    field.parse::<f64>().map_err(|e| ClusterError::Parse {
        line,
        message: format!("invalid {} value {:?}: {}", name, field, e),
    })
}

/// Write labelled points to a file, header first.
pub fn write_labeled_points(path: impl AsRef<Path>, points: &[LabeledPoint]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_labeled_points_to(BufWriter::new(file), points)?;
    info!("Wrote {} labelled points to {}", points.len(), path.display());
    Ok(())
}

/// Unassigned points get an empty `c` field.
pub fn write_labeled_points_to<W: Write>(writer: W, points: &[LabeledPoint]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(OUTPUT_HEADER)?;
    for p in points {
        wtr.serialize(p)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write header-less `x,y` records, the format `read_points` expects.
pub fn write_points(path: impl AsRef<Path>, points: &[(f64, f64)]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(File::create(path)?));
    for p in points {
        wtr.serialize(p)?;
    }
    wtr.flush()?;
    info!("Wrote {} points to {}", points.len(), path.display());
    Ok(())
}
