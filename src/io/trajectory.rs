//! CSV trajectory output (C12, §6): one row per observation or terminal event,
//! columns `replicate, time, s[0], s[1], …, s[K-1]`. The sink is append-only and
//! line-atomic; the caller is responsible for writing the header row.

use crate::error::SimResult;
use csv::Writer;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Anything that can record one trajectory row. Implemented by the CSV file sink
/// and, in tests, by an in-memory collector.
pub trait TrajectorySink {
    fn emit(&mut self, replicate: u64, time: f64, state: &[i64]) -> SimResult<()>;
}

/// Writes trajectory rows to a CSV file opened in append mode.
pub struct CsvTrajectorySink<W: Write> {
    writer: Writer<W>,
}

impl CsvTrajectorySink<std::fs::File> {
    /// Opens `path` for append, creating it (and its parent directories) if it
    /// does not yet exist.
    pub fn open_append(path: &Path) -> SimResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(CsvTrajectorySink {
            writer: Writer::from_writer(file),
        })
    }
}

impl<W: Write> TrajectorySink for CsvTrajectorySink<W> {
    fn emit(&mut self, replicate: u64, time: f64, state: &[i64]) -> SimResult<()> {
        let mut record: Vec<String> = Vec::with_capacity(2 + state.len());
        record.push(replicate.to_string());
        record.push(format!("{time}"));
        record.extend(state.iter().map(|s| s.to_string()));
        self.writer.write_record(&record)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the header row `replicate,time,s0,s1,...` for a state of dimension `k`.
pub fn write_header(path: &Path, k: usize) -> SimResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut header = vec!["replicate".to_string(), "time".to_string()];
    header.extend((0..k).map(|i| format!("s{i}")));
    writeln!(file, "{}", header.join(","))?;
    Ok(())
}

/// One completed row, as produced by a replicate worker and drained by the
/// dedicated writer thread.
#[derive(Debug, Clone)]
pub struct TrajectoryRow {
    pub replicate: u64,
    pub time: f64,
    pub state: Vec<i64>,
}

/// Forwards rows onto an `mpsc::Sender`, for replicate workers that share one
/// writer thread (see `spawn_writer` and `crate::batch`).
pub struct ChannelSink {
    tx: mpsc::Sender<TrajectoryRow>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<TrajectoryRow>) -> Self {
        ChannelSink { tx }
    }
}

impl TrajectorySink for ChannelSink {
    fn emit(&mut self, replicate: u64, time: f64, state: &[i64]) -> SimResult<()> {
        self.tx
            .send(TrajectoryRow {
                replicate,
                time,
                state: state.to_vec(),
            })
            .map_err(|e| crate::error::SimError::ResourceError(e.to_string()))
    }
}

/// Spawns the dedicated writer thread that serializes concurrent replicate
/// workers onto one append-only CSV file, mirroring the single-writer-thread
/// pattern used elsewhere in this codebase for fan-in persistence.
pub fn spawn_writer(
    path: std::path::PathBuf,
    rx: mpsc::Receiver<TrajectoryRow>,
) -> JoinHandle<SimResult<u64>> {
    std::thread::spawn(move || {
        let mut sink = CsvTrajectorySink::open_append(&path)?;
        let mut rows_written = 0u64;
        while let Ok(row) = rx.recv() {
            sink.emit(row.replicate, row.time, &row.state)?;
            rows_written += 1;
        }
        Ok(rows_written)
    })
}

#[cfg(test)]
pub(crate) struct MemorySink {
    pub rows: Vec<(u64, f64, Vec<i64>)>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        MemorySink { rows: Vec::new() }
    }
}

#[cfg(test)]
impl TrajectorySink for MemorySink {
    fn emit(&mut self, replicate: u64, time: f64, state: &[i64]) -> SimResult<()> {
        self.rows.push((replicate, time, state.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_sink_appends_rows_with_header_written_separately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj.csv");
        write_header(&path, 2).unwrap();
        {
            let mut sink = CsvTrajectorySink::open_append(&path).unwrap();
            sink.emit(0, 0.0, &[10, 0]).unwrap();
            sink.emit(0, 1.0, &[9, 1]).unwrap();
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "replicate,time,s0,s1");
        assert_eq!(lines[1], "0,0,10,0");
        assert_eq!(lines[2], "0,1,9,1");
    }

    #[test]
    fn memory_sink_records_rows_in_order() {
        let mut sink = MemorySink::new();
        sink.emit(1, 0.0, &[5]).unwrap();
        sink.emit(1, 1.0, &[4]).unwrap();
        assert_eq!(sink.rows.len(), 2);
        assert_eq!(sink.rows[1].2, vec![4]);
    }
}
