use crate::kernel::CentralityResult;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `Node <label>: <Kind> Centrality = <value>`, one line per node
/// with a defined score, in node order.
pub fn write_results(result: &CentralityResult, mut writer: impl Write) -> std::io::Result<()> {
    let name = result.centrality().name();
    for (label, value) in result.iter() {
        writeln!(writer, "Node {label}: {name} Centrality = {value:?}")?;
    }
    writer.flush()
}

pub fn save(result: &CentralityResult, path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    info!("Writing {}", path.display());
    write_results(result, BufWriter::new(File::create(path)?))
}
