use crate::error::Error;
use crate::graph::{GraphStore, GraphStoreBuilder};
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Textual layout of an edge list, one edge per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeListFormat {
    /// `nodeA nodeB`, tokens separated by any amount of whitespace.
    Whitespace,
    /// `nodeA,nodeB`, optionally preceded by a header line which is skipped.
    Comma { header: bool },
}

impl EdgeListFormat {
    /// Guesses the format from the file extension and the first data line.
    ///
    /// A header is never assumed: it must be requested explicitly.
    pub fn detect(path: impl AsRef<Path>, first_line: &str) -> Self {
        let is_csv = path
            .as_ref()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv || first_line.contains(',') {
            EdgeListFormat::Comma { header: false }
        } else {
            EdgeListFormat::Whitespace
        }
    }

    fn has_header(&self) -> bool {
        matches!(self, EdgeListFormat::Comma { header: true })
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            EdgeListFormat::Whitespace => line.split_whitespace().collect(),
            EdgeListFormat::Comma { .. } => line.split(',').map(str::trim).collect(),
        }
    }
}

/// Reads an edge list from `path`.
///
/// When `format` is `None` it is detected from the path and the first
/// non-comment line of the file.
pub fn load(path: impl AsRef<Path>, format: Option<EdgeListFormat>) -> Result<GraphStore, Error> {
    let path = path.as_ref();
    let format = match format {
        Some(format) => format,
        None => {
            let reader = BufReader::new(File::open(path)?);
            let mut first_line = String::new();
            for line in reader.lines() {
                let line = line?;
                if !is_skipped(&line) {
                    first_line = line;
                    break;
                }
            }
            EdgeListFormat::detect(path, &first_line)
        }
    };
    info!("Loading {} as {:?}...", path.display(), format);
    let graph = read(BufReader::new(File::open(path)?), format)?;
    info!(
        "Loaded graph with {} nodes and {} edges",
        graph.num_nodes(),
        graph.num_edges()
    );
    Ok(graph)
}

/// Parses an edge list.
///
/// Blank lines and lines starting with `#` are ignored. Any other line must
/// hold exactly two non-empty node tokens; duplicate edges are accepted and
/// stored once.
pub fn read(reader: impl BufRead, format: EdgeListFormat) -> Result<GraphStore, Error> {
    let mut builder = GraphStoreBuilder::new();
    let mut duplicates = 0usize;
    let mut lines = reader.lines().enumerate();

    if format.has_header() {
        if let Some((_, header)) = lines.next() {
            debug!("Skipping header {:?}", header?);
        }
    }

    for (i, line) in lines {
        let line = line?;
        if is_skipped(&line) {
            continue;
        }
        let tokens = format.split(&line);
        match tokens[..] {
            [a, b] if !a.is_empty() && !b.is_empty() => {
                if !builder.add_edge(a, b) {
                    duplicates += 1;
                }
            }
            _ => {
                return Err(Error::MalformedInput {
                    line: i + 1,
                    message: format!("expected two node tokens, found {line:?}"),
                })
            }
        }
    }

    if duplicates > 0 {
        debug!("Ignored {duplicates} duplicate edges or self-loops");
    }
    Ok(builder.build())
}

/// Writes one line per undirected edge of `graph`.
///
/// Isolated nodes have no line and are lost by a write/read round trip.
pub fn write(
    graph: &GraphStore,
    mut writer: impl Write,
    format: EdgeListFormat,
) -> std::io::Result<()> {
    if format.has_header() {
        writeln!(writer, "source,target")?;
    }
    let separator = match format {
        EdgeListFormat::Whitespace => " ",
        EdgeListFormat::Comma { .. } => ",",
    };
    for (u, v) in graph.edges() {
        writeln!(writer, "{}{separator}{}", graph.label(u), graph.label(v))?;
    }
    writer.flush()
}

fn is_skipped(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}
