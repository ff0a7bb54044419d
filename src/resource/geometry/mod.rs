use std::io::BufRead;

pub mod file;

/// Flat mesh data parsed from a geometry description file: interleaved
/// per-vertex float components plus a 16-bit index list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryRecord {
    pub points: Vec<f32>,
    pub indices: Vec<u16>,
}

impl GeometryRecord {
    pub fn point_byte_size(&self) -> u64 {
        (self.points.len() * std::mem::size_of::<f32>()) as u64
    }

    pub fn index_byte_size(&self) -> u64 {
        (self.indices.len() * std::mem::size_of::<u16>()) as u64
    }

    pub fn vertex_count(&self, components_per_vertex: usize) -> usize {
        self.points.len() / components_per_vertex
    }

    /// Every index must reference a vertex that actually exists in the
    /// interleaved point array.
    pub fn indices_in_bounds(&self, components_per_vertex: usize) -> bool {
        let vertex_count = self.vertex_count(components_per_vertex);
        self.indices
            .iter()
            .all(|index| (*index as usize) < vertex_count)
    }
}

#[derive(Debug)]
pub enum LoadError {
    FileNotFound {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    Allocation,
}

impl LoadError {
    /// Attaches the file path to errors raised below the filesystem layer.
    fn with_path(self, path: &std::path::Path) -> Self {
        match self {
            LoadError::Io { source, .. } => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::FileNotFound { path, .. } => {
                write!(f, "Could not open geometry file: {}", path.display())
            }
            LoadError::Io { path, .. } if path.as_os_str().is_empty() => {
                write!(f, "Could not read geometry data")
            }
            LoadError::Io { path, .. } => {
                write!(f, "Could not read geometry file: {}", path.display())
            }
            LoadError::Allocation => write!(f, "Could not grow geometry arrays"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::FileNotFound { source, .. } => Some(source),
            LoadError::Io { source, .. } => Some(source),
            LoadError::Allocation => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Section {
    None,
    Points,
    Indices,
}

/// Parses the line-oriented geometry format. `[points]` and `[indices]`
/// headers switch the active section; `#` lines and blank lines are skipped.
/// Everything else is treated as a data line for the active section.
///
/// Data lines are read token by token, and extraction stops silently at the
/// first token that does not parse as a number for the active section. The
/// values before it are kept. This tolerance is deliberate: partial lines and
/// trailing annotations are accepted, never reported.
pub fn parse_geometry<R: BufRead>(reader: R) -> Result<GeometryRecord, LoadError> {
    let mut section = Section::None;
    let mut record = GeometryRecord::default();

    for line in reader.lines() {
        let line = line.map_err(|source| LoadError::Io {
            path: std::path::PathBuf::new(),
            source,
        })?;

        match line.trim_end() {
            "[points]" => section = Section::Points,
            "[indices]" => section = Section::Indices,
            trimmed if trimmed.is_empty() || trimmed.starts_with('#') => {}
            _ => match section {
                Section::None => {}
                Section::Points => {
                    let mut offset = 0;
                    while let Some((value, next_offset)) = next_float_token(&line, offset) {
                        append(&mut record.points, value)?;
                        offset = next_offset;
                    }
                }
                Section::Indices => {
                    let mut offset = 0;
                    while let Some((value, next_offset)) = next_index_token(&line, offset) {
                        append(&mut record.indices, value)?;
                        offset = next_offset;
                    }
                }
            },
        }
    }

    Ok(record)
}

/// Appends one extracted value, surfacing growth failure instead of
/// aborting the process. `Vec` doubles its capacity under the hood, so the
/// reservation only hits the allocator on the growth steps.
fn append<T>(values: &mut Vec<T>, value: T) -> Result<(), LoadError> {
    if values.len() == values.capacity() {
        values.try_reserve(1).map_err(|_| LoadError::Allocation)?;
    }

    values.push(value);

    Ok(())
}

fn next_float_token(line: &str, offset: usize) -> Option<(f32, usize)> {
    let (token, next_offset) = next_token(line, offset)?;

    match token.parse::<f32>() {
        Ok(value) => Some((value, next_offset)),
        Err(_) => None,
    }
}

fn next_index_token(line: &str, offset: usize) -> Option<(u16, usize)> {
    let (token, next_offset) = next_token(line, offset)?;

    match token.parse::<u16>() {
        Ok(value) => Some((value, next_offset)),
        Err(_) => None,
    }
}

fn next_token(line: &str, offset: usize) -> Option<(&str, usize)> {
    let rest = &line[offset..];
    let start = offset + (rest.len() - rest.trim_start().len());

    let end = match line[start..].find(char::is_whitespace) {
        Some(length) => start + length,
        None => line.len(),
    };

    if start == end {
        return None;
    }

    Some((&line[start..end], end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> GeometryRecord {
        parse_geometry(source.as_bytes()).unwrap()
    }

    #[test]
    fn parses_points_and_indices() {
        let record = parse(
            "[points]\n-0.5 -0.5 1.0 0.0 0.0\n+0.5 -0.5 0.0 1.0 0.0\n[indices]\n0 1 0\n",
        );

        assert_eq!(record.points.len(), 10);
        assert_eq!(record.indices, vec![0, 1, 0]);
        assert_eq!(record.index_byte_size(), 6);
    }

    #[test]
    fn byte_sizes_follow_element_counts() {
        let record = parse("[points]\n1.0 2.0 3.0\n[indices]\n0 0 0 0\n");

        assert_eq!(record.point_byte_size(), 4 * record.points.len() as u64);
        assert_eq!(record.index_byte_size(), 2 * record.indices.len() as u64);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let record = parse("# header comment\n\n[points]\n# inline comment\n0.25 0.75\n\n");

        assert_eq!(record.points, vec![0.25, 0.75]);
    }

    #[test]
    fn empty_indices_section_yields_empty_index_array() {
        let record = parse("[points]\n0.0 0.0 1.0 1.0 1.0\n[indices]\n");

        assert_eq!(record.points.len(), 5);
        assert!(record.indices.is_empty());
        assert_eq!(record.index_byte_size(), 0);
    }

    #[test]
    fn data_before_any_section_is_ignored() {
        let record = parse("1.0 2.0 3.0\n[points]\n4.0\n");

        assert_eq!(record.points, vec![4.0]);
    }

    #[test]
    fn unparsable_token_stops_the_line_and_keeps_earlier_values() {
        let record = parse("[points]\n1.0 2.0 oops 3.0\n4.0\n");

        assert_eq!(record.points, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn out_of_range_index_stops_the_line() {
        let record = parse("[indices]\n1 2 70000 3\n");

        assert_eq!(record.indices, vec![1, 2]);
    }

    #[test]
    fn unrecognized_section_header_behaves_as_comment() {
        let record = parse("[points]\n1.0\n[normals]\n2.0 3.0\n");

        // "[normals]" is not a header we know; it does not switch sections,
        // and as a data line it contains no leading numeric token.
        assert_eq!(record.points, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let source = "[points]\n-0.5 -0.5 1.0 0.0 0.0\n+0.5 +0.5 0.0 0.0 1.0\n[indices]\n0 1 1\n";

        assert_eq!(parse(source), parse(source));
    }

    #[test]
    fn indices_in_bounds_checks_against_vertex_count() {
        let record = parse("[points]\n0.0 0.0 1.0 0.0 0.0\n1.0 1.0 0.0 1.0 0.0\n[indices]\n0 1\n");

        assert_eq!(record.vertex_count(5), 2);
        assert!(record.indices_in_bounds(5));

        let record = parse("[points]\n0.0 0.0 1.0 0.0 0.0\n[indices]\n0 1\n");
        assert!(!record.indices_in_bounds(5));
    }

    struct BrokenReader;

    impl std::io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "lost"))
        }
    }

    #[test]
    fn read_failure_surfaces_as_io_error() {
        match parse_geometry(std::io::BufReader::new(BrokenReader)) {
            Err(LoadError::Io { .. }) => {}
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn io_error_display_names_the_file() {
        let error = LoadError::Io {
            path: std::path::PathBuf::new(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "lost"),
        }
        .with_path(std::path::Path::new("broken.txt"));

        assert!(error.to_string().contains("broken.txt"));
    }

    #[test]
    fn handles_windows_line_endings() {
        let record = parse("[points]\r\n1.0 2.0\r\n[indices]\r\n0\r\n");

        assert_eq!(record.points, vec![1.0, 2.0]);
        assert_eq!(record.indices, vec![0]);
    }
}
