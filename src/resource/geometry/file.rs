use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::resource::geometry::{parse_geometry, GeometryRecord, LoadError};

/// Loads a geometry description from the filesystem. The file handle is
/// scoped to this call and is closed on every exit path, including parse
/// failure. No partial record is ever returned.
pub fn load_geometry(path: &Path) -> Result<GeometryRecord, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(source) => {
            return Err(LoadError::FileNotFound {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let record = parse_geometry(BufReader::new(file)).map_err(|error| error.with_path(path))?;

    log::debug!(
        "Loaded geometry from {}: {} point components, {} indices",
        path.display(),
        record.points.len(),
        record.indices.len()
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_a_well_formed_file() {
        let path = write_fixture(
            "mesh_viewer_quad.txt",
            "[points]\n-0.5 -0.5 1.0 0.0 0.0\n+0.5 -0.5 0.0 1.0 0.0\n[indices]\n0 1 0\n",
        );

        let record = load_geometry(&path).unwrap();

        assert_eq!(record.points.len(), 10);
        assert_eq!(record.indices.len(), 3);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_reports_file_not_found() {
        let path = std::env::temp_dir().join("mesh_viewer_does_not_exist.txt");

        match load_geometry(&path) {
            Err(LoadError::FileNotFound { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn mid_stream_read_failure_reports_the_path() {
        // Invalid UTF-8 makes the line reader fail after the file opened.
        let path = std::env::temp_dir().join("mesh_viewer_invalid_utf8.txt");
        std::fs::write(&path, b"[points]\n\xff\xfe 1.0\n").unwrap();

        match load_geometry(&path) {
            Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Io, got {other:?}"),
        }

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn loading_twice_yields_identical_records() {
        let path = write_fixture(
            "mesh_viewer_idempotent.txt",
            "[points]\n0.1 0.2 0.3 0.4 0.5\n[indices]\n0\n",
        );

        assert_eq!(load_geometry(&path).unwrap(), load_geometry(&path).unwrap());

        std::fs::remove_file(path).unwrap();
    }
}
