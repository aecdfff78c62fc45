//! 대시보드 CSV 저장소.
//!
//! 모든 파일은 UTF-8 BOM이 붙은 CSV로 기록합니다. 쓰기는 같은 디렉토리의
//! 임시 파일에 먼저 기록한 뒤 이름을 바꿔 교체하므로, 읽는 쪽은 이전 버전이나
//! 새 버전 중 하나만 보게 됩니다.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

const UTF8_BOM: &str = "\u{FEFF}";

/// 저장소 에러
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("파일 입출력 실패 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV 처리 실패 ({path}): {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("파일 교체 실패 ({path}): {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// 레코드를 CSV로 원자적으로 기록 (헤더 포함, BOM 선행).
pub fn write_csv_atomic<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StorageError::io(&dir, e))?;
    tmp.write_all(UTF8_BOM.as_bytes())
        .map_err(|e| StorageError::io(tmp.path(), e))?;

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| StorageError::csv(path, e))?;
        }
        writer.flush().map_err(|e| StorageError::io(path, e))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(|e| StorageError::io(path, e))?;
    tmp.persist(path).map_err(|e| StorageError::Persist {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), rows = records.len(), "CSV 기록 완료");
    Ok(())
}

/// CSV 읽기. 파일이 없으면 `None`.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    let body = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let records = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| StorageError::csv(path, e))?;
    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        #[serde(rename = "Stock")]
        name: String,
        #[serde(rename = "Buzz")]
        count: usize,
    }

    #[test]
    fn test_write_starts_with_bom_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market_data.csv");
        let rows = vec![
            Row { name: "가나전자".into(), count: 3 },
            Row { name: "다라바이오".into(), count: 1 },
        ];

        write_csv_atomic(&path, &rows).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with(UTF8_BOM));
        assert!(raw[UTF8_BOM.len()..].starts_with("Stock,Buzz\n"));

        let loaded: Vec<Row> = read_csv(&path).unwrap().unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_overwrite_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_db.csv");

        write_csv_atomic(&path, &[Row { name: "A전자".into(), count: 9 }]).unwrap();
        write_csv_atomic(&path, &[Row { name: "B전자".into(), count: 2 }]).unwrap();

        let loaded: Vec<Row> = read_csv(&path).unwrap().unwrap();
        assert_eq!(loaded, vec![Row { name: "B전자".into(), count: 2 }]);

        // 임시 파일이 남지 않아야 함
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Vec<Row>> = read_csv(&dir.path().join("nope.csv")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alert_history.csv");
        fs::write(&path, "Stock,Buzz\n가나전자,not-a-number\n").unwrap();

        let result: Result<Option<Vec<Row>>, _> = read_csv(&path);
        assert!(matches!(result, Err(StorageError::Csv { .. })));
    }
}
