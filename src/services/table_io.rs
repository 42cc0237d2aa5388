//! CSV 表格读写

use crate::error::TableError;
use crate::models::Table;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 读取 CSV 文件，第一行为表头
pub fn read_table(path: &Path) -> Result<Table, TableError> {
    let file_name = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| TableError::csv(&file_name, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TableError::csv(&file_name, e))?
        .iter()
        .map(String::from)
        .collect();

    // 短行补空；长行无法对齐到表头，整个文件作废
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TableError::csv(&file_name, e))?;
        if record.len() > headers.len() {
            return Err(TableError::RaggedRow {
                path: file_name,
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(Table::new(headers, rows))
}

/// 把表格写成 CSV（不带行号列）
///
/// 先写到同目录的临时文件，成功后再改名，失败时不留下半截文件。
pub fn write_table(path: &Path, table: &Table) -> Result<(), TableError> {
    write_atomically(path, |file| {
        write_csv(file, table).map_err(|e| TableError::csv(path.display().to_string(), e))
    })
}

fn write_atomically<F>(path: &Path, write: F) -> Result<(), TableError>
where
    F: FnOnce(&mut File) -> Result<(), TableError>,
{
    let partial = partial_path(path);
    let mut file =
        File::create(&partial).map_err(|e| TableError::io(partial.display().to_string(), e))?;

    let result = write(&mut file).and_then(|_| {
        file.sync_all()
            .map_err(|e| TableError::io(partial.display().to_string(), e))
    });
    drop(file);

    let result = result.and_then(|_| {
        std::fs::rename(&partial, path).map_err(|e| TableError::io(path.display().to_string(), e))
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    result
}

/// `dir/name.csv` → `dir/.name.csv.partial`
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    path.with_file_name(format!(".{}.partial", name))
}

/// 把表格序列化为 CSV 字节
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, TableError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, table).map_err(|e| TableError::csv("<memory>", e))?;
    Ok(buf)
}

fn write_csv<W: Write>(out: W, table: &Table) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_quoted_multiline_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        std::fs::write(
            &path,
            "id,body,author\n1,\"line one\nline two, with comma\",alice\n2,short,bob\n",
        )
        .unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.headers(), &["id", "body", "author"]);
        assert_eq!(
            table.column("body").unwrap(),
            vec!["line one\nline two, with comma", "short"]
        );
    }

    #[test]
    fn test_write_then_read_preserves_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            vec!["body".to_string(), "label".to_string()],
            vec![vec!["say \"hi\"".to_string(), "Human".to_string()]],
        );

        tokio_test::assert_ok!(write_table(&path, &table));
        let read_back = tokio_test::assert_ok!(read_table(&path));
        assert_eq!(read_back, table);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(TableError::Csv { .. })));
    }

    #[test]
    fn test_row_wider_than_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.csv");
        std::fs::write(&path, "id,body\n1,hello,EXTRA_DATA\n2,world\n").unwrap();

        match read_table(&path) {
            Err(TableError::RaggedRow {
                line,
                expected,
                found,
                ..
            }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected RaggedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_is_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.csv");
        std::fs::write(&path, "id,body,author\n1,hello\n2,world,bob\n").unwrap();

        let table = tokio_test::assert_ok!(read_table(&path));
        assert_eq!(table.rows()[0], vec!["1", "hello", ""]);
        assert_eq!(table.column("author").unwrap(), vec!["", "bob"]);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_posts.csv");

        let result = write_atomically(&path, |file| {
            file.write_all(b"id,body\n1,half a ro").unwrap();
            Err(TableError::MissingColumn {
                column: "body".to_string(),
            })
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale\n").unwrap();
        let table = Table::new(vec!["body".to_string()], vec![vec!["fresh".to_string()]]);

        tokio_test::assert_ok!(write_table(&path, &table));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "body\nfresh\n");
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_to_csv_bytes() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string(), "x,y".to_string()]],
        );
        let bytes = to_csv_bytes(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a,b\n1,\"x,y\"\n");
    }
}
