//! 内存中的表格
//!
//! 表格只做一次读取、一次补列、一次写出，不会被并发修改。

use crate::error::TableError;

/// 按列名组织的行数据
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// 创建表格，长度不足的行会用空字符串补齐
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 按行顺序取出一列
    pub fn column(&self, name: &str) -> Result<Vec<String>, TableError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| TableError::MissingColumn {
                column: name.to_string(),
            })?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect())
    }

    /// 写入一列：已存在则原位覆盖，否则追加到末尾
    ///
    /// `values` 的长度必须等于行数。
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());

        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                self.headers.len() - 1
            }
        };

        for (row, value) in self.rows.iter_mut().zip(values) {
            if row.len() <= idx {
                row.resize(idx + 1, String::new());
            }
            row[idx] = value;
        }
    }

    /// 按行号保留行，保持原有顺序
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let mut index = 0;
        self.rows.retain(|_| {
            let kept = keep(index);
            index += 1;
            kept
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["id".to_string(), "body".to_string()],
            vec![
                vec!["1".to_string(), "hello".to_string()],
                vec!["2".to_string()],
            ],
        )
    }

    #[test]
    fn test_column_pads_short_rows() {
        let table = sample();
        assert_eq!(table.column("body").unwrap(), vec!["hello", ""]);
    }

    #[test]
    fn test_missing_column() {
        let table = sample();
        let err = table.column("text").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { column } if column == "text"));
    }

    #[test]
    fn test_set_column_appends_then_overwrites() {
        let mut table = sample();
        table.set_column("label", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(table.headers(), &["id", "body", "label"]);

        table.set_column("label", vec!["c".to_string(), "d".to_string()]);
        assert_eq!(table.headers().len(), 3);
        assert_eq!(table.column("label").unwrap(), vec!["c", "d"]);
    }

    #[test]
    fn test_retain_rows_by_index() {
        let mut table = sample();
        table.retain_rows(|i| i == 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][0], "2");
    }
}
