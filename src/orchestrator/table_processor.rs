//! 单个表格处理器 - 编排层
//!
//! ## 职责
//!
//! 1. 取出文本列（缺列直接报错，交给上层处理）
//! 2. 整张表只调用一次批量预测
//! 3. 按行号追加 `label` 和 `confidence_score` 两列
//! 4. 丢弃没有拿到置信度的行

use crate::error::TableError;
use crate::models::{Prediction, Table};
use crate::workflow::BatchPredictor;
use tracing::debug;

/// 标签列名
pub const LABEL_COLUMN: &str = "label";
/// 置信度列名
pub const CONFIDENCE_COLUMN: &str = "confidence_score";

/// 表格处理器
pub struct TableProcessor {
    predictor: BatchPredictor,
    text_column: String,
}

impl TableProcessor {
    pub fn new(predictor: BatchPredictor, text_column: impl Into<String>) -> Self {
        Self {
            predictor,
            text_column: text_column.into(),
        }
    }

    /// 处理一张表
    ///
    /// 缺少文本列时返回 `TableError::MissingColumn`。
    pub async fn process(&self, table: Table) -> Result<Table, TableError> {
        let texts = table.column(&self.text_column)?;
        debug!("表格共 {} 行，开始分类", texts.len());

        let predictions = self.predictor.predict_all(texts).await;
        Ok(apply_predictions(table, &predictions))
    }
}

/// 把预测结果写回表格，并去掉未评分的行
///
/// `predictions` 必须与表格行一一对应。
pub fn apply_predictions(mut table: Table, predictions: &[Prediction]) -> Table {
    let labels = predictions
        .iter()
        .map(|p| p.label().unwrap_or_default().to_string())
        .collect();
    let confidences = predictions
        .iter()
        .map(|p| p.confidence().map(format_confidence).unwrap_or_default())
        .collect();

    table.set_column(LABEL_COLUMN, labels);
    table.set_column(CONFIDENCE_COLUMN, confidences);
    table.retain_rows(|i| predictions.get(i).is_some_and(|p| !p.is_absent()));
    table
}

/// 置信度的文本形式：最短可还原表示，整数也带小数点
pub fn format_confidence(confidence: f64) -> String {
    format!("{:?}", confidence)
}
