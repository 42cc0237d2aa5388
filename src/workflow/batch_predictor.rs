//! 批量预测 - 流程层
//!
//! 把一张表的所有文本交给分类器，限制同时进行的请求数，
//! 并按输入顺序返回结果。
//!
//! 流程：
//! 1. 每条文本一个任务，任务携带自己的行号
//! 2. 任务先拿信号量许可，再调用分类器
//! 3. 按完成顺序收集结果，写入预先分配好的槽位
//! 4. 任务异常结束时该槽位保持为空结果，其余任务不受影响

use crate::clients::Classifier;
use crate::models::Prediction;
use crate::utils::{EventSink, PipelineEvent};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// 批量预测器
pub struct BatchPredictor {
    classifier: Arc<dyn Classifier>,
    max_concurrent: usize,
    sink: Arc<dyn EventSink>,
}

impl BatchPredictor {
    /// 创建批量预测器，`max_concurrent` 至少为 1
    pub fn new(
        classifier: Arc<dyn Classifier>,
        max_concurrent: usize,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            classifier,
            max_concurrent: max_concurrent.max(1),
            sink,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// 对所有文本进行分类
    ///
    /// 返回值与 `texts` 等长，第 i 个结果对应第 i 条文本。
    /// 不支持中途取消，所有请求都会跑完或各自超时。
    pub async fn predict_all(&self, texts: Vec<String>) -> Vec<Prediction> {
        let total = texts.len();
        debug!("开始批量分类: {} 条文本, 并发上限 {}", total, self.max_concurrent);

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut pending = FuturesUnordered::new();

        for (index, text) in texts.into_iter().enumerate() {
            let classifier = Arc::clone(&self.classifier);
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| e.to_string())?;
                Ok::<_, String>(classifier.classify(&text).await)
            });

            pending.push(async move { (index, handle.await) });
        }

        let mut slots = vec![Prediction::absent(); total];
        let mut completed = 0;

        while let Some((index, joined)) = pending.next().await {
            let failure = match joined {
                Ok(Ok(prediction)) => {
                    slots[index] = prediction;
                    None
                }
                Ok(Err(e)) => Some(e),
                Err(e) => Some(e.to_string()),
            };

            if let Some(error) = failure {
                self.sink.emit(PipelineEvent::WorkerFailed { index, error });
            }

            completed += 1;
            self.sink.emit(PipelineEvent::Progress { completed, total });
        }

        slots
    }
}
