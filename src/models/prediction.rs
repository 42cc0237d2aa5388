//! 分类结果

/// 一次成功的分类
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// 服务返回的标签，原样保留
    pub label: String,
    /// 置信度，保证是有限浮点数
    pub confidence: f64,
}

/// 单条文本的分类结果
///
/// 标签和置信度要么同时存在，要么同时缺失。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prediction {
    verdict: Option<Verdict>,
}

impl Prediction {
    /// 成功的分类结果；非有限的置信度视为失败
    pub fn scored(label: impl Into<String>, confidence: f64) -> Self {
        if !confidence.is_finite() {
            return Self::absent();
        }
        Self {
            verdict: Some(Verdict {
                label: label.into(),
                confidence,
            }),
        }
    }

    /// 失败的分类结果
    pub fn absent() -> Self {
        Self { verdict: None }
    }

    pub fn label(&self) -> Option<&str> {
        self.verdict.as_ref().map(|v| v.label.as_str())
    }

    pub fn confidence(&self) -> Option<f64> {
        self.verdict.as_ref().map(|v| v.confidence)
    }

    pub fn is_absent(&self) -> bool {
        self.verdict.is_none()
    }
}
