/// 文本检测服务客户端
///
/// 每条文本一次请求，失败统一折叠为空的 `Prediction`
use crate::config::Config;
use crate::error::ClassifyError;
use crate::models::{Prediction, Verdict};
use crate::utils::{EventSink, PipelineEvent};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 文本分类能力
///
/// 实现方不得 panic 或返回错误：任何失败都表现为 `Prediction::absent()`。
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Prediction;
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    data: [&'a str; 1],
}

/// 基于 HTTP 的检测服务客户端
pub struct DetectorClient {
    client: Client,
    endpoint_url: String,
    sink: Arc<dyn EventSink>,
}

impl DetectorClient {
    /// 创建新的客户端
    pub fn new(config: &Config, sink: Arc<dyn EventSink>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            sink,
        })
    }

    /// 发送一次分类请求并解析结果
    pub async fn try_classify(&self, text: &str) -> Result<Verdict, ClassifyError> {
        debug!("调用检测服务，文本长度: {} 字符", text.chars().count());

        let response = self
            .client
            .post(&self.endpoint_url)
            .json(&PredictRequest { data: [text] })
            .send()
            .await?;

        // 状态码本身不算失败，只看响应体里有没有可用的 data
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|source| ClassifyError::Decode { status, source })?;

        parse_verdict(&value, status)
    }
}

#[async_trait]
impl Classifier for DetectorClient {
    async fn classify(&self, text: &str) -> Prediction {
        match self.try_classify(text).await {
            Ok(verdict) => Prediction::scored(verdict.label, verdict.confidence),
            Err(e) => {
                self.sink.emit(PipelineEvent::ClassificationFailed {
                    text: text.to_string(),
                    error: e.to_string(),
                });
                Prediction::absent()
            }
        }
    }
}

/// 从 `{"data": [label, confidence, ...]}` 中提取结果
pub fn parse_verdict(value: &Value, status: u16) -> Result<Verdict, ClassifyError> {
    let data = value
        .get("data")
        .and_then(Value::as_array)
        .ok_or(ClassifyError::MissingPayload { status })?;

    if data.len() < 2 {
        return Err(ClassifyError::ShortPayload { len: data.len() });
    }

    let label = match &data[0] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let confidence = parse_confidence(&data[1])?;

    Ok(Verdict { label, confidence })
}

/// 把数字、数字字符串或布尔值转换为有限浮点数
fn parse_confidence(raw: &Value) -> Result<f64, ClassifyError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    parsed
        .filter(|c| c.is_finite())
        .ok_or_else(|| ClassifyError::InvalidConfidence {
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemorySink;
    use serde_json::json;

    fn client_for(url: String, sink: Arc<MemorySink>) -> DetectorClient {
        let config = Config {
            endpoint_url: url,
            request_timeout_secs: 5,
            ..Config::default()
        };
        DetectorClient::new(&config, sink).unwrap()
    }

    #[test]
    fn test_parse_verdict_number_and_string() {
        let v = parse_verdict(&json!({"data": ["ChatGPT", 0.93]}), 200).unwrap();
        assert_eq!(v.label, "ChatGPT");
        assert_eq!(v.confidence, 0.93);

        let v = parse_verdict(&json!({"data": ["Human", " 0.25 ", "extra"]}), 200).unwrap();
        assert_eq!(v.label, "Human");
        assert_eq!(v.confidence, 0.25);
    }

    #[test]
    fn test_parse_verdict_bool_confidence() {
        let v = parse_verdict(&json!({"data": ["Human", true]}), 200).unwrap();
        assert_eq!(v.confidence, 1.0);

        let v = parse_verdict(&json!({"data": ["ChatGPT", false]}), 200).unwrap();
        assert_eq!(v.confidence, 0.0);
    }

    #[test]
    fn test_parse_verdict_label_is_opaque() {
        let v = parse_verdict(&json!({"data": [1, "1"]}), 200).unwrap();
        assert_eq!(v.label, "1");
        assert_eq!(v.confidence, 1.0);
    }

    #[test]
    fn test_parse_verdict_failures() {
        assert!(matches!(
            parse_verdict(&json!({"error": "busy"}), 503),
            Err(ClassifyError::MissingPayload { status: 503 })
        ));
        assert!(matches!(
            parse_verdict(&json!({"data": ["Human"]}), 200),
            Err(ClassifyError::ShortPayload { len: 1 })
        ));
        assert!(matches!(
            parse_verdict(&json!({"data": ["Human", "high"]}), 200),
            Err(ClassifyError::InvalidConfidence { .. })
        ));
        assert!(matches!(
            parse_verdict(&json!({"data": ["Human", "NaN"]}), 200),
            Err(ClassifyError::InvalidConfidence { .. })
        ));
        assert!(matches!(
            parse_verdict(&json!({"data": ["Human", null]}), 200),
            Err(ClassifyError::InvalidConfidence { .. })
        ));
    }

    #[tokio::test]
    async fn test_classify_success_sends_text_as_sole_input() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/run/predict_en")
            .match_body(mockito::Matcher::Json(json!({"data": ["some post body"]})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": ["ChatGPT", 0.87], "duration": 0.1}"#)
            .create_async()
            .await;

        let sink = Arc::new(MemorySink::new());
        let client = client_for(format!("{}/run/predict_en", server.url()), sink.clone());

        let prediction = client.classify("some post body").await;
        assert_eq!(prediction.label(), Some("ChatGPT"));
        assert_eq!(prediction.confidence(), Some(0.87));
        assert!(sink.events().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_classify_malformed_body_is_absent() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/run/predict_en")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let sink = Arc::new(MemorySink::new());
        let client = client_for(format!("{}/run/predict_en", server.url()), sink.clone());

        let prediction = client.classify("text one").await;
        assert!(prediction.is_absent());

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            PipelineEvent::ClassificationFailed { text, error } => {
                assert_eq!(text, "text one");
                assert!(error.contains("200"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_classify_short_payload_and_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _short = server
            .mock("POST", "/short")
            .with_status(200)
            .with_body(r#"{"data": ["Human"]}"#)
            .create_async()
            .await;
        let _error = server
            .mock("POST", "/error")
            .with_status(500)
            .create_async()
            .await;

        let sink = Arc::new(MemorySink::new());
        let short = client_for(format!("{}/short", server.url()), sink.clone());
        let error = client_for(format!("{}/error", server.url()), sink.clone());

        assert!(short.classify("a").await.is_absent());
        assert!(error.classify("b").await.is_absent());
        assert_eq!(sink.events().len(), 2);
    }

    #[tokio::test]
    async fn test_classify_connection_refused_is_absent() {
        // 端口 1 上通常没有服务监听
        let sink = Arc::new(MemorySink::new());
        let client = client_for("http://127.0.0.1:1/run/predict_en".to_string(), sink.clone());

        let prediction = client.classify("unreachable").await;
        assert!(prediction.is_absent());
        assert!(matches!(
            sink.events().first(),
            Some(PipelineEvent::ClassificationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_classify_timeout_is_absent() {
        // 接受连接但从不回复
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                held.push(stream);
            }
        });

        let config = Config {
            endpoint_url: format!("http://{}/run/predict_en", addr),
            request_timeout_secs: 1,
            ..Config::default()
        };
        let sink = Arc::new(MemorySink::new());
        let client = DetectorClient::new(&config, sink.clone()).unwrap();

        let started = std::time::Instant::now();
        let prediction = client.classify("never answered").await;
        server.abort();

        assert!(prediction.is_absent());
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        match sink.events().as_slice() {
            [PipelineEvent::ClassificationFailed { text, .. }] => {
                assert_eq!(text, "never answered");
            }
            other => panic!("expected one ClassificationFailed, got {:?}", other),
        }
    }
}
