use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ========================================
/// Collaborator request/response bodies
/// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub prompt: String,
    pub is_edit: bool,
    pub image_base64: Option<String>,
    pub n: u32,
    pub aspect: String,
}

impl DesignRequest {
    /// Copy suitable for logs: the image payload is replaced by its length.
    pub fn redacted(&self) -> Value {
        let mut v = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Some(b64) = &self.image_base64 {
            v["imageBase64"] = Value::String(format!("<{} base64 chars>", b64.len()));
        }
        v
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignResponse {
    #[serde(default)]
    pub data: Vec<DesignImage>,
}

impl DesignResponse {
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|d| d.url.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRequest {
    pub image_url: String,
    pub tier: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreakdownResponse {
    #[serde(default)]
    pub breakdown: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopViewRequest {
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopViewResponse {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Nested { message: String },
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: ErrorField,
}

/// Best-effort detail from a failed response body.
///
/// Tries `{"error": "..."}` and `{"error": {"message": "..."}}`, then the raw
/// text, then a placeholder.
pub fn error_detail(status: u16, body: &str) -> String {
    if let Ok(p) = serde_json::from_str::<ErrorPayload>(body) {
        let msg = match p.error {
            ErrorField::Text(t) => t,
            ErrorField::Nested { message } => message,
        };
        if !msg.trim().is_empty() {
            return msg;
        }
        return format!("HTTP {status}");
    }
    let raw = body.trim();
    if raw.is_empty() {
        "(no details)".to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn design_request_uses_camel_case_and_null_image() {
        let req = DesignRequest {
            prompt: "p".into(),
            is_edit: false,
            image_base64: None,
            n: 1,
            aspect: "16:9".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"prompt": "p", "isEdit": false, "imageBase64": null, "n": 1, "aspect": "16:9"})
        );
    }

    #[test]
    fn redacted_hides_image_body() {
        let req = DesignRequest {
            prompt: "p".into(),
            is_edit: true,
            image_base64: Some("QUJD".into()),
            n: 1,
            aspect: "16:9".into(),
        };
        assert_eq!(req.redacted()["imageBase64"], json!("<4 base64 chars>"));
    }

    #[test]
    fn first_url_skips_blank() {
        let r: DesignResponse = serde_json::from_str(r#"{"data":[{"url":"  "}]}"#).unwrap();
        assert_eq!(r.first_url(), None);
        let r: DesignResponse = serde_json::from_str(r#"{"data":[{"url":"X"}]}"#).unwrap();
        assert_eq!(r.first_url(), Some("X"));
        let r: DesignResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r.first_url(), None);
    }

    #[test]
    fn error_detail_prefers_structured_payload() {
        assert_eq!(error_detail(500, r#"{"error":"Model not found"}"#), "Model not found");
        assert_eq!(error_detail(400, r#"{"error":{"message":"invalid argument: x"}}"#), "invalid argument: x");
        assert_eq!(error_detail(502, r#"{"error":""}"#), "HTTP 502");
        assert_eq!(error_detail(502, "bad gateway"), "bad gateway");
        assert_eq!(error_detail(502, ""), "(no details)");
    }
}
