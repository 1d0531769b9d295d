use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLabelRequest {
    pub photo_analysis_id: i64,
    #[validate(url(message = "imageUrl must be a valid URL"))]
    pub image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLabelResponse {
    pub success: bool,
    pub photo_analysis_id: i64,
    pub label: String,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case() {
        let request: PhotoLabelRequest = serde_json::from_str(
            r#"{"photoAnalysisId": 7, "imageUrl": "https://cdn.example.com/a.jpg"}"#,
        )
        .unwrap();

        assert_eq!(request.photo_analysis_id, 7);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn non_url_is_rejected() {
        let request = PhotoLabelRequest {
            photo_analysis_id: 7,
            image_url: "not a url".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
