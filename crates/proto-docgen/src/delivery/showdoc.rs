use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{ArtifactSink, DeliveryError, UploadArtifact};

pub const DEFAULT_SHOWDOC_ENDPOINT: &str = "https://www.showdoc.com.cn/server/api/item/updateByApi";

/// Uploads pages through the ShowDoc open API.
#[derive(Debug, Clone)]
pub struct ShowDocSink {
  client: reqwest::Client,
  endpoint: String,
  api_key: String,
  api_token: String,
}

#[derive(Debug, Serialize)]
struct PagePayload<'a> {
  api_key: &'a str,
  api_token: &'a str,
  cat_name: &'a str,
  page_title: &'a str,
  page_content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ShowDocReply {
  error_code: i64,
  #[serde(default)]
  error_message: Option<String>,
}

impl ShowDocReply {
  fn into_result(self, title: &str) -> Result<(), DeliveryError> {
    if self.error_code == 0 {
      return Ok(());
    }
    Err(DeliveryError::Rejected {
      title: title.to_string(),
      code: self.error_code,
      message: self.error_message.unwrap_or_default(),
    })
  }
}

impl ShowDocSink {
  pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, api_token: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      endpoint: endpoint.into(),
      api_key: api_key.into(),
      api_token: api_token.into(),
    }
  }
}

impl ArtifactSink for ShowDocSink {
  fn destination(&self) -> String {
    self.endpoint.clone()
  }

  async fn deliver(&self, artifact: &UploadArtifact) -> Result<(), DeliveryError> {
    let title = artifact.title.as_str();
    let http_error = |source| DeliveryError::Http {
      title: title.to_string(),
      source,
    };

    let payload = PagePayload {
      api_key: &self.api_key,
      api_token: &self.api_token,
      cat_name: &artifact.category,
      page_title: title,
      page_content: &artifact.content,
    };

    let response = self
      .client
      .post(&self.endpoint)
      .form(&payload)
      .send()
      .await
      .map_err(http_error)?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      return Err(DeliveryError::Unauthorized {
        status: status.as_u16(),
      });
    }

    let reply = response
      .error_for_status()
      .map_err(http_error)?
      .json::<ShowDocReply>()
      .await
      .map_err(http_error)?;

    reply.into_result(title)
  }
}
