//! Port message shapes.
//!
//! On the wire every message is `{"port": <name>, "payload": <object>}`.
//! Payload fields are camelCase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use glyphport_text::metrics::DEFAULT_FONT_SIZE;
use glyphport_text::{RenderedText, TextOptions};

/// Messages the application sends to the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum Inbound {
  #[serde(rename = "textToSVG")]
  TextToSvg(TextToSvgRequest),
  StorageGet(StorageKey),
  StorageSet(StorageEntry),
  StorageRemove(StorageKey),
  StorageClear,
  StorageKeys(KeyQuery),
}

impl Inbound {
  pub fn port(&self) -> &'static str {
    match self {
      Inbound::TextToSvg(_) => "textToSVG",
      Inbound::StorageGet(_) => "storageGet",
      Inbound::StorageSet(_) => "storageSet",
      Inbound::StorageRemove(_) => "storageRemove",
      Inbound::StorageClear => "storageClear",
      Inbound::StorageKeys(_) => "storageKeys",
    }
  }
}

/// Messages the bridge sends to the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum Outbound {
  #[serde(rename = "textToSVGResponse")]
  TextToSvgResponse(TextToSvgResponse),
  #[serde(rename = "textToSVGError")]
  TextToSvgError(TextToSvgError),
  Resize(ResizeEvent),
  StorageValue(StorageValue),
  StorageChanged(StorageValue),
  StorageCleared,
  StorageKeyList(KeyList),
}

impl Outbound {
  pub fn port(&self) -> &'static str {
    match self {
      Outbound::TextToSvgResponse(_) => "textToSVGResponse",
      Outbound::TextToSvgError(_) => "textToSVGError",
      Outbound::Resize(_) => "resize",
      Outbound::StorageValue(_) => "storageValue",
      Outbound::StorageChanged(_) => "storageChanged",
      Outbound::StorageCleared => "storageCleared",
      Outbound::StorageKeyList(_) => "storageKeyList",
    }
  }
}

// --- Text to SVG ---

fn default_font_size() -> f64 {
  DEFAULT_FONT_SIZE
}

fn default_kerning() -> bool {
  true
}

/// A `textToSVG` payload. Absent options take their defaults; the object is
/// kept as received so the response can echo it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct TextToSvgRequest {
  pub id: String,
  pub text: String,
  pub font: String,
  pub font_size: f64,
  pub kerning: bool,
  pub letter_spacing: f64,
  pub payload: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextToSvgFields {
  id: String,
  text: String,
  font: String,
  #[serde(default = "default_font_size")]
  font_size: f64,
  #[serde(default = "default_kerning")]
  kerning: bool,
  #[serde(default)]
  letter_spacing: f64,
}

impl TryFrom<Value> for TextToSvgRequest {
  type Error = serde_json::Error;

  fn try_from(payload: Value) -> Result<Self, Self::Error> {
    let fields = TextToSvgFields::deserialize(&payload)?;
    Ok(Self {
      id: fields.id,
      text: fields.text,
      font: fields.font,
      font_size: fields.font_size,
      kerning: fields.kerning,
      letter_spacing: fields.letter_spacing,
      payload,
    })
  }
}

impl From<TextToSvgRequest> for Value {
  fn from(request: TextToSvgRequest) -> Self {
    request.payload
  }
}

impl TextToSvgRequest {
  pub fn options(&self) -> TextOptions {
    TextOptions::default()
      .with_font_size(self.font_size)
      .with_kerning(self.kerning)
      .with_letter_spacing(self.letter_spacing)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToSvgResponse {
  pub id: String,
  pub x: f64,
  pub y: f64,
  pub baseline: f64,
  pub width: f64,
  pub height: f64,
  pub ascender: f64,
  pub descender: f64,
  pub path_data: String,
  /// The request payload this answers, as received.
  pub request: Value,
}

impl TextToSvgResponse {
  pub fn new(request: TextToSvgRequest, rendered: RenderedText) -> Self {
    let metrics = rendered.metrics;
    Self {
      id: request.id,
      x: metrics.x,
      y: metrics.y,
      baseline: metrics.baseline,
      width: metrics.width,
      height: metrics.height,
      ascender: metrics.ascender,
      descender: metrics.descender,
      path_data: rendered.path_data,
      request: request.payload,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToSvgError {
  pub id: String,
  pub font: String,
  pub message: String,
}

// --- Resize ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeEvent {
  pub id: String,
  pub height: u32,
  pub width: u32,
}

// --- Storage ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKey {
  pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
  pub key: String,
  pub value: Value,
}

/// A stored value; `null` when the key is absent or was removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageValue {
  pub key: String,
  pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyQuery {
  #[serde(default)]
  pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyList {
  pub prefix: String,
  pub keys: Vec<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  #[test]
  fn text_request_fills_defaults() {
    let message: Inbound = serde_json::from_value(json!({
      "port": "textToSVG",
      "payload": { "id": "t1", "text": "Hi", "font": "arial" }
    }))
    .unwrap();

    let request = match message {
      Inbound::TextToSvg(request) => request,
      other => panic!("wrong variant: {:?}", other),
    };
    assert_eq!(request.font_size, 72.0);
    assert!(request.kerning);
    assert_eq!(request.letter_spacing, 0.0);
  }

  #[test]
  fn text_request_keeps_the_payload_as_received() {
    let payload = json!({ "id": "t1", "text": "Hi", "font": "arial", "color": "red" });
    let request = TextToSvgRequest::try_from(payload.clone()).unwrap();
    assert_eq!(request.payload, payload);
    assert_eq!(serde_json::to_value(&request).unwrap(), payload);

    let missing_text = TextToSvgRequest::try_from(json!({ "id": "t2", "font": "arial" }));
    assert!(missing_text.is_err());
  }

  #[test]
  fn outbound_uses_port_names_and_camel_case() {
    let message = Outbound::TextToSvgError(TextToSvgError {
      id: "t1".into(),
      font: "nope".into(),
      message: "missing".into(),
    });
    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["port"], message.port());
    assert_eq!(value["payload"]["font"], "nope");

    let cleared = serde_json::to_value(Outbound::StorageCleared).unwrap();
    assert_eq!(cleared["port"], "storageCleared");
  }

  #[test]
  fn storage_clear_needs_no_payload() {
    let message: Inbound = serde_json::from_str(r#"{"port":"storageClear"}"#).unwrap();
    assert_eq!(message, Inbound::StorageClear);
  }
}
