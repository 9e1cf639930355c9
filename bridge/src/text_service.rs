//! Answers `textToSVG` requests, loading each font once.

use std::sync::Arc;

use glyphport_cache::{CacheBuilder, Completion, CompletionOutcome, LoadListener, Outcome, ResourceCache};
use glyphport_text::{validate_font_name, FontDirectory, FontError, TextToSvg};
use tokio::runtime::Handle;

use crate::error::Result;
use crate::messages::{Outbound, TextToSvgError, TextToSvgRequest, TextToSvgResponse};
use crate::ports::Outbox;

/// Fonts by name. Every name is loaded at most once while loads succeed.
pub type FontCache = ResourceCache<String, TextToSvg, FontError>;

/// Produces a renderer for a named font. Blocking.
pub trait FontSource: Send + Sync + 'static {
  fn open(&self, name: &str) -> Result<TextToSvg, FontError>;
}

impl FontSource for FontDirectory {
  fn open(&self, name: &str) -> Result<TextToSvg, FontError> {
    self.load(name).map(TextToSvg::new)
  }
}

/// Logs font load results from the cache's notifier thread.
struct FontLoadLog;

impl LoadListener<String, TextToSvg, FontError> for FontLoadLog {
  fn on_loaded(&self, font: String, _renderer: Arc<TextToSvg>) {
    tracing::info!(%font, "font loaded");
  }

  fn on_failed(&self, font: String, error: Arc<FontError>) {
    tracing::warn!(%font, error = %error, "font failed to load");
  }
}

/// Builds the font cache used by [`TextService`].
pub fn font_cache() -> Result<FontCache> {
  let cache = CacheBuilder::default().listener(FontLoadLog).build()?;
  Ok(cache)
}

pub struct TextService {
  cache: FontCache,
  source: Arc<dyn FontSource>,
  outbox: Outbox,
  runtime: Option<Handle>,
}

impl TextService {
  /// Fonts are read on `runtime`'s blocking pool, or on the requesting
  /// thread when no runtime is given.
  pub fn new(cache: FontCache, source: Arc<dyn FontSource>, outbox: Outbox, runtime: Option<Handle>) -> Self {
    Self {
      cache,
      source,
      outbox,
      runtime,
    }
  }

  pub fn cache(&self) -> &FontCache {
    &self.cache
  }

  /// Answers `request` on the outbound port with a `textToSVGResponse`, or a
  /// `textToSVGError` if its font cannot be loaded. The answer is sent from
  /// whichever thread completes the font load.
  pub fn handle(&self, request: TextToSvgRequest) {
    tracing::debug!(id = %request.id, font = %request.font, "textToSVG");
    // Malformed names never reach the cache, so they cannot pile up entries.
    if let Err(error) = validate_font_name(&request.font) {
      respond(&self.outbox, request, Err(Arc::new(error)));
      return;
    }
    let font = request.font.clone();
    let outbox = self.outbox.clone();

    self.cache.request(
      font,
      |name, completion| self.load(name, completion),
      move |outcome| respond(&outbox, request, outcome),
    );
  }

  fn load(&self, name: String, completion: Completion<String, TextToSvg, FontError>) {
    let source = self.source.clone();
    let cache = self.cache.clone();
    let job = move || {
      let result = source.open(&name);
      if let CompletionOutcome::Rejected = completion.complete(result) {
        tracing::debug!(font = %name, "stale font load ignored");
      }
      // Keeps the entry map, and with it the waiters, alive until the load
      // has reported.
      drop(cache);
    };

    match &self.runtime {
      Some(runtime) => {
        runtime.spawn_blocking(job);
      }
      None => job(),
    }
  }
}

fn respond(outbox: &Outbox, request: TextToSvgRequest, outcome: Outcome<TextToSvg, FontError>) {
  let message = match outcome {
    Ok(renderer) => {
      let rendered = renderer.render(&request.text, &request.options());
      Outbound::TextToSvgResponse(TextToSvgResponse::new(request, rendered))
    }
    Err(error) => Outbound::TextToSvgError(TextToSvgError {
      id: request.id,
      font: request.font,
      message: error.to_string(),
    }),
  };
  if let Err(e) = outbox.send(message) {
    tracing::warn!(error = %e, "textToSVG answer dropped");
  }
}

impl std::fmt::Debug for TextService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TextService")
      .field("cache", &self.cache)
      .field("has_runtime", &self.runtime.is_some())
      .finish_non_exhaustive()
  }
}
