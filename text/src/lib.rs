//! Text to SVG path conversion.
//!
//! A [`Font`] wraps `ttf-parser`; layout and path generation only see the
//! [`Typeface`] trait, so any glyph source can be rendered. [`TextToSvg`]
//! computes placement metrics and SVG path data for a run of text.

pub mod error;
pub mod font;
pub mod layout;
pub mod metrics;
pub mod outline;
pub mod path;
pub mod render;
pub mod source;

pub use error::FontError;
pub use font::{Font, Typeface};
pub use metrics::{Anchor, HorizontalAnchor, TextMetrics, TextOptions, VerticalAnchor};
pub use outline::OutlineSink;
pub use path::PathData;
pub use render::{RenderedText, TextToSvg};
pub use source::{validate_font_name, FontDirectory};
