//! Document model types.
//!
//! Elements arrive from independent extractors, are filtered and annotated
//! by the refinement passes, and are finally serialized page by page.

mod element;
mod font;
mod page;
mod resource;
mod style;

pub use element::{
    Element, ElementKind, ImageElement, LineElement, PathElement, RectElement, TextElement,
};
pub use font::{EmbeddedFont, FontStyle};
pub use page::{Page, PageImages, PageSize, PageStream};
pub use resource::{ImageAsset, ImageOrigin, PageImageAssets};
pub use style::{hex_color, FillRule, FontWeight, LineCap, LineJoin};
