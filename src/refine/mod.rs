//! Layout refinement passes.
//!
//! Every pass consumes a page's element list and returns the retained
//! elements without reordering them (background promotion excepted). The
//! passes are independent; [`crate::reconcile`] chains them in a fixed
//! order.

mod background;
mod decoration;
mod occlusion;
mod options;

pub use background::{promote_background_rects, remove_full_page_rects};
pub use decoration::{attach_decorations, classify, Decoration};
pub use occlusion::{
    image_bounds, remove_covered_lines, remove_covered_texts, remove_images_covered_by_portraits,
    remove_images_covering_texts, remove_items_covered_by_images,
};
pub use options::{ReconcileOptions, RefineOptions};
