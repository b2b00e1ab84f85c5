pub mod hover;

pub use hover::{pick_ball, HoverHighlighter};
