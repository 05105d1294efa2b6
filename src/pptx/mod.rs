pub mod layout;

mod package;
pub use package::*;

mod theme;
pub use theme::*;

use crate::normalize::EmbeddableImage;

/// Fully resolved deck: every image already fetched, normalized and placed.
/// This is the input to the package writer, nothing in here can fail anymore.
#[derive(Debug)]
pub struct DeckDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub footer: Option<String>,
    pub theme: Theme,
    pub slides: Vec<DeckSlide>,
}

#[derive(Debug)]
pub struct DeckSlide {
    pub heading: String,
    /// Bullet lines, including the placeholder lines for failed images.
    pub bullets: Vec<String>,
    pub pictures: Vec<PlacedPicture>,
}

/// A normalized image with its final position on the slide, in EMU.
#[derive(Debug)]
pub struct PlacedPicture {
    pub image: EmbeddableImage,
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
    pub caption: Option<String>,
}
