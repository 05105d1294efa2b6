//! Drives fetch and normalization per image reference and assembles the
//! final document. One broken image never aborts the deck, it becomes a
//! visible placeholder bullet instead.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::download::DownloadService;
use crate::error::{DeckError, ImageError, ValidationError};
use crate::models::{CreateDeckDto, ImageDto, SlideDto};
use crate::normalize;
use crate::persistence::FileStorage;
use crate::pptx::layout::{
    centered_left_in, emu, scale_to_fit, CAPTION_GAP_IN, CAPTION_HEIGHT_IN, EMU_PER_INCH,
    IMAGE_GAP_IN, IMAGE_TOP_IN,
};
use crate::pptx::{self, DeckDocument, DeckSlide, PlacedPicture, ThemeRegistry};
use crate::util::random::generate_30_alphanumeric;

const MAX_HEADING_CHARS: usize = 255;
const MAX_BULLET_CHARS: usize = 1000;
const MAX_CAPTION_CHARS: usize = 200;
const MAX_FOOTER_CHARS: usize = 120;

#[async_trait::async_trait]
pub trait DeckService: Send + Sync {
    /// Builds the package and stores it, returning the generated file name.
    async fn build_deck(&self, create_deck: CreateDeckDto) -> Result<String, DeckError>;
}

pub struct DeckServiceImpl {
    pub download_service: Arc<dyn DownloadService>,
    pub file_storage: Arc<dyn FileStorage>,
    pub themes: ThemeRegistry,
    pub fetch_timeout: Duration,
}

#[async_trait::async_trait]
impl DeckService for DeckServiceImpl {
    async fn build_deck(&self, create_deck: CreateDeckDto) -> Result<String, DeckError> {
        validate(&create_deck)?;
        info!("Starting deck build with {} slides", create_deck.slides.len());

        let client = reqwest::Client::builder().timeout(self.fetch_timeout).build().unwrap();

        let mut slides = Vec::with_capacity(create_deck.slides.len());
        for slide in &create_deck.slides {
            slides.push(self.build_slide(&client, slide).await);
        }

        let document = DeckDocument {
            title: create_deck.title,
            subtitle: create_deck.subtitle,
            footer: create_deck.footer.map(|footer| truncate_chars(&footer, MAX_FOOTER_CHARS)),
            theme: self.themes.resolve(create_deck.theme.as_deref()),
            slides,
        };

        let bytes = pptx::write_package(&document)?;
        let file_name = format!("{}.pptx", generate_30_alphanumeric());
        self.file_storage.store_result_file(&file_name, &bytes).await?;
        info!("Finished deck build as {}", &file_name);
        Ok(file_name)
    }
}

impl DeckServiceImpl {
    async fn build_slide(&self, client: &reqwest::Client, slide: &SlideDto) -> DeckSlide {
        let mut bullets: Vec<String> = slide
            .bullets
            .iter()
            .map(|bullet| truncate_chars(bullet, MAX_BULLET_CHARS))
            .collect();

        let mut pictures = Vec::with_capacity(slide.images.len());
        let mut cursor_in = IMAGE_TOP_IN;
        for image in &slide.images {
            match self.place_image(client, image, cursor_in).await {
                Ok(picture) => {
                    cursor_in += picture.height as f64 / EMU_PER_INCH + IMAGE_GAP_IN;
                    if picture.caption.is_some() {
                        cursor_in += CAPTION_GAP_IN + CAPTION_HEIGHT_IN;
                    }
                    pictures.push(picture);
                }
                Err(err) => {
                    warn!("Could not embed image '{}': {}", &image.url, &err);
                    bullets.push(format!("[Image failed: {} - {}]", &image.url, err));
                }
            }
        }

        DeckSlide {
            heading: truncate_chars(&slide.heading, MAX_HEADING_CHARS),
            bullets,
            pictures,
        }
    }

    async fn place_image(
        &self,
        client: &reqwest::Client,
        image: &ImageDto,
        top_in: f64,
    ) -> Result<PlacedPicture, ImageError> {
        let resource = self.download_service.download_image(client, &image.url).await?;
        let embeddable = normalize::normalize(resource)?;
        let (px_width, px_height) = normalize::dimensions(&embeddable.bytes).map_err(ImageError::Format)?;
        let (width_in, height_in) = scale_to_fit(px_width, px_height, image.width_inch, image.height_inch);

        Ok(PlacedPicture {
            image: embeddable,
            left: emu(centered_left_in(width_in)),
            top: emu(top_in),
            width: emu(width_in),
            height: emu(height_in),
            caption: image
                .caption
                .as_deref()
                .map(|caption| truncate_chars(caption, MAX_CAPTION_CHARS)),
        })
    }
}

/// URL syntax is the only thing checked up front; reachability is not.
fn validate(create_deck: &CreateDeckDto) -> Result<(), ValidationError> {
    for slide in &create_deck.slides {
        for image in &slide.images {
            let url = reqwest::Url::parse(&image.url).map_err(|err| ValidationError::InvalidUrl {
                url: image.url.clone(),
                reason: err.to_string(),
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ValidationError::InvalidUrl {
                    url: image.url.clone(),
                    reason: "scheme must be http or https".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
