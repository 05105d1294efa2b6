use serde::{Deserialize, Serialize};

// Field names are the wire contract, snake_case as the clients send them.

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeckDto {
    pub title: String,
    pub subtitle: Option<String>,
    pub slides: Vec<SlideDto>,
    pub footer: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlideDto {
    pub heading: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageDto>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageDto {
    pub url: String,
    pub width_inch: Option<f64>,
    pub height_inch: Option<f64>,
    pub caption: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeckResultDto {
    pub download_url: String,
    pub file_name: String,
}
