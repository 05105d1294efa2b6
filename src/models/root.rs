use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct RootDto<'a> {
    pub version: &'a str,
    pub name: &'a str,
    #[serde(rename = "_links")]
    pub _links: RootLinks<'a>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootLinks<'a> {
    pub pptx_create: &'a str,
    pub files: &'a str,
}
