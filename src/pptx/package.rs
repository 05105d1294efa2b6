//! Writes the OOXML presentation package: a ZIP of XML parts plus the
//! embedded media. Slides are plain positioned text boxes and pictures, no
//! placeholder inheritance from the layout.

use std::io::{Cursor, Seek, Write};

use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;
use zip::{write::FileOptions, ZipWriter};

use crate::consts::NAME;
use crate::error::PackageError;

use super::layout::{emu, CAPTION_GAP_IN, CAPTION_HEIGHT_IN};
use super::{DeckDocument, DeckSlide, PlacedPicture, Theme};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PRESENTATION_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const DOC_REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const EMPTY_GROUP: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

// Slide canvas is 10 x 7.5 in, see layout.rs.
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 6_858_000;

pub fn write_package(document: &DeckDocument) -> Result<Vec<u8>, PackageError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let slide_count = document.slides.len() + 1;

    write_part(&mut zip, "[Content_Types].xml", &content_types(slide_count))?;
    write_part(&mut zip, "_rels/.rels", &package_rels())?;
    write_part(&mut zip, "docProps/core.xml", &core_properties(&document.title))?;
    write_part(&mut zip, "ppt/presentation.xml", &presentation(slide_count))?;
    write_part(&mut zip, "ppt/_rels/presentation.xml.rels", &presentation_rels(slide_count))?;
    write_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", &slide_master())?;
    write_part(&mut zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", &slide_master_rels())?;
    write_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &slide_layout())?;
    write_part(&mut zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", &slide_layout_rels())?;
    write_part(&mut zip, "ppt/theme/theme1.xml", &theme_part(&document.theme))?;

    write_part(&mut zip, "ppt/slides/slide1.xml", &title_slide(document))?;
    write_part(&mut zip, "ppt/slides/_rels/slide1.xml.rels", &slide_rels(&[]))?;

    let mut media_index = 0usize;
    for (index, slide) in document.slides.iter().enumerate() {
        let slide_number = index + 2;
        let mut media = Vec::with_capacity(slide.pictures.len());
        for picture in &slide.pictures {
            media_index += 1;
            media.push(format!("image{}.{}", media_index, picture.image.format.extension()));
        }

        write_part(
            &mut zip,
            &format!("ppt/slides/slide{}.xml", slide_number),
            &content_slide(document, slide),
        )?;
        write_part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", slide_number),
            &slide_rels(&media),
        )?;
        for (file_name, picture) in media.iter().zip(&slide.pictures) {
            zip.start_file(format!("ppt/media/{}", file_name), FileOptions::default())?;
            zip.write_all(&picture.image.bytes)?;
        }
    }

    Ok(zip.finish()?.into_inner())
}

fn write_part<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, content: &str) -> Result<(), PackageError> {
    zip.start_file(name, FileOptions::default())?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn content_types(slide_count: usize) -> String {
    let mut overrides = String::new();
    for number in 1..=slide_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{number}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    format!(
        r#"{XML_DECL}<Types xmlns="{CONTENT_TYPES_NS}"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/><Default Extension="gif" ContentType="image/gif"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>{overrides}</Types>"#
    )
}

fn package_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{DOC_REL_NS}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="{PKG_REL_NS}/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#
    )
}

fn core_properties(title: &str) -> String {
    let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"{XML_DECL}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>{NAME}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified></cp:coreProperties>"#,
        escape(title)
    )
}

fn presentation(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for index in 0..slide_count {
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + index,
            2 + index
        ));
    }
    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{DRAWING_NS}" xmlns:r="{DOC_REL_NS}" xmlns:p="{PRESENTATION_NS}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{SLIDE_CX}" cy="{SLIDE_CY}" type="screen4x3"/><p:notesSz cx="{SLIDE_CY}" cy="{SLIDE_CX}"/></p:presentation>"#
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let mut relationships = format!(
        r#"<Relationship Id="rId1" Type="{DOC_REL_NS}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#
    );
    for index in 0..slide_count {
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{DOC_REL_NS}/slide" Target="slides/slide{}.xml"/>"#,
            2 + index,
            1 + index
        ));
    }
    format!(r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}">{relationships}</Relationships>"#)
}

fn slide_master() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster xmlns:a="{DRAWING_NS}" xmlns:r="{DOC_REL_NS}" xmlns:p="{PRESENTATION_NS}"><p:cSld><p:bg><p:bgPr><a:solidFill><a:schemeClr val="bg1"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>{EMPTY_GROUP}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_master_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{DOC_REL_NS}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{DOC_REL_NS}/theme" Target="../theme/theme1.xml"/></Relationships>"#
    )
}

fn slide_layout() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout xmlns:a="{DRAWING_NS}" xmlns:r="{DOC_REL_NS}" xmlns:p="{PRESENTATION_NS}" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_GROUP}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn slide_layout_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{DOC_REL_NS}/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#
    )
}

fn theme_part(theme: &Theme) -> String {
    let name = theme.name;
    let accent = theme.accent;
    format!(
        r#"{XML_DECL}<a:theme xmlns:a="{DRAWING_NS}" name="{name}"><a:themeElements><a:clrScheme name="{name}"><a:dk1><a:srgbClr val="{body}"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="{heading}"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="{accent}"/></a:accent1><a:accent2><a:srgbClr val="{accent}"/></a:accent2><a:accent3><a:srgbClr val="{accent}"/></a:accent3><a:accent4><a:srgbClr val="{accent}"/></a:accent4><a:accent5><a:srgbClr val="{accent}"/></a:accent5><a:accent6><a:srgbClr val="{accent}"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="{name}"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#,
        body = theme.body,
        heading = theme.heading,
    )
}

fn slide_rels(media: &[String]) -> String {
    let mut relationships = format!(
        r#"<Relationship Id="rId1" Type="{DOC_REL_NS}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#
    );
    for (index, file_name) in media.iter().enumerate() {
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{DOC_REL_NS}/image" Target="../media/{}"/>"#,
            2 + index,
            file_name
        ));
    }
    format!(r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}">{relationships}</Relationships>"#)
}

fn slide_part(shapes: &str) -> String {
    format!(
        r#"{XML_DECL}<p:sld xmlns:a="{DRAWING_NS}" xmlns:r="{DOC_REL_NS}" xmlns:p="{PRESENTATION_NS}"><p:cSld><p:spTree>{EMPTY_GROUP}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn title_slide(document: &DeckDocument) -> String {
    let mut shapes = String::new();
    let mut shape_id = 2usize;

    shapes.push_str(&text_box(
        shape_id,
        "Title",
        emu(0.5),
        emu(2.0),
        emu(9.0),
        emu(1.25),
        &paragraph(&document.title, 4400, true, document.theme.heading, true, false),
    ));
    shape_id += 1;

    if let Some(subtitle) = &document.subtitle {
        shapes.push_str(&text_box(
            shape_id,
            "Subtitle",
            emu(0.5),
            emu(3.4),
            emu(9.0),
            emu(1.0),
            &paragraph(subtitle, 2400, false, document.theme.body, true, false),
        ));
        shape_id += 1;
    }

    push_footer(&mut shapes, &mut shape_id, document);
    slide_part(&shapes)
}

fn content_slide(document: &DeckDocument, slide: &DeckSlide) -> String {
    let mut shapes = String::new();
    let mut shape_id = 2usize;

    shapes.push_str(&text_box(
        shape_id,
        "Heading",
        emu(0.5),
        emu(0.3),
        emu(9.0),
        emu(1.0),
        &paragraph(&slide.heading, 3200, true, document.theme.heading, false, false),
    ));
    shape_id += 1;

    if !slide.bullets.is_empty() {
        let paragraphs: String = slide
            .bullets
            .iter()
            .map(|bullet| paragraph(bullet, 1800, false, document.theme.body, false, true))
            .collect();
        shapes.push_str(&text_box(shape_id, "Body", emu(0.5), emu(1.5), emu(9.0), emu(5.2), &paragraphs));
        shape_id += 1;
    }

    for (index, placed) in slide.pictures.iter().enumerate() {
        shapes.push_str(&picture(shape_id, 2 + index, placed));
        shape_id += 1;
        if let Some(caption) = &placed.caption {
            shapes.push_str(&text_box(
                shape_id,
                "Caption",
                placed.left,
                placed.top + placed.height + emu(CAPTION_GAP_IN),
                placed.width,
                emu(CAPTION_HEIGHT_IN),
                &paragraph(caption, 1200, false, document.theme.body, true, false),
            ));
            shape_id += 1;
        }
    }

    push_footer(&mut shapes, &mut shape_id, document);
    slide_part(&shapes)
}

fn push_footer(shapes: &mut String, shape_id: &mut usize, document: &DeckDocument) {
    if let Some(footer) = &document.footer {
        shapes.push_str(&text_box(
            *shape_id,
            "Footer",
            emu(0.5),
            emu(6.8),
            emu(9.0),
            emu(0.3),
            &paragraph(footer, 1000, false, document.theme.body, false, false),
        ));
        *shape_id += 1;
    }
}

fn text_box(id: usize, name: &str, x: i64, y: i64, cx: i64, cy: i64, paragraphs: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
    )
}

/// `size` is in hundredths of a point, the unit the format uses.
fn paragraph(text: &str, size: u32, bold: bool, color: &str, centered: bool, bullet: bool) -> String {
    let properties = if centered {
        r#"<a:pPr algn="ctr"/>"#
    } else if bullet {
        r#"<a:pPr><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/></a:pPr>"#
    } else {
        ""
    };
    let bold_attr = if bold { r#" b="1""# } else { "" };
    format!(
        r#"<a:p>{properties}<a:r><a:rPr lang="en-US" sz="{size}"{bold_attr} dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
        escape(text)
    )
}

fn picture(id: usize, relationship: usize, placed: &PlacedPicture) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId{relationship}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        placed.left, placed.top, placed.width, placed.height
    )
}
