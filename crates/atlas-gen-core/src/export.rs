use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use serde_json::{Value, json};

use crate::model::Atlas;

/// Metadata formats the exporters can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Css,
    Json,
    Xml,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "css" => Ok(Self::Css),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "csv" => Ok(Self::Csv),
            _ => Err(()),
        }
    }
}

/// Sprite name for a key: lowercased file stem with whitespace turned into `-`.
/// `"icons/Team Lead.png"` becomes `"team-lead"`.
pub fn sprite_name(key: &str) -> String {
    let stem = Path::new(key)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(key);
    stem.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Renders `atlas` in `format`. `prefix` is only used by CSS class names.
pub fn render<K: ToString>(
    format: ExportFormat,
    atlas: &Atlas<K>,
    prefix: &str,
    image_name: &str,
) -> String {
    match format {
        ExportFormat::Css => to_css(atlas, prefix, image_name),
        ExportFormat::Json => {
            // Value serialization cannot fail.
            serde_json::to_string_pretty(&to_json(atlas, image_name)).unwrap_or_default()
        }
        ExportFormat::Xml => to_xml(atlas, image_name),
        ExportFormat::Csv => to_csv(atlas),
    }
}

/// CSS sprite sheet: one grouped rule carrying the background image, then one rule per sprite
/// with its size and a negative `background-position` pointing at its content.
pub fn to_css<K: ToString>(atlas: &Atlas<K>, prefix: &str, image_name: &str) -> String {
    let classes: Vec<String> = atlas
        .placements
        .iter()
        .map(|p| format!(".{}-{}", prefix, sprite_name(&p.key.to_string())))
        .collect();
    let mut s = String::new();
    s.push_str(&classes.join(",\n"));
    s.push_str(" {\n");
    let _ = writeln!(s, "\tbackground-image: url('{}');", image_name);
    s.push_str("\tbackground-repeat: no-repeat;\n}\n");
    for (class, p) in classes.iter().zip(&atlas.placements) {
        let _ = write!(
            s,
            "\n{} {{\n\twidth: {}px;\n\theight: {}px;\n\tbackground-position: -{}px -{}px;\n}}\n",
            class, p.w, p.h, p.x, p.y
        );
    }
    s
}

/// JSON object `{ image, width, height, sprites, meta }`.
pub fn to_json<K: ToString>(atlas: &Atlas<K>, image_name: &str) -> Value {
    let sprites: Vec<Value> = atlas
        .placements
        .iter()
        .map(|p| {
            let key = p.key.to_string();
            json!({
                "name": sprite_name(&key),
                "key": key,
                "x": p.x,
                "y": p.y,
                "w": p.w,
                "h": p.h,
                "margin": {"x": p.margin.x, "y": p.margin.y},
            })
        })
        .collect();
    json!({
        "image": image_name,
        "width": atlas.width,
        "height": atlas.height,
        "sprites": sprites,
        "meta": &atlas.meta,
    })
}

/// Flat XML document with one `<sprite>` element per placement.
pub fn to_xml<K: ToString>(atlas: &Atlas<K>, image_name: &str) -> String {
    let mut s = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        s,
        "<atlas image=\"{}\" width=\"{}\" height=\"{}\">",
        xml_escape(image_name),
        atlas.width,
        atlas.height
    );
    for p in &atlas.placements {
        let key = p.key.to_string();
        let _ = writeln!(
            s,
            "  <sprite name=\"{}\" key=\"{}\" x=\"{}\" y=\"{}\" w=\"{}\" h=\"{}\"/>",
            xml_escape(&sprite_name(&key)),
            xml_escape(&key),
            p.x,
            p.y,
            p.w,
            p.h
        );
    }
    s.push_str("</atlas>\n");
    s
}

/// CSV with header `name,x,y,width,height`.
pub fn to_csv<K: ToString>(atlas: &Atlas<K>) -> String {
    let mut s = String::from("name,x,y,width,height\n");
    for p in &atlas.placements {
        let _ = writeln!(
            s,
            "{},{},{},{},{}",
            csv_field(&sprite_name(&p.key.to_string())),
            p.x,
            p.y,
            p.w,
            p.h
        );
    }
    s
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
