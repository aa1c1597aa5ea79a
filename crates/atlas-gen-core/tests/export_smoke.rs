use atlas_gen_core::prelude::*;
use atlas_gen_core::{render, sprite_name, to_csv, to_css, to_json, to_xml};

fn atlas() -> Atlas<String> {
    let items = vec![
        ("icons/Home.png".to_string(), 10, 10),
        ("icons/Search Icon.png".to_string(), 10, 10),
    ];
    pack_layout(items, AtlasConfig::default()).expect("pack")
}

#[test]
fn sprite_names_come_from_file_stems() {
    assert_eq!(sprite_name("icons/Home.png"), "home");
    assert_eq!(sprite_name("Search Icon.jpg"), "search-icon");
    assert_eq!(sprite_name("plain"), "plain");
}

#[test]
fn css_has_group_rule_and_per_sprite_rules() {
    let css = to_css(&atlas(), "ui", "ui.png");
    assert!(css.starts_with(".ui-home,\n.ui-search-icon {\n"));
    assert!(css.contains("\tbackground-image: url('ui.png');\n"));
    assert!(css.contains("\tbackground-repeat: no-repeat;\n"));
    assert!(css.contains(
        ".ui-search-icon {\n\twidth: 10px;\n\theight: 10px;\n\tbackground-position: -10px -0px;\n}"
    ));
}

#[test]
fn json_lists_sprites_with_positions() {
    let v = to_json(&atlas(), "ui.png");
    assert_eq!(v["image"], "ui.png");
    assert_eq!(v["width"], 20);
    assert_eq!(v["height"], 20);
    let sprites = v["sprites"].as_array().expect("array");
    assert_eq!(sprites.len(), 2);
    assert_eq!(sprites[1]["name"], "search-icon");
    assert_eq!(sprites[1]["x"], 10);
    assert_eq!(sprites[1]["y"], 0);
    assert!(v["meta"].is_object());
}

#[test]
fn xml_and_csv_render_every_sprite() {
    let a = atlas();
    let xml = to_xml(&a, "ui.png");
    assert!(xml.contains("<atlas image=\"ui.png\" width=\"20\" height=\"20\">"));
    assert!(xml.contains("<sprite name=\"home\" key=\"icons/Home.png\" x=\"0\" y=\"0\" w=\"10\" h=\"10\"/>"));
    assert!(xml.trim_end().ends_with("</atlas>"));

    let csv = to_csv(&a);
    assert_eq!(
        csv,
        "name,x,y,width,height\nhome,0,0,10,10\nsearch-icon,10,0,10,10\n"
    );
}

#[test]
fn special_characters_are_escaped() {
    let items = vec![("a&b.png".to_string(), 4, 4), ("x,y.png".to_string(), 4, 4)];
    let a = pack_layout(items, AtlasConfig::default()).expect("pack");
    let xml = to_xml(&a, "s.png");
    assert!(xml.contains("name=\"a&amp;b\""));
    let csv = to_csv(&a);
    assert!(csv.contains("\"x,y\","));
}

#[test]
fn formats_parse_and_dispatch() {
    assert_eq!("CSS".parse::<ExportFormat>(), Ok(ExportFormat::Css));
    assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
    assert!("yaml".parse::<ExportFormat>().is_err());
    assert_eq!(ExportFormat::Xml.extension(), "xml");

    let a = atlas();
    let json = render(ExportFormat::Json, &a, "ui", "ui.png");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(parsed["sprites"][0]["name"], "home");
    assert_eq!(render(ExportFormat::Csv, &a, "ui", "ui.png"), to_csv(&a));
}
