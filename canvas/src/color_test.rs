use super::*;

#[test]
fn parses_named_colors_case_insensitively() {
    assert_eq!(parse_color("black").unwrap(), Rgba::BLACK);
    assert_eq!(parse_color("Blue").unwrap(), Rgba::rgb(0, 0, 255));
    assert_eq!(parse_color(" gray ").unwrap(), Rgba::rgb(128, 128, 128));
    assert_eq!(parse_color("grey").unwrap(), parse_color("gray").unwrap());
    assert_eq!(parse_color("transparent").unwrap(), Rgba::TRANSPARENT);
}

#[test]
fn parses_short_and_long_hex() {
    assert_eq!(parse_color("#fff").unwrap(), Rgba::WHITE);
    assert_eq!(parse_color("#1F1A17").unwrap(), Rgba::rgb(0x1f, 0x1a, 0x17));
    assert_eq!(parse_color("#11223344").unwrap(), Rgba::new(0x11, 0x22, 0x33, 0x44));
}

#[test]
fn parses_rgb_and_rgba_functions() {
    assert_eq!(parse_color("rgb(10, 20, 30)").unwrap(), Rgba::rgb(10, 20, 30));
    assert_eq!(parse_color("rgba(30, 144, 255, 0.5)").unwrap(), Rgba::new(30, 144, 255, 128));
}

#[test]
fn parses_hsl_and_extended_names() {
    assert_eq!(parse_color("hsl(120, 100%, 50%)").unwrap(), Rgba::rgb(0, 255, 0));
    assert_eq!(parse_color("rebeccapurple").unwrap(), Rgba::rgb(102, 51, 153));
    assert_eq!(parse_color("DodgerBlue").unwrap(), Rgba::rgb(30, 144, 255));
}

#[test]
fn rejects_garbage() {
    for raw in ["", "#12", "#ggg", "rgb(1, 2)", "not-a-color"] {
        let err = parse_color(raw).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidColor(ref s) if s == raw), "{raw}: {err}");
    }
}

#[test]
fn from_str_matches_parse_color() {
    let parsed: Rgba = "red".parse().unwrap();
    assert_eq!(parsed, Rgba::rgb(255, 0, 0));
}

#[test]
fn css_and_display_forms() {
    assert_eq!(Rgba::rgb(1, 2, 3).to_css(), "rgba(1, 2, 3, 1)");
    assert_eq!(Rgba::TRANSPARENT.to_css(), "rgba(0, 0, 0, 0)");
    assert_eq!(Rgba::new(0xab, 0xcd, 0xef, 0x01).to_string(), "#abcdef01");
}
