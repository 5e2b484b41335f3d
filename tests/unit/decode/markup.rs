use super::*;

fn span(text: &str) -> Span {
    Span {
        text: text.to_string(),
        ..Span::default()
    }
}

#[test]
fn tags_only_where_style_changes() {
    let spans = vec![
        Span {
            font: Some("Arial".into()),
            size: Some(12),
            color: Some([0, 0, 0]),
            align: Some(Alignment::Center),
            ..span("Hello ")
        },
        Span {
            font: Some("Arial".into()),
            size: Some(18),
            color: Some([255, 0, 16]),
            align: Some(Alignment::Center),
            bold: true,
            ..span("World")
        },
    ];
    assert_eq!(
        render(&spans),
        "{{FONT-FAMILY:Arial}}{{FONT-SIZE:12}}{{COLOR:#000000}}{{ALIGN:center}}Hello \
         {{FONT-SIZE:18}}{{COLOR:#ff0010}}**World**"
    );
}

#[test]
fn emphasis_nests_in_fixed_order() {
    let s = Span {
        bold: true,
        italic: true,
        underline: true,
        strike: true,
        ..span("x")
    };
    assert_eq!(render(&[s]), "~~__***x***__~~");
}

#[test]
fn carriage_returns_become_newlines() {
    let spans = vec![span("one\rtwo\r\n"), span(""), span("three")];
    assert_eq!(render(&spans), "one\ntwo\nthree");
    assert_eq!(plain_text(&spans), "one\ntwo\nthree");
}
