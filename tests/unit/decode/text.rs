use super::*;
use crate::io::writer::ByteWriter;

fn stxt(text: &str, runs: &[(u32, u8, u16, [u16; 3])]) -> Vec<u8> {
    let mut style = ByteWriter::big();
    style.write_u16(runs.len() as u16);
    for (start, bits, size, color) in runs {
        style.write_u32(*start);
        style.write_u16(16);
        style.write_u16(12);
        style.write_u16(3);
        style.write_u8(*bits);
        style.write_u8(0);
        style.write_u16(*size);
        for c in color {
            style.write_u16(*c);
        }
    }
    let style = style.into_bytes();

    let mut w = ByteWriter::big();
    w.write_u32(12);
    w.write_u32(text.len() as u32);
    w.write_u32(style.len() as u32);
    w.write_bytes(text.as_bytes());
    w.write_bytes(&style);
    w.into_bytes()
}

#[test]
fn plain_text_with_style_runs() {
    let bytes = stxt(
        "Hi\rthere",
        &[(0, 0x01, 12, [0xFFFF, 0, 0]), (3, 0, 12, [0, 0, 0])],
    );
    let doc = read_stxt(&bytes).unwrap();
    assert_eq!(doc.text, "Hi\rthere");
    assert_eq!(doc.runs.len(), 2);
    assert_eq!(doc.runs[0].font_id, 3);

    let rec = TextRecord::decode(5, Tag::STXT, bytes).unwrap();
    assert_eq!(rec.kind, TextKind::Stxt);
    assert_eq!(rec.plain, "Hi\nthere");
    assert_eq!(
        rec.markup,
        "{{FONT-SIZE:12}}{{COLOR:#ff0000}}**Hi\n**{{COLOR:#000000}}there"
    );
}

#[test]
fn text_without_runs_is_one_span() {
    let rec = TextRecord::decode(1, Tag::STXT, stxt("abc", &[])).unwrap();
    assert_eq!(rec.markup, "abc");
}

#[test]
fn leading_text_before_first_run_is_kept() {
    let doc = read_stxt(&stxt("abcdef", &[(2, 0x02, 10, [0, 0, 0])])).unwrap();
    let spans = doc.spans();
    assert_eq!(spans[0].text, "ab");
    assert_eq!(spans[1].text, "cdef");
    assert!(spans[1].italic);
}

#[test]
fn malformed_stxt_is_unknown() {
    let rec = TextRecord::decode(2, Tag::STXT, vec![0, 0, 0, 4, 0, 0]).unwrap();
    assert_eq!(rec.kind, TextKind::Unknown);
    assert!(rec.plain.is_empty());
    assert!(TextRecord::decode(2, Tag::BITD, vec![1]).is_none());
    assert!(TextRecord::decode(2, Tag::XMED, Vec::new()).is_none());
}

#[test]
fn styled_outranks_plain() {
    assert!(TextKind::Xmed.richness() > TextKind::Stxt.richness());
    assert!(TextKind::Stxt.richness() > TextKind::Unknown.richness());
}

#[test]
fn decoding_is_repeatable() {
    let stxt_bytes = stxt("Hi\rthere", &[(0, 0x01, 12, [0xFFFF, 0, 0])]);
    assert_eq!(
        TextRecord::decode(5, Tag::STXT, stxt_bytes.clone()),
        TextRecord::decode(5, Tag::STXT, stxt_bytes)
    );

    let mut xmed = vec![0u8; 0x50];
    xmed.extend_from_slice(b"40,\x05Arial\05,Hello\0");
    let first = TextRecord::decode(6, Tag::XMED, xmed.clone()).unwrap();
    assert_eq!(first.kind, TextKind::Xmed);
    assert_eq!(Some(first), TextRecord::decode(6, Tag::XMED, xmed));
}
