use super::*;
use crate::decode::markup::render;

fn header() -> Vec<u8> {
    let mut data = vec![0u8; 0x50];
    data[OFF_WIDTH..OFF_WIDTH + 4].copy_from_slice(&200u32.to_le_bytes());
    data[OFF_STYLE] = 0x01;
    data[OFF_ALIGN] = 0x02;
    data[OFF_LINE_SPACING..OFF_LINE_SPACING + 4].copy_from_slice(&14u32.to_le_bytes());
    data[OFF_FONT_SIZE..OFF_FONT_SIZE + 2].copy_from_slice(b"c0");
    data[OFF_TEXT_LENGTH..OFF_TEXT_LENGTH + 4].copy_from_slice(&11u32.to_le_bytes());
    data
}

#[test]
fn header_fields_and_font_declarations() {
    let mut data = header();
    data.extend_from_slice(b"40,\x05Arial\0");
    data.extend_from_slice(b"5,Hello\0");
    data.extend_from_slice(b"6, World\x03");

    let doc = read_xmed(&data);
    assert_eq!(doc.width, 200);
    assert_eq!(doc.line_spacing, 14);
    assert_eq!(doc.text_length, 11);
    assert_eq!(doc.styles[0].font_size, 12);
    assert!(doc.styles[0].flags.bold);
    assert_eq!(doc.alignment(), Alignment::Left);

    assert_eq!(doc.text, "Hello World");
    assert_eq!(doc.runs.len(), 2);
    assert_eq!(doc.runs[1].start, 5);
    assert_eq!(doc.runs[0].font_name, "Arial");
    assert_eq!(doc.runs[0].color_index, Some(5));
    assert_eq!(doc.runs[0].font_size, 12);
    assert!(!doc.runs[0].flags.bold);

    assert_eq!(
        render(&doc.spans()),
        "{{FONT-FAMILY:Arial}}{{FONT-SIZE:12}}{{COLOR:#050505}}{{ALIGN:left}}Hello World"
    );
}

#[test]
fn unstyled_runs_inherit_header_flags() {
    let mut data = header();
    data.extend_from_slice(b"2,Hi\0");
    let doc = read_xmed(&data);
    assert_eq!(doc.runs.len(), 1);
    assert!(doc.runs[0].flags.bold);
    assert_eq!(doc.runs[0].color_index, None);
    assert_eq!(render(&doc.spans()), "{{FONT-SIZE:12}}{{ALIGN:left}}**Hi**");
}

#[test]
fn descriptor_records_carry_style_and_alignment() {
    let mut data = header();
    data.extend_from_slice(&[0x03, 0x15, 0, 0, 0, 0, 0]);
    data.extend_from_slice(b"00010000000500000000\0");
    data.extend_from_slice(b"40,\x07Times\0");
    data.extend_from_slice(b"5,Hello");

    let doc = read_xmed(&data);
    let style = doc.styles.last().unwrap();
    assert_eq!(style.style_id, 1);
    assert_eq!(style.text_length, 5);
    assert_eq!(style.font_name, "Times");
    assert_eq!(style.color_index, 7);
    assert!(style.flags.bold && style.flags.italic);
    assert_eq!(style.alignment, Alignment::Right);
    assert!(doc.map_entries.is_empty());

    let run = &doc.runs[0];
    assert_eq!(run.font_name, "Times");
    assert!(run.flags.italic);
}

#[test]
fn map_entries_and_hex_lengths() {
    let mut data = header();
    data.extend_from_slice(b"00040000002900000008\0");
    data.extend_from_slice(b"a,0123456789");
    let doc = read_xmed(&data);
    assert_eq!(
        doc.map_entries,
        vec![XmedMapEntry {
            style_id: 4,
            f2: 0,
            text_length: 29,
            f4: 0,
            base_style_id: 8,
        }]
    );
    assert_eq!(doc.text, "0123456789");
}

#[test]
fn alignment_marker_overrides_header_bits() {
    let mut data = header();
    data[0x30..0x34].copy_from_slice(&[0x02, b'7', b'7', 0x00]);
    assert_eq!(read_xmed(&data).alignment(), Alignment::Right);
    assert_eq!(decode_alignment(0x3F), Alignment::Center);
    assert_eq!(decode_alignment(0x03), Alignment::Justify);
}

#[test]
fn garbage_never_panics() {
    let inputs: [&[u8]; 4] = [b"", b"40,", b"99999999999999999999999,", &[0xFF; 64]];
    for data in inputs {
        let doc = read_xmed(data);
        assert!(doc.runs.is_empty());
    }
}

#[test]
fn long_hex_letter_runs_are_skipped_in_one_pass() {
    let mut data = header();
    data.extend(std::iter::repeat_n(b'a', 200_000));
    data.extend_from_slice(b"\x005,hello\0");
    data.extend(std::iter::repeat_n(b'F', 50_000));
    data.extend_from_slice(b"\x0040,\x02Courier\0");
    data.extend_from_slice(b"3,abc");

    let doc = read_xmed(&data);
    assert_eq!(doc.text, "helloabc");
    assert_eq!(doc.runs[1].font_name, "Courier");
    assert_eq!(doc.runs[1].color_index, Some(2));
}
