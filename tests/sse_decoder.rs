use atlas::services::sse::{SseDecoder, StreamFrame};

#[test]
fn test_multibyte_character_split_across_chunks() {
    let payload = "data: {\"token\": \"güneş\"}\n\n".as_bytes();
    // cut inside the two-byte 'ü'
    let cut = payload.iter().position(|&b| b == 0xC3).unwrap() + 1;

    let mut decoder = SseDecoder::new();
    assert!(decoder.push(&payload[..cut]).is_empty());
    let events = decoder.push(&payload[cut..]);

    assert_eq!(events.len(), 1);
    assert_eq!(StreamFrame::from(&events[0]), StreamFrame::Token("güneş".to_string()));
}

#[test]
fn test_event_type_and_multiline_data() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b"event: note\r\ndata: bir\r\ndata: iki\r\n\r\n");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type.as_deref(), Some("note"));
    assert_eq!(events[0].data, "bir\niki");
}

#[test]
fn test_comments_and_done() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b": ping\n\ndata: [DONE]\n\n");
    assert_eq!(events.len(), 1);
    assert!(events[0].is_done());
    assert_eq!(StreamFrame::from(&events[0]), StreamFrame::Done);
}

#[test]
fn test_finish_flushes_unterminated_event() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.push(b"data: {\"token\": \"son\"}").is_empty());
    let event = decoder.finish().expect("trailing event");
    assert_eq!(StreamFrame::from(&event), StreamFrame::Token("son".to_string()));
    assert!(decoder.finish().is_none());
}

#[test]
fn test_unknown_payloads_are_ignored() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b"data: not json\n\ndata: {\"other\": 1}\n\n");
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| StreamFrame::from(e) == StreamFrame::Ignored));
}
