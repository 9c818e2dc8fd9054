use onotes_core::{CursorMove, Position, WrappingTextBuffer, DEFAULT_MAX_LINE_LENGTH};

const SENTENCE: &str =
    "the quick brown fox jumps over the lazy dog and then some more words here ok yes indeed";

fn buffer_at_end(text: &str) -> WrappingTextBuffer {
    let mut buffer = WrappingTextBuffer::from_text(text);
    let last = buffer.line_count() - 1;
    buffer.set_cursor(Position::new(last, usize::MAX));
    buffer
}

#[test]
fn text_round_trips_through_lines() {
    let buffer = WrappingTextBuffer::from_text("one\ntwo\n");
    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.text(), "one\ntwo\n");
    assert_eq!(buffer.cursor(), Position::new(0, 0));
    assert_eq!(buffer.max_line_length(), DEFAULT_MAX_LINE_LENGTH);
}

#[test]
fn line_without_spaces_is_hard_split_at_limit() {
    let mut buffer = buffer_at_end(&"a".repeat(85));

    assert_eq!(buffer.reflow(), 1);
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line(0).unwrap().len(), 80);
    assert_eq!(buffer.line(1).unwrap().len(), 5);
    assert_eq!(buffer.cursor(), Position::new(1, 5));
}

#[test]
fn line_is_split_at_last_space_before_limit() {
    assert!(SENTENCE.len() > 80);
    assert_eq!(SENTENCE[..80].rfind(' '), Some(76));
    let mut buffer = buffer_at_end(SENTENCE);

    assert_eq!(buffer.reflow(), 1);
    let first = buffer.line(0).unwrap();
    let second = buffer.line(1).unwrap();
    assert_eq!(first, &SENTENCE[..76]);
    assert_eq!(second, "yes indeed");
    assert!(first.len() <= 80);
    assert!(!first.ends_with(' '));
    assert!(!second.starts_with(' '));
    assert_eq!(format!("{first} {second}"), SENTENCE);
}

#[test]
fn reflow_twice_is_a_no_op_the_second_time() {
    let mut buffer = buffer_at_end(&format!("{SENTENCE} {}", "z".repeat(120)));
    assert!(buffer.reflow() > 0);
    let settled = buffer.clone();

    assert_eq!(buffer.reflow(), 0);
    assert_eq!(buffer, settled);
    assert!(buffer
        .line(buffer.cursor().line)
        .map_or(0, |line| line.chars().count())
        <= 80);
}

#[test]
fn short_line_does_not_reflow() {
    let mut buffer = buffer_at_end(&"b".repeat(80));
    assert_eq!(buffer.reflow(), 0);
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn cursor_after_break_keeps_its_offset_in_moved_text() {
    let mut buffer = WrappingTextBuffer::from_text(SENTENCE);
    // Inside "indeed", after "ind".
    let column = SENTENCE.find("indeed").unwrap() + 3;
    buffer.set_cursor(Position::new(0, column));

    buffer.reflow();
    // 76 is the break, 1 space stripped.
    assert_eq!(buffer.cursor(), Position::new(1, column - 76 - 1));
    assert_eq!(&buffer.line(1).unwrap()[..buffer.cursor().column], "yes ind");
}

#[test]
fn cursor_before_break_jumps_to_end_of_new_line() {
    let mut buffer = WrappingTextBuffer::from_text(SENTENCE);
    buffer.set_cursor(Position::new(0, 4));

    buffer.reflow();
    assert_eq!(buffer.cursor(), Position::new(1, "yes indeed".len()));
}

#[test]
fn typing_past_the_limit_wraps_on_the_keystroke() {
    let mut buffer = WrappingTextBuffer::new();
    let words = "lorem ipsum dolor sit amet ";
    for ch in words.repeat(4).chars() {
        buffer.insert_char(ch);
    }

    assert_eq!(buffer.line_count(), 2);
    for line in buffer.lines() {
        assert!(line.chars().count() <= 80);
    }
    assert_eq!(buffer.text().replace('\n', " "), words.repeat(4));
    let cursor = buffer.cursor();
    assert_eq!(cursor.line, 1);
    assert_eq!(cursor.column, buffer.line(1).unwrap().chars().count());
}

#[test]
fn only_the_cursor_line_is_reflowed() {
    let long = "c".repeat(100);
    let mut buffer = WrappingTextBuffer::from_text(&format!("{long}\nshort"));
    buffer.set_cursor(Position::new(1, 5));

    buffer.insert_char('!');
    assert_eq!(buffer.line(0), Some(long.as_str()));
    assert_eq!(buffer.line(1), Some("short!"));
}

#[test]
fn pasted_text_is_settled_on_the_final_cursor_line() {
    let mut buffer = WrappingTextBuffer::new();
    buffer.insert_str(&"x".repeat(200));

    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.line(0).unwrap().len(), 80);
    assert_eq!(buffer.line(1).unwrap().len(), 80);
    assert_eq!(buffer.line(2).unwrap().len(), 40);
    assert_eq!(buffer.cursor(), Position::new(2, 40));
}

#[test]
fn multi_line_insert_places_cursor_after_inserted_text() {
    let mut buffer = WrappingTextBuffer::from_text("headtail");
    buffer.set_cursor(Position::new(0, 4));
    buffer.insert_str("-a\nb-");

    assert_eq!(buffer.text(), "head-a\nb-tail");
    assert_eq!(buffer.cursor(), Position::new(1, 2));
}

#[test]
fn newline_backspace_and_delete_edit_lines() {
    let mut buffer = WrappingTextBuffer::from_text("hello");
    buffer.set_cursor(Position::new(0, 2));
    buffer.insert_newline();
    assert_eq!(buffer.text(), "he\nllo");
    assert_eq!(buffer.cursor(), Position::new(1, 0));

    assert!(buffer.backspace());
    assert_eq!(buffer.text(), "hello");
    assert_eq!(buffer.cursor(), Position::new(0, 2));

    assert!(buffer.delete_forward());
    assert_eq!(buffer.text(), "helo");

    buffer.move_cursor(CursorMove::LineStart);
    assert!(!buffer.backspace());
    buffer.move_cursor(CursorMove::LineEnd);
    assert!(!buffer.delete_forward());
}

#[test]
fn joining_lines_past_the_limit_reflows_the_joined_line() {
    let top = "word ".repeat(15);
    let bottom = "next ".repeat(5);
    let text = format!("{}\n{}", top.trim_end(), bottom.trim_end());
    let mut buffer = WrappingTextBuffer::from_text(&text);
    buffer.set_cursor(Position::new(1, 0));

    assert!(buffer.backspace());
    assert_eq!(buffer.line_count(), 2);
    assert!(buffer.line(0).unwrap().chars().count() <= 80);
    // Cursor sat before the break, so it rides to the end of the new line.
    let end = buffer.line(1).unwrap().chars().count();
    assert_eq!(buffer.cursor(), Position::new(1, end));
}

#[test]
fn columns_are_counted_in_characters() {
    let mut buffer = buffer_at_end(&"é".repeat(85));
    buffer.reflow();
    assert_eq!(buffer.line(0).unwrap().chars().count(), 80);
    assert_eq!(buffer.line(1).unwrap().chars().count(), 5);

    let mut buffer = WrappingTextBuffer::from_text("né");
    buffer.set_cursor(Position::new(0, 2));
    buffer.insert_char('e');
    assert_eq!(buffer.text(), "née");
}

#[test]
fn replace_text_clamps_cursor_and_reflows() {
    let mut buffer = WrappingTextBuffer::from_text("abc");
    buffer.set_cursor(Position::new(0, 3));
    buffer.replace_text(&"q".repeat(90));

    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line(0).unwrap().len(), 80);
    assert_eq!(buffer.cursor(), Position::new(1, 10));
}

#[test]
fn custom_width_is_honoured() {
    let mut buffer = WrappingTextBuffer::with_max_line_length("", 10);
    buffer.insert_str("aaaa bbbb cccc");

    assert_eq!(buffer.lines(), ["aaaa bbbb", "cccc"]);
    assert_eq!(buffer.cursor(), Position::new(1, 4));
}
