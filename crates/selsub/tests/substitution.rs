use selsub::app::command::{CommandOutcome, FIND_AND_REPLACE_ID, Plugin};
use selsub::app::resolver::resolve_selection_text;
use selsub::app::substitute::apply;
use selsub::domain::editor::{Editor, Host};
use selsub::domain::errors::DomainError;
use selsub::domain::model::{Position, SelectionRange, Settings};
use selsub::infra::buffer::TextBuffer;

struct SingleBuffer {
    buffer: TextBuffer,
    notices: Vec<String>,
}

impl Host for SingleBuffer {
    fn active_editor(&mut self) -> Option<&mut dyn Editor> {
        Some(&mut self.buffer)
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_owned());
    }
}

#[test]
fn literal_scenario() {
    let settings = Settings {
        literal_find: "aaa".into(),
        literal_replace: "x".into(),
        ..Settings::default()
    };
    assert_eq!(apply("aaa bbb aaa", &settings).unwrap(), "x bbb x");
}

#[test]
fn regex_scenario() {
    let settings = Settings {
        regex_find: r"(\w+)\s(\w+)".into(),
        regex_flags: "g".into(),
        regex_replace: "$2, $1".into(),
        ..Settings::default()
    };
    assert_eq!(apply("John Smith", &settings).unwrap(), "Smith, John");
}

#[test]
fn invalid_pattern_scenario() {
    for flags in ["", "g", "gmi"] {
        let settings = Settings {
            regex_find: "(".into(),
            regex_flags: flags.into(),
            ..Settings::default()
        };
        assert!(matches!(
            apply("text", &settings),
            Err(DomainError::PatternCompile { .. })
        ));
    }
}

#[test]
fn literal_pass_removes_every_occurrence() {
    let text = "one fish two fish red fish";
    let settings = Settings {
        literal_find: "fish".into(),
        literal_replace: "cat".into(),
        ..Settings::default()
    };
    let out = apply(text, &settings).unwrap();
    assert_eq!(out.matches("fish").count(), 0);
    assert_eq!(out.matches("cat").count(), 3);
}

#[test]
fn cursor_line_becomes_selection() {
    let mut buffer = TextBuffer::from_text("first\nthe cursor line\nlast");
    buffer.set_cursor(Position::new(1, 3));

    assert_eq!(resolve_selection_text(&mut buffer), "the cursor line");
    assert_eq!(
        buffer.selection(),
        SelectionRange::new(Position::new(1, 0), Position::new(1, 15))
    );
}

#[test]
fn end_to_end_through_plugin() {
    let plugin = Plugin::in_memory(Settings {
        literal_find: "TODO".into(),
        literal_replace: "DONE".into(),
        regex_find: r"^- \[ \]".into(),
        regex_flags: "".into(),
        regex_replace: "- [x]".into(),
    });
    let mut host = SingleBuffer {
        buffer: TextBuffer::from_text("# List\n- [ ] TODO write tests\n- [ ] TODO ship"),
        notices: Vec::new(),
    };
    host.buffer.set_cursor(Position::new(1, 0));

    let outcome = plugin.invoke(FIND_AND_REPLACE_ID, &mut host).unwrap();

    assert!(matches!(outcome, CommandOutcome::Replaced(_)));
    assert_eq!(
        host.buffer.to_text(),
        "# List\n- [x] DONE write tests\n- [ ] TODO ship"
    );
    assert!(host.notices.is_empty());
}
