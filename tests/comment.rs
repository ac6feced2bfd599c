#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    #[test]
    fn line_comment_is_skipped() {
        assert_prints!("// a line comment\nprint \"ok\";", "ok");
    }

    #[test]
    fn line_comment_with_no_trailing_newline_is_skipped() {
        assert_prints!("print \"ok\"; // trailing comment", "ok");
    }

    #[test]
    fn block_comment_spanning_lines_is_skipped() {
        assert_prints!("/* a\n   multiline\n   comment */ print \"ok\";", "ok");
    }

    #[test]
    fn nested_block_comments_are_tracked_by_depth() {
        assert_prints!("/* outer /* inner */ still outer */ print \"ok\";", "ok");
    }

    #[test]
    fn file_with_only_a_comment_produces_no_output() {
        assert_prints!("// nothing here");
    }

    #[test]
    fn unicode_inside_a_comment_is_skipped() {
        assert_prints!("// \u{00b6}\u{0950}\u{0b83}\nprint \"ok\";", "ok");
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert_errors!("unterminated_block_comment", "/* never closed");
    }
}
