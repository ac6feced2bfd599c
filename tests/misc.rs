#[macro_use]
mod common;

#[cfg(test)]
mod misc {
    #[test]
    fn an_empty_file_produces_no_output() {
        assert_prints!("");
    }

    #[test]
    fn operator_precedence_matches_arithmetic_conventions() {
        assert_prints!(
            "print 2 + 3 * 4;
             print (2 + 3) * 4;
             print 2 * 3 - 4 / 2;
             print 1 - 1;
             print 1 < 2 == true;
             print !(1 == 2);",
            "14",
            "20",
            "4",
            "0",
            "true",
            "true"
        );
    }

    #[test]
    fn an_unexpected_character_is_a_static_error() {
        assert_errors!("unexpected_character", "var a = 1 | 2;");
    }
}
