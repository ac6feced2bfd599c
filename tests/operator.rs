#[macro_use]
mod common;

#[cfg(test)]
mod operator {
    #[test]
    fn add_numbers_and_concatenate_strings() {
        assert_prints!(
            "print 123 + 456; print \"str\" + \"ing\";",
            "579",
            "string"
        );
    }

    #[test]
    fn subtract_multiply_divide() {
        assert_prints!(
            "print 4 - 3; print 6 - 6; print 3 * 5; print 8 / 2;",
            "1",
            "0",
            "15",
            "4"
        );
    }

    #[test]
    fn comparison_operators() {
        assert_prints!(
            "print 1 < 2; print 2 < 2; print 2 < 1;
             print 1 <= 2; print 2 <= 2; print 2 <= 1;
             print 1 > 2; print 2 > 2; print 2 > 1;
             print 1 >= 2; print 2 >= 2; print 2 >= 1;",
            "true",
            "false",
            "false",
            "true",
            "true",
            "false",
            "false",
            "false",
            "true",
            "false",
            "true",
            "true"
        );
    }

    #[test]
    fn negate_a_number() {
        assert_prints!("print -3; print -(-3); var a = 3; print -a;", "-3", "3", "-3");
    }

    #[test]
    fn logical_not_never_errors_and_coerces_truthiness() {
        assert_prints!(
            "print !true; print !false; print !nil; print !0;",
            "false",
            "true",
            "true",
            "false"
        );
    }

    #[test]
    fn equality_and_inequality() {
        assert_prints!(
            "print 1 == 1; print 1 == 2; print 1 != 2; print \"a\" == \"a\"; print nil == nil;",
            "true",
            "false",
            "true",
            "true",
            "true"
        );
    }

    #[test]
    fn class_identity_equality_compares_by_reference() {
        assert_prints!(
            "class Foo {}
             var a = Foo();
             var b = Foo();
             print a == a;
             print a == b;",
            "true",
            "false"
        );
    }

    #[test]
    fn adding_a_number_and_a_string_is_a_runtime_error() {
        assert_errors!("add_number_and_string", "print 1 + \"a\";");
    }

    #[test]
    fn comparing_a_string_and_a_number_is_a_runtime_error() {
        assert_errors!("compare_string_and_number", "print \"a\" < 1;");
    }

    #[test]
    fn negating_a_string_is_a_runtime_error() {
        assert_errors!("negate_string", "print -\"a\";");
    }

    #[test]
    fn negating_a_class_is_a_runtime_error() {
        assert_errors!("negate_class", "class Foo {} print -Foo;");
    }
}
