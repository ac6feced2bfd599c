#[macro_use]
mod common;

#[cfg(test)]
mod _if {
    #[test]
    fn condition_true_runs_then_branch() {
        assert_prints!("if (true) print \"good\"; else print \"bad\";", "good");
    }

    #[test]
    fn condition_false_runs_else_branch() {
        assert_prints!("if (false) print \"bad\"; else print \"good\";", "good");
    }

    #[test]
    fn condition_false_with_no_else_runs_nothing() {
        assert_prints!("if (false) print \"bad\";");
    }

    #[test]
    fn dangling_else_binds_to_the_nearest_if() {
        assert_prints!(
            "if (true) if (false) print \"bad\"; else print \"good\";",
            "good"
        );
    }

    #[test]
    fn branches_can_be_blocks() {
        assert_prints!("if (true) { print \"block\"; } else { print \"bad\"; }", "block");
    }

    #[test]
    fn only_nil_and_false_are_falsey() {
        assert_prints!(
            "if (nil) print \"bad\"; else print \"false\";
             if (false) print \"bad\"; else print \"false\";
             if (0) print \"true\"; else print \"bad\";
             if (\"\") print \"true\"; else print \"bad\";",
            "false",
            "false",
            "true",
            "true"
        );
    }

    #[test]
    fn a_class_declaration_is_not_a_valid_condition_expression() {
        assert_errors!("class_in_condition", "if (class Foo {}) print 1;");
    }

    #[test]
    fn a_var_declaration_is_not_a_valid_then_statement() {
        assert_errors!("var_in_then", "if (true) var x = 1;");
    }

    #[test]
    fn a_function_declaration_is_not_a_valid_else_statement() {
        assert_errors!("fun_in_else", "if (false) print 1; else fun f() {}");
    }
}
