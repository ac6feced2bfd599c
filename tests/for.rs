#[macro_use]
mod common;

#[cfg(test)]
mod _for {
    #[test]
    fn basic_counting_loop() {
        assert_prints!("for (var i = 0; i < 3; i = i + 1) print i;", "0", "1", "2");
    }

    #[test]
    fn omitted_clauses_default_sensibly() {
        assert_prints!(
            "var i = 0; for (;i < 2;) { print i; i = i + 1; }",
            "0",
            "1"
        );
    }

    #[test]
    fn a_closure_declared_each_iteration_captures_that_iterations_value() {
        assert_prints!(
            "var closures = nil;
             for (var i = 1; i <= 3; i = i + 1) {
               fun show() { print i; }
               show();
             }",
            "1",
            "2",
            "3"
        );
    }

    #[test]
    fn return_inside_a_for_loop_exits_the_enclosing_function() {
        assert_prints!(
            "fun f() { for (var i = 0; i < 5; i = i + 1) { if (i == 3) return i; } return -1; } print f();",
            "3"
        );
    }

    #[test]
    fn returning_a_closure_built_inside_the_loop() {
        assert_prints!(
            "fun make() {
               for (var i = 0; i < 3; i = i + 1) {
                 if (i == 1) { fun get() { return i; } return get; }
               }
               return nil;
             }
             var f = make();
             print f();",
            "1"
        );
    }

    #[test]
    fn a_class_declaration_is_not_a_valid_body_statement() {
        assert_errors!("class_in_body", "for (;;) class Foo {}");
    }

    #[test]
    fn a_function_declaration_is_not_a_valid_body_statement() {
        assert_errors!("fun_in_body", "for (;;) fun f() {}");
    }
}
