#[macro_use]
mod common;

#[cfg(test)]
mod _while {
    #[test]
    fn basic_loop() {
        assert_prints!("var i = 0; while (i < 3) { print i; i = i + 1; }", "0", "1", "2");
    }

    #[test]
    fn condition_starting_false_never_runs_the_body() {
        assert_prints!("while (false) { print \"never\"; }");
    }

    #[test]
    fn return_inside_a_while_loop_exits_the_function() {
        assert_prints!(
            "fun f() { var i = 0; while (i < 5) { if (i == 2) return i; i = i + 1; } return -1; } print f();",
            "2"
        );
    }

    #[test]
    fn closure_declared_in_the_body_sees_the_current_iteration_value() {
        assert_prints!(
            "fun counter() { var i = 0; while (i < 3) { fun show() { print i; } show(); i = i + 1; } } counter();",
            "0",
            "1",
            "2"
        );
    }

    #[test]
    fn while_inside_a_function_returning_a_closure() {
        assert_prints!(
            "fun make() { var i = 0; while (i < 3) { i = i + 1; } fun get() { return i; } return get; }
             var f = make();
             print f();",
            "3"
        );
    }
}
