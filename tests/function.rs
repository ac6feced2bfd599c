#[macro_use]
mod common;

#[cfg(test)]
mod function {
    #[test]
    fn printing_a_function_shows_its_name() {
        assert_prints!(
            "fun foo() {} print foo; print clock;",
            "<function foo>",
            "<native function clock>"
        );
    }

    #[test]
    fn empty_body_returns_nil() {
        assert_prints!("fun f() {} print f();", "nil");
    }

    #[test]
    fn recursion() {
        assert_prints!(
            "fun fact(n) { if (n <= 1) return 1; return n * fact(n - 1); } print fact(5);",
            "120"
        );
    }

    #[test]
    fn mutual_recursion() {
        assert_prints!(
            "fun isEven(n) { if (n == 0) return true; return isOdd(n - 1); }
             fun isOdd(n) { if (n == 0) return false; return isEven(n - 1); }
             print isEven(10); print isOdd(10);",
            "true",
            "false"
        );
    }

    #[test]
    fn parameters_are_summed_in_order() {
        assert_prints!("fun sum(a, b, c) { return a + b + c; } print sum(1, 2, 3);", "6");
    }

    #[test]
    fn local_function_recurses_through_its_own_closure() {
        assert_prints!(
            "fun outer() { fun inner(n) { if (n <= 0) return 0; return n + inner(n - 1); } return inner(4); }
             print outer();",
            "10"
        );
    }

    #[test]
    fn missing_arguments_is_a_runtime_error() {
        assert_errors!("missing_arguments", "fun f(a, b) { return a + b; } f(1);");
    }

    #[test]
    fn extra_arguments_is_a_runtime_error() {
        assert_errors!("extra_arguments", "fun f(a, b) { return a + b; } f(1, 2, 3);");
    }
}
