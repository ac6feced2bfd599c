#[macro_use]
mod common;

#[cfg(test)]
mod call {
    #[test]
    fn calling_a_number_is_a_runtime_error() {
        assert_errors!("call_number", "var x = 123; x();");
    }

    #[test]
    fn calling_a_string_is_a_runtime_error() {
        assert_errors!("call_string", "var x = \"str\"; x();");
    }

    #[test]
    fn calling_nil_is_a_runtime_error() {
        assert_errors!("call_nil", "var x = nil; x();");
    }

    #[test]
    fn calling_with_wrong_arity_is_a_runtime_error() {
        assert_errors!("call_arity", "fun f(a, b) { return a + b; } f(1);");
    }
}
