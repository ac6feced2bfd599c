#[macro_use]
mod common;

#[cfg(test)]
mod this {
    #[test]
    fn this_inside_a_method_refers_to_the_receiver() {
        assert_prints!(
            "class Foo { baz() { return this; } }
             print Foo().baz();",
            "<instance of Foo>"
        );
    }

    #[test]
    fn a_closure_created_in_a_method_keeps_this_bound() {
        assert_prints!(
            "class Foo {
               getClosure() {
                 fun closure() { return this.name; }
                 return closure;
               }
               init() { this.name = \"Foo\"; }
             }
             var closure = Foo().getClosure();
             print closure();",
            "Foo"
        );
    }

    #[test]
    fn this_at_top_level_is_a_static_error() {
        assert_errors!("this_at_top_level", "print this;");
    }

    #[test]
    fn this_in_a_top_level_function_is_a_static_error() {
        assert_errors!("this_in_top_level_function", "fun notAMethod() { print this; }");
    }

    #[test]
    fn this_inside_a_nested_function_in_a_method_still_resolves() {
        assert_prints!(
            "class Foo {
               init() { this.name = \"Foo\"; }
               method() {
                 fun nested() { return this.name; }
                 return nested();
               }
             }
             print Foo().method();",
            "Foo"
        );
    }
}
